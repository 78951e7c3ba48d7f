// url_migrator/src/config.rs
// Resolved, validated runtime configuration.

use std::time::Duration;

use url::Url;

use crate::cli::Cli;
use crate::error::{MigrationError, Result};

const MASK: &str = "****";

/// One collection scanned by a pass.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct CollectionSpec {
    /// Human readable name used in log lines and statistics.
    pub label:            String,
    pub name:             String,
    pub fields:           Vec<String,>,
    /// Stamp `updatedAt` alongside every rewrite.
    pub stamp_updated_at: bool,
}

impl CollectionSpec {
    pub fn groundtruth(name: impl Into<String,>,) -> Self {
        Self {
            label:            "Groundtruth".to_string(),
            name:             name.into(),
            fields:           crate::GROUNDTRUTH_FIELDS.iter().map(|f| f.to_string(),).collect(),
            stamp_updated_at: false,
        }
    }

    pub fn user_clothes(name: impl Into<String,>,) -> Self {
        Self {
            label:            "User clothes".to_string(),
            name:             name.into(),
            fields:           crate::USER_CLOTHES_FIELDS.iter().map(|f| f.to_string(),).collect(),
            stamp_updated_at: true,
        }
    }
}

#[derive(Debug, Clone,)]
pub struct MigrationConfig {
    pub mongo_uri:     String,
    pub db_name:       String,
    pub groundtruth:   CollectionSpec,
    pub user_clothes:  CollectionSpec,
    pub old_url:       String,
    pub new_url:       String,
    pub poll_interval: Duration,
}

impl MigrationConfig {
    pub fn from_cli(cli: &Cli,) -> Result<Self,> {
        let config = Self {
            mongo_uri:     cli.mongo_uri.trim().to_string(),
            db_name:       cli.db_name.trim().to_string(),
            groundtruth:   CollectionSpec::groundtruth(cli.groundtruth_collection.trim(),),
            user_clothes:  CollectionSpec::user_clothes(cli.user_clothes_collection.trim(),),
            old_url:       cli.old_url.clone(),
            new_url:       cli.new_url.clone(),
            poll_interval: Duration::from_secs(cli.poll_interval,),
        };
        config.validate()?;
        Ok(config,)
    }

    pub fn validate(&self,) -> Result<(),> {
        let required = [
            ("MONGO_URI", &self.mongo_uri,),
            ("MONGO_DB_NAME", &self.db_name,),
            ("GROUNDTRUTH_COLLECTION", &self.groundtruth.name,),
            ("USER_CLOTHES_COLLECTION", &self.user_clothes.name,),
            ("OLD_URL", &self.old_url,),
            ("NEW_URL", &self.new_url,),
        ];
        for (key, value,) in required {
            if value.is_empty() {
                return Err(MigrationError::ConfigurationError(format!(
                    "{} must not be empty",
                    key
                ),),);
            }
        }

        if self.poll_interval.is_zero() {
            return Err(MigrationError::ConfigurationError(
                "POLL_INTERVAL must be at least 1 second".to_string(),
            ),);
        }

        // A replacement containing the search literal would match again on every tick.
        if self.new_url.contains(&self.old_url,) {
            return Err(MigrationError::ConfigurationError(format!(
                "NEW_URL '{}' must not contain OLD_URL '{}'",
                self.new_url, self.old_url
            ),),);
        }

        Ok((),)
    }

    /// Both collections in the order they are processed within a tick.
    pub fn collections(&self,) -> [&CollectionSpec; 2] {
        [&self.groundtruth, &self.user_clothes,]
    }

    pub fn masked_uri(&self,) -> String {
        mask_connection_string(&self.mongo_uri,)
    }
}

/// Replaces the password of a connection string so it can be logged.
pub fn mask_connection_string(uri: &str,) -> String {
    if let Ok(mut parsed,) = Url::parse(uri,) {
        if parsed.password().is_some() && parsed.set_password(Some(MASK,),).is_ok() {
            return parsed.to_string();
        }
        if parsed.host_str().is_some() {
            return uri.to_string();
        }
    }

    // Seed lists such as `host1:27017,host2:27017` are rejected by `Url`.
    match (uri.find("://",), uri.rfind('@',),) {
        (Some(scheme_end,), Some(at,),) if at > scheme_end => {
            let userinfo = &uri[scheme_end + 3..at];
            match userinfo.split_once(':',) {
                Some((user, _,),) => {
                    format!("{}{}:{}{}", &uri[..scheme_end + 3], user, MASK, &uri[at..])
                },
                None => uri.to_string(),
            }
        },
        _ => uri.to_string(),
    }
}
