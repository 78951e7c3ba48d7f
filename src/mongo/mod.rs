// url_migrator/src/mongo/mod.rs
// MongoDB implementation of the document store.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{Bson, Document, doc};
use mongodb::options::{ClientOptions, FindOptions};
use mongodb::{Client, Database};
use tracing::{info, warn};

use crate::error::{MigrationError, Result};
use crate::store::{DocumentStore, StoreConfig};

pub struct MongoStore {
    config: StoreConfig,
    client: Client,
    db:     Database,
}

impl MongoStore {
    async fn open(config: &StoreConfig,) -> Result<Client,> {
        let client_options = ClientOptions::parse(&config.database_url,)
            .await
            .map_err(|e| {
                MigrationError::ConfigurationError(format!("Failed to parse MongoDB URI: {}", e),)
            },)?;
        let client = Client::with_options(client_options,).map_err(|e| {
            MigrationError::ConnectionError(format!("Failed to create MongoDB client: {}", e),)
        },)?;

        ping(&client,).await?;
        Ok(client,)
    }
}

async fn ping(client: &Client,) -> Result<(),> {
    client
        .database("admin",)
        .run_command(doc! {"ping": 1}, None,)
        .await
        .map(|_| (),)
        .map_err(|e| MigrationError::ConnectionError(format!("Failed to ping MongoDB: {}", e),),)
}

/// `$or` filter matching `needle` as a literal, case-sensitive substring of any field.
pub fn substring_filter(fields: &[String], needle: &str,) -> Document {
    let pattern = regex::escape(needle,);
    let clauses: Vec<Document,> = fields
        .iter()
        .map(|field| {
            let mut clause = Document::new();
            clause.insert(field.clone(), doc! { "$regex": pattern.as_str() },);
            clause
        },)
        .collect();
    doc! { "$or": clauses }
}

fn projection(fields: &[String],) -> Document {
    let mut projection = doc! { "_id": 1 };
    for field in fields {
        projection.insert(field.clone(), 1,);
    }
    projection
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn connect(config: StoreConfig,) -> Result<Self,> {
        let client = Self::open(&config,).await?;
        let db = client.database(&config.database_name,);
        Ok(MongoStore { config, client, db, },)
    }

    async fn is_healthy(&self,) -> bool {
        match ping(&self.client,).await {
            Ok((),) => true,
            Err(e,) => {
                warn!("Health check failed: {}", e);
                false
            },
        }
    }

    async fn reconnect(&mut self,) -> Result<(),> {
        let client = Self::open(&self.config,).await?;
        let stale = std::mem::replace(&mut self.client, client,);
        self.db = self.client.database(&self.config.database_name,);
        stale.shutdown().await;
        info!("Reconnected to MongoDB");
        Ok((),)
    }

    async fn find_candidates(
        &self,
        collection: &str,
        fields: &[String],
        needle: &str,
    ) -> Result<Vec<Document,>,> {
        let query_error = |e: mongodb::error::Error| MigrationError::QueryError {
            collection: collection.to_string(),
            message:    e.to_string(),
        };

        let options = FindOptions::builder().projection(projection(fields,),).build();
        let cursor = self
            .db
            .collection::<Document>(collection,)
            .find(substring_filter(fields, needle,), options,)
            .await
            .map_err(query_error,)?;

        cursor.try_collect::<Vec<Document,>>().await.map_err(query_error,)
    }

    async fn update_fields(&self, collection: &str, id: &Bson, changes: Document,) -> Result<(),> {
        let result = self
            .db
            .collection::<Document>(collection,)
            .update_one(doc! { "_id": id.clone() }, doc! { "$set": changes }, None,)
            .await
            .map_err(|e| MigrationError::WriteError {
                collection: collection.to_string(),
                id:         id.to_string(),
                message:    e.to_string(),
            },)?;

        if result.matched_count == 0 {
            return Err(MigrationError::DocumentNotFound {
                collection: collection.to_string(),
                id:         id.to_string(),
            },);
        }
        Ok((),)
    }

    async fn close(self,) {
        self.client.shutdown().await;
        info!("MongoDB connection closed");
    }
}
