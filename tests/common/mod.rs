// url_migrator/tests/common/mod.rs
// In-memory document store with failure injection for tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use mongodb::bson::{Bson, Document};
use url_migrator::config::{CollectionSpec, MigrationConfig};
use url_migrator::error::{MigrationError, Result};
use url_migrator::rewrite::UrlRewrite;
use url_migrator::store::{DocumentStore, StoreConfig};

pub const OLD: &str = "http://155.248.254.206:9000";
pub const NEW: &str = "https://images.nomo.software";
pub const GROUNDTRUTH: &str = "imageUrl";
pub const USER_CLOTHES: &str = "userUploadedClothes";

#[derive(Default,)]
struct State {
    collections:    HashMap<String, Vec<Document,>,>,
    failing_ids:    HashSet<String,>,
    failing_query:  Option<(String, String,),>,
    healthy:        bool,
    health_checks:  usize,
    reconnects:     usize,
    closed:         bool,
    delete_on_find: HashSet<String,>,
}

/// Clones share the same state, so a test can keep a handle after the
/// migrator takes ownership of the store.
#[derive(Clone,)]
pub struct MemoryStore {
    state: Arc<Mutex<State,>,>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                healthy: true,
                ..State::default()
            },),),
        }
    }

    pub fn insert(&self, collection: &str, doc: Document,) {
        let mut state = self.state.lock().unwrap();
        state.collections.entry(collection.to_string(),).or_default().push(doc,);
    }

    pub fn get(&self, collection: &str, id: &str,) -> Option<Document,> {
        let state = self.state.lock().unwrap();
        state.collections.get(collection,)?.iter().find(|d| id_of(d,) == id,).cloned()
    }

    /// Writes to the document with this `_id` fail.
    pub fn fail_writes_for(&self, id: &str,) {
        self.state.lock().unwrap().failing_ids.insert(id.to_string(),);
    }

    /// The document with this `_id` disappears right after it is returned by a query.
    pub fn delete_after_find(&self, id: &str,) {
        self.state.lock().unwrap().delete_on_find.insert(id.to_string(),);
    }

    /// The next query on `collection` fails with `message`.
    pub fn fail_next_query(&self, collection: &str, message: &str,) {
        self.state.lock().unwrap().failing_query =
            Some((collection.to_string(), message.to_string(),),);
    }

    pub fn set_healthy(&self, healthy: bool,) {
        self.state.lock().unwrap().healthy = healthy;
    }

    pub fn health_checks(&self,) -> usize {
        self.state.lock().unwrap().health_checks
    }

    pub fn reconnects(&self,) -> usize {
        self.state.lock().unwrap().reconnects
    }

    pub fn is_closed(&self,) -> bool {
        self.state.lock().unwrap().closed
    }
}

fn id_of(doc: &Document,) -> String {
    match doc.get("_id",) {
        Some(Bson::String(s,),) => s.clone(),
        Some(other,) => other.to_string(),
        None => String::new(),
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn connect(_config: StoreConfig,) -> Result<Self,> {
        Ok(MemoryStore::new(),)
    }

    async fn is_healthy(&self,) -> bool {
        let mut state = self.state.lock().unwrap();
        state.health_checks += 1;
        state.healthy
    }

    async fn reconnect(&mut self,) -> Result<(),> {
        let mut state = self.state.lock().unwrap();
        state.reconnects += 1;
        state.healthy = true;
        Ok((),)
    }

    async fn find_candidates(
        &self,
        collection: &str,
        fields: &[String],
        needle: &str,
    ) -> Result<Vec<Document,>,> {
        let mut state = self.state.lock().unwrap();
        if let Some((failing, message,),) = state.failing_query.take() {
            if failing == collection {
                return Err(MigrationError::QueryError {
                    collection: collection.to_string(),
                    message,
                },);
            }
            state.failing_query = Some((failing, message,),);
        }

        let matcher = UrlRewrite::new(needle, "",);
        let found: Vec<Document,> = state
            .collections
            .get(collection,)
            .map(|docs| docs.iter().filter(|d| matcher.matches(d, fields,),).cloned().collect(),)
            .unwrap_or_default();

        let doomed = state.delete_on_find.clone();
        if let Some(docs,) = state.collections.get_mut(collection,) {
            docs.retain(|d| !doomed.contains(&id_of(d,),),);
        }
        Ok(found,)
    }

    async fn update_fields(&self, collection: &str, id: &Bson, changes: Document,) -> Result<(),> {
        let mut state = self.state.lock().unwrap();
        let key = match id {
            Bson::String(s,) => s.clone(),
            other => other.to_string(),
        };
        if state.failing_ids.contains(&key,) {
            return Err(MigrationError::WriteError {
                collection: collection.to_string(),
                id:         key,
                message:    "write conflict".to_string(),
            },);
        }

        let target = state
            .collections
            .get_mut(collection,)
            .and_then(|docs| docs.iter_mut().find(|d| id_of(d,) == key,),);
        match target {
            Some(doc,) => {
                for (field, value,) in changes {
                    doc.insert(field, value,);
                }
                Ok((),)
            },
            None => Err(MigrationError::DocumentNotFound {
                collection: collection.to_string(),
                id:         key,
            },),
        }
    }

    async fn close(self,) {
        self.state.lock().unwrap().closed = true;
    }
}

pub fn test_config(poll_interval: Duration,) -> MigrationConfig {
    MigrationConfig {
        mongo_uri: "mongodb://localhost:27017/".to_string(),
        db_name: "wearapp_test".to_string(),
        groundtruth: CollectionSpec::groundtruth(GROUNDTRUTH,),
        user_clothes: CollectionSpec::user_clothes(USER_CLOTHES,),
        old_url: OLD.to_string(),
        new_url: NEW.to_string(),
        poll_interval,
    }
}
