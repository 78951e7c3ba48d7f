// url_migrator/src/store.rs
// Storage seam consumed by the migration loop.

use async_trait::async_trait;
use mongodb::bson::{Bson, Document};

use crate::error::Result;

/// Connection settings for a document store.
#[derive(Debug, Clone,)]
pub struct StoreConfig {
    pub database_url:  String,
    pub database_name: String,
}

/// Trait for the document database the migration runs against.
///
/// Reconnection is explicit: the loop calls `is_healthy` after a transient
/// failure and `reconnect` when the answer is no.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Opens the connection and verifies the server answers.
    async fn connect(config: StoreConfig,) -> Result<Self,>
    where
        Self: Sized;

    async fn is_healthy(&self,) -> bool;

    /// Replaces the underlying connection with a fresh one.
    async fn reconnect(&mut self,) -> Result<(),>;

    /// Documents where any of `fields` is a string containing `needle`.
    ///
    /// Only `_id` and `fields` need to be present in the returned documents.
    async fn find_candidates(
        &self,
        collection: &str,
        fields: &[String],
        needle: &str,
    ) -> Result<Vec<Document,>,>;

    /// Applies `changes` as a partial `$set` update to the document with `id`.
    async fn update_fields(&self, collection: &str, id: &Bson, changes: Document,) -> Result<(),>;

    async fn close(self,)
    where
        Self: Sized;
}
