// url_migrator/src/error.rs
// Error types for the migration service.

use thiserror::Error;

#[derive(Debug, Error,)]
pub enum MigrationError {
    #[error("Failed to connect to database: {0}")]
    ConnectionError(String,),
    #[error("Invalid configuration: {0}")]
    ConfigurationError(String,),
    #[error("Failed to query collection '{collection}': {message}")]
    QueryError { collection: String, message: String, },
    #[error("Failed to update document {id} in '{collection}': {message}")]
    WriteError {
        collection: String,
        id:         String,
        message:    String,
    },
    #[error("Document {id} no longer exists in '{collection}'")]
    DocumentNotFound { collection: String, id: String, },
}

impl MigrationError {
    /// Whether the failure looks like a lost or overloaded connection that the
    /// next tick may recover from once the store is healthy again.
    pub fn is_transient(&self,) -> bool {
        match self {
            MigrationError::ConnectionError(_,) => true,
            MigrationError::QueryError { message, .. }
            | MigrationError::WriteError { message, .. } => {
                let m = message.to_lowercase();
                m.contains("timeout",)
                    || m.contains("timed out",)
                    || m.contains("connection",)
                    || m.contains("busy",)
                    || m.contains("server selection",)
                    || m.contains("connection reset",)
                    || m.contains("broken pipe",)
                    || m.contains("service unavailable",)
            },
            _ => false,
        }
    }
}

pub type Result<T,> = std::result::Result<T, MigrationError,>;
