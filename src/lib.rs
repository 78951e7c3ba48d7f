// url_migrator/src/lib.rs
// Public API of the URL migration service.

pub mod cli;
pub mod config;
pub mod error;
pub mod migrator;
pub mod mongo;
pub mod rewrite;
pub mod scheduler;
pub mod shutdown;
pub mod stats;
pub mod store;

pub const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017/";
pub const DEFAULT_DB_NAME: &str = "wearapp";
pub const DEFAULT_GROUNDTRUTH_COLLECTION: &str = "imageUrl";
pub const DEFAULT_USER_CLOTHES_COLLECTION: &str = "userUploadedClothes";
pub const DEFAULT_OLD_URL: &str = "http://155.248.254.206:9000";
pub const DEFAULT_NEW_URL: &str = "https://images.nomo.software";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 1;

/// Fields rewritten in the groundtruth collection.
pub const GROUNDTRUTH_FIELDS: &[&str] = &["minioUrlOracle", "minioUrlThinker", "minioUrl", "s3Url"];
/// Fields rewritten in the user-clothes collection.
pub const USER_CLOTHES_FIELDS: &[&str] = &["imageUrl", "segmentedImageUrl"];
/// Modification timestamp stamped on every user-clothes update.
pub const UPDATED_AT_FIELD: &str = "updatedAt";

pub const LOG_FILE_NAME: &str = "url_migration.log";
