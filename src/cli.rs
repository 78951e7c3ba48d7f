// url_migrator/src/cli.rs
// Command line / environment surface of the migration service.

use clap::Parser;

/// Continuously rewrites an obsolete URL prefix in MongoDB documents.
///
/// Every setting can be given as a flag or through its environment variable;
/// a `.env` file in the working directory is read before parsing.
#[derive(Parser, Debug, Clone,)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    /// Connection string for MongoDB
    #[clap(long, env = "MONGO_URI", default_value = crate::DEFAULT_MONGO_URI)]
    pub mongo_uri: String,

    /// Database holding both collections
    #[clap(long, env = "MONGO_DB_NAME", default_value = crate::DEFAULT_DB_NAME)]
    pub db_name: String,

    /// Groundtruth image collection
    #[clap(
        long,
        env = "GROUNDTRUTH_COLLECTION",
        default_value = crate::DEFAULT_GROUNDTRUTH_COLLECTION
    )]
    pub groundtruth_collection: String,

    /// User uploaded clothes collection
    #[clap(
        long,
        env = "USER_CLOTHES_COLLECTION",
        default_value = crate::DEFAULT_USER_CLOTHES_COLLECTION
    )]
    pub user_clothes_collection: String,

    /// URL literal to search for
    #[clap(long, env = "OLD_URL", default_value = crate::DEFAULT_OLD_URL)]
    pub old_url: String,

    /// URL literal written in its place
    #[clap(long, env = "NEW_URL", default_value = crate::DEFAULT_NEW_URL)]
    pub new_url: String,

    /// Seconds to wait between ticks
    #[clap(long, env = "POLL_INTERVAL", default_value_t = crate::DEFAULT_POLL_INTERVAL_SECS)]
    pub poll_interval: u64,
}
