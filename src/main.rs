// url_migrator/src/main.rs
// Entry point of the URL migration service.

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};
use url_migrator::cli::Cli;
use url_migrator::config::MigrationConfig;
use url_migrator::error::Result;
use url_migrator::migrator::Migrator;
use url_migrator::mongo::MongoStore;
use url_migrator::shutdown;
use url_migrator::store::{DocumentStore, StoreConfig};

#[tokio::main]
async fn main() -> Result<(),> {
    // A missing .env file is fine; the environment alone may configure everything.
    let dotenv_path = dotenv::dotenv().ok();

    // Initialize tracing
    let file_appender = tracing_appender::rolling::never(".", url_migrator::LOG_FILE_NAME,);
    let (non_blocking, _guard,) = tracing_appender::non_blocking(file_appender,);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info",),),)
        .with(fmt::layer().with_writer(std::io::stderr,),)
        .with(fmt::layer().with_writer(non_blocking,).with_ansi(false,),)
        .init();

    if let Some(path,) = dotenv_path {
        info!("Loaded environment from {}", path.display());
    }

    let cli = Cli::parse();
    info!("Starting URL Migration Service...");

    let config = MigrationConfig::from_cli(&cli,).inspect_err(|e| {
        error!("{}", e);
    },)?;

    let store = MongoStore::connect(StoreConfig {
        database_url:  config.mongo_uri.clone(),
        database_name: config.db_name.clone(),
    },)
    .await
    .inspect_err(|e| {
        error!("{}", e);
        error!("Failed to connect to database. Exiting.");
    },)?;

    info!("Connected to MongoDB: {}", config.masked_uri());
    info!("Database: {}", config.db_name);
    for spec in config.collections() {
        info!("{} collection: {} (fields: {})", spec.label, spec.name, spec.fields.join(", "));
    }
    info!("Old URL: {}", config.old_url);
    info!("New URL: {}", config.new_url);

    let (trigger, shutdown,) = shutdown::channel();
    tokio::spawn(shutdown::listen_for_signals(trigger,),);

    Migrator::new(store, config,).run(shutdown,).await;
    Ok((),)
}
