use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use termlens::store::{MemoryQueryStore, PgQueryStore, QueryStore};
use termlens::{create_router, logging, AnalyticsGateway, AppConfig, AppState, ConfigError};
use termlens_db::{BigQueryManager, ClientPool, Credentials, WarehouseConfig};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "termlens",
    about = "Saved queries and top-terms analytics gateway",
    version
)]
struct Cli {
    #[arg(
        short,
        long,
        env = "TERMLENS_CONFIG",
        help = "Config and service-account key file",
        default_value = "./config.json"
    )]
    config: PathBuf,

    #[arg(
        short,
        long,
        env = "TERMLENS_LISTEN",
        help = "Address to listen on",
        default_value = "0.0.0.0:8000"
    )]
    listen: SocketAddr,

    #[arg(
        long,
        env = "TERMLENS_MEMORY_STORE",
        help = "Keep saved queries in memory instead of PostgreSQL"
    )]
    memory_store: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let config = AppConfig::from_file(&cli.config)?;
    let catalog = config.catalog()?;
    let credentials = Credentials::from_file(&cli.config).map_err(ConfigError::from)?;
    let warehouse = WarehouseConfig::resolve(config.project_id.clone(), &credentials)
        .map_err(ConfigError::from)?;
    info!(project = %warehouse.project_id, dataset = %config.dataset_id, "warehouse configured");

    let pool = ClientPool::new(BigQueryManager::new(credentials, warehouse));
    let analytics = Arc::new(AnalyticsGateway::new(catalog, pool));

    let store: Arc<dyn QueryStore> = if cli.memory_store {
        info!("using in-memory query store");
        Arc::new(MemoryQueryStore::new())
    } else {
        let options = config.pg_options()?;
        Arc::new(
            PgQueryStore::connect(options)
                .await
                .context("connecting to the query store")?,
        )
    };

    let router = create_router(AppState { analytics, store });
    let listener = tokio::net::TcpListener::bind(cli.listen)
        .await
        .with_context(|| format!("binding {}", cli.listen))?;
    info!(addr = %cli.listen, "listening");
    axum::serve(listener, router).await?;
    Ok(())
}
