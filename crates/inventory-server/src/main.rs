use anyhow::{Context, Result};
use clap::Parser;
use infrastructure::{ServerConfig, StorageBackend};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use inventory_server::{api, setup_app_state};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding default.toml and {RUN_MODE}.toml
    #[arg(long, default_value = "config")]
    config_dir: String,

    /// API Port
    #[arg(long)]
    port: Option<u16>,

    /// Storage backend: memory, json or sqlite
    #[arg(long)]
    storage: Option<StorageBackend>,

    /// JSON file or SQLite database path
    #[arg(long)]
    storage_path: Option<PathBuf>,

    /// Seed sample devices when the store is empty
    #[arg(long)]
    seed: bool,
}

impl Args {
    fn apply(&self, config: &mut ServerConfig) {
        if let Some(port) = self.port {
            config.http.port = port;
        }
        if let Some(backend) = self.storage {
            config.storage.backend = backend;
        }
        if let Some(path) = &self.storage_path {
            config.storage.path = path.clone();
        }
        if self.seed {
            config.seed_sample_data = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("info,inventory_server=debug,application=debug")
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    info!("Device Inventory Server starting...");

    let mut config = ServerConfig::load(&args.config_dir)
        .with_context(|| format!("loading configuration from {}", args.config_dir))?;
    args.apply(&mut config);
    info!(
        backend = ?config.storage.backend,
        path = %config.storage.path.display(),
        enforce_name_date_uniqueness = config.registry.enforce_name_date_uniqueness,
        seed = config.seed_sample_data,
        "Configuration loaded"
    );

    let state = setup_app_state(&config).await?;

    let app = api::create_router(state);
    let addr = config.http.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("API Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
