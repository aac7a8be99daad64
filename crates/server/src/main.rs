//! Amen server binary.

use amen_core::config::AppConfig;
use amen_server::{AppState, shared_router};
use anyhow::{Context, Result};
use clap::Parser;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Amen - media backend for the myAmen app
#[derive(Parser, Debug)]
#[command(name = "amend")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "AMEN_CONFIG", default_value = "config/server.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Amen v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration (file is optional, env vars can provide/override everything)
    let config_path = std::path::Path::new(&args.config);
    let mut figment = Figment::new();
    let has_config_file = config_path.exists();
    if has_config_file {
        tracing::info!(config_path = %args.config, "Loading configuration from file");
        figment = figment.merge(Toml::file(&args.config));
    } else {
        tracing::debug!("No config file found at {}", args.config);
    }

    // Check for AMEN_ environment variables (excluding AMEN_CONFIG which is just the path)
    let has_env_config =
        std::env::vars().any(|(key, _)| key.starts_with("AMEN_") && key != "AMEN_CONFIG");

    if !has_config_file && !has_env_config {
        anyhow::bail!(
            "No configuration provided.\n\n\
             Provide configuration via one of:\n  \
             1. Config file: amend --config /path/to/config.toml\n  \
             2. Environment variables: AMEN_SERVER__BIND=0.0.0.0:8080 \
             AMEN_UPLOAD__PUBLIC_BASE_URL=https://cdn.example.com amend\n\n\
             See config/server.example.toml for example configuration.\n\
             Set AMEN_CONFIG env var to specify a default config file path."
        );
    }

    if !has_config_file {
        tracing::info!("Using environment variables for configuration");
    }

    let config: AppConfig = figment
        .merge(Env::prefixed("AMEN_").split("__"))
        .extract()
        .context("failed to load configuration")?;

    // Validate before wiring anything up. Missing required configuration is
    // a startup failure, not a per-request 500.
    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("invalid configuration")?;

    // Register Prometheus metrics
    amen_server::metrics::register_metrics();
    tracing::info!("Prometheus metrics registered");

    // Initialize storage backend
    let storage = amen_storage::from_config(&config.storage)
        .await
        .context("failed to initialize storage")?;
    tracing::info!(backend = storage.backend_name(), "Storage backend initialized");

    // Verify storage connectivity before accepting requests.
    // This catches configuration errors and connectivity issues early,
    // preventing the server from reporting healthy when storage is unreachable.
    storage
        .health_check()
        .await
        .context("storage health check failed")?;
    tracing::info!("Storage backend connectivity verified");

    // Initialize metadata store
    let metadata = amen_metadata::from_config(&config.metadata)
        .await
        .context("failed to initialize metadata store")?;
    metadata
        .health_check()
        .await
        .context("metadata health check failed")?;
    tracing::info!("Metadata store initialized");

    let bind = config.server.bind.clone();
    let state = AppState::new(config, storage, metadata);
    let router = shared_router(state).await;

    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("invalid bind address: {bind}"))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(bind = %addr, "Server listening");

    axum::serve(listener, router)
        .await
        .context("server error")?;

    Ok(())
}
