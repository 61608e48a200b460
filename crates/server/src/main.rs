use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use convertiverse_core::{
    load_config, probe_backends, validate_config, ArtifactStore, Catalog, Config,
    ConversionBackend, Dispatcher, FfmpegBackend, ImageBackend, Resolver,
};

use convertiverse_server::api::create_router;
use convertiverse_server::metrics;
use convertiverse_server::state::AppState;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path; a missing default file just means defaults.
    let config = match std::env::var("CONVERTIVERSE_CONFIG") {
        Ok(path) => {
            let path = PathBuf::from(path);
            info!("Loading configuration from {:?}", path);
            load_config(&path)
                .with_context(|| format!("Failed to load config from {:?}", path))?
        }
        Err(_) => {
            let path = PathBuf::from("config.toml");
            if path.exists() {
                info!("Loading configuration from {:?}", path);
                load_config(&path)
                    .with_context(|| format!("Failed to load config from {:?}", path))?
            } else {
                info!("No config file found, using defaults");
                Config::default()
            }
        }
    };

    validate_config(&config).context("Configuration validation failed")?;

    info!("Uploads directory: {:?}", config.storage.uploads_dir);
    info!("Output directory: {:?}", config.storage.output_dir);

    // Prepare storage directories
    let store = Arc::new(ArtifactStore::new(
        &config.storage.uploads_dir,
        &config.storage.output_dir,
    ));
    store
        .init()
        .await
        .context("Failed to create storage directories")?;

    // Probe conversion tools before accepting traffic, so the catalog
    // never advertises a conversion the host cannot perform.
    let backends: Vec<Arc<dyn ConversionBackend>> = vec![
        Arc::new(ImageBackend::new()),
        Arc::new(FfmpegBackend::new(&config.tools)),
    ];
    let availability = Arc::new(probe_backends(&backends).await);

    let catalog = Arc::new(Catalog::builtin());
    let resolver = Arc::new(Resolver::new(catalog, Arc::clone(&availability)));

    let conversions: usize = resolver.available_conversions().values().map(Vec::len).sum();
    info!("Serving {} available conversions", conversions);

    let mut dispatcher = Dispatcher::new(Arc::clone(&resolver), Arc::clone(&store));
    for backend in backends {
        dispatcher = dispatcher.with_backend(backend);
    }
    let dispatcher = Arc::new(dispatcher);

    // Force metric registration before the first scrape
    metrics::REGISTRY.gather();

    let state = Arc::new(AppState::new(config.clone(), resolver, dispatcher, store));
    let app = create_router(state);

    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
