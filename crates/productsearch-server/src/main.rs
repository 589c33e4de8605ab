//! # Product Search Server
//!
//! Main entry point for the Product Search application.

use productsearch_config::{AppConfig, ConfigLoader};
use productsearch_core::{telemetry, ProductSearchError, ProductSearchResult};
use productsearch_repository::DatabasePoolInterface;
use productsearch_rest::create_router;
use productsearch_server::{di::build_app_module, startup};
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Logging depends on configuration, so load failures go to stderr.
    let config = match load_config().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = telemetry::init_tracing(
        &config.observability.log_level,
        config.observability.log_format,
    ) {
        eprintln!("{e}");
    }

    startup::print_banner();
    info!("Starting Product Search Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(config).await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn load_config() -> ProductSearchResult<AppConfig> {
    let loader = ConfigLoader::from_default_location()?;
    Ok(loader.get().await)
}

async fn run(config: AppConfig) -> ProductSearchResult<()> {
    let module = build_app_module(&config.database).await?;
    let router = create_router(module.app_state(), &config.server);

    let rest_addr = config.server.rest_addr();
    let listener = tokio::net::TcpListener::bind(&rest_addr)
        .await
        .map_err(|e| ProductSearchError::Internal(format!("Failed to bind {rest_addr}: {e}")))?;

    startup::print_startup_info(&config);

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ProductSearchError::Internal(format!("REST server error: {e}")));

    module.pool().close().await;
    info!("Server shutdown complete");
    served
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
