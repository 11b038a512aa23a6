//! Initiative Tracker Server: live shared encounter sessions
//!
//! Main entry point that wires all crates together and starts the server.

use std::future::IntoFuture;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

use initiative_api::{AppState, build_app};
use initiative_core::config::AppConfig;
use initiative_core::{AppError, AppResult};

/// Environment variable selecting the `config/{env}` overlay.
const ENV_VAR: &str = "INITIATIVE_ENV";

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from files and environment
fn load_configuration() -> AppResult<AppConfig> {
    let env = std::env::var(ENV_VAR).unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> AppResult<()> {
    tracing::info!("Starting Initiative Tracker v{}", env!("CARGO_PKG_VERSION"));

    let bind_address = config.server.bind_address();
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);

    let state = AppState::new(config);
    let realtime = state.realtime.clone();
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {bind_address}: {e}")))?;

    tracing::info!("Listening on {}", bind_address);

    let shutdown = realtime.shutdown_token();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received");
            realtime.shutdown();
        })
        .into_future();
    tokio::pin!(server);

    let grace_elapsed = async {
        shutdown.cancelled().await;
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        result = &mut server => {
            result.map_err(|e| AppError::internal(format!("Server error: {e}")))?;
        }
        _ = grace_elapsed => {
            tracing::warn!(grace_seconds = grace.as_secs(), "Grace period elapsed, forcing shutdown");
        }
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
