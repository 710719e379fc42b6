//! HTTP API surface for HRMS Lite.
//!
//! Thin translation layer: each route performs one directory/ledger call
//! against `hrms_core` and wraps the outcome in the uniform JSON envelope.
//! All business invariants live in the core crate.

use log::{error, info};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;

pub mod config;
pub mod envelope;
pub mod error;
pub mod routes;
pub mod state;

use config::Config;
use state::AppState;

/// Binds the listener and serves until shutdown. Failure to bind is fatal
/// by design: the process exits rather than serving nothing.
pub async fn start_server(config: Config, state: Arc<AppState>) {
    let app = routes::app(state);
    let address = format!("0.0.0.0:{}", config.port);

    let listener = match TcpListener::bind(&address).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("event=server_start module=api status=fatal address={address} error={err}");
            eprintln!("failed to bind {address}: {err}");
            std::process::exit(1);
        }
    };
    info!("event=server_start module=api status=ok address={address}");

    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("event=server_stop module=api status=error error={err}");
        std::process::exit(1);
    }

    info!("event=server_stop module=api status=ok");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if ctrl_c().await.is_ok() {
            info!("event=shutdown_signal module=api status=ok signal=ctrl_c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("event=shutdown_signal module=api status=ok signal=terminate");
            }
            Err(err) => {
                error!("event=shutdown_signal module=api status=error error={err}");
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
