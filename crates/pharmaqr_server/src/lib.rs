//! HTTP surface for PharmaQR.
//!
//! # Routes
//! - `GET /`: entry form that posts to the JSON API and shows the code.
//! - `POST /api/tablets`: validate and store a record, returns its id.
//! - `GET /api/tablets/{id}`: stored record fields.
//! - `GET /api/qrcode/{id}`: PNG QR code (data URL) pointing at the info page.
//! - `GET /info/{id}`: public HTML info page with expiry banner.
//! - `GET /api/info/{id}`: the same display model as JSON.
//! - `GET /health`: liveness probe.
//!
//! The storage handle is opened once by the caller and passed in through
//! [`AppState`]; handlers never reach for a global.

use std::{sync::Arc, time::Duration};

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use log::{error, info};
use signal::ctrl_c;
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};

pub mod config;
pub mod error;
pub mod render;
pub mod routes;
pub mod state;

pub use config::{Config, ConfigError};
pub use error::ApiError;
pub use state::AppState;

use routes::{
    create_tablet_handler, get_tablet_handler, health_handler, index_handler, info_json_handler,
    info_page_handler, qrcode_handler,
};

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/tablets", post(create_tablet_handler))
        .route("/api/tablets/:id", get(get_tablet_handler))
        .route("/api/qrcode/:id", get(qrcode_handler))
        .route("/api/info/:id", get(info_json_handler))
        .route("/info/:id", get(info_page_handler))
        .layer(cors)
        .with_state(state)
}

/// Serves the router on `listener` until Ctrl+C or SIGTERM.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    let address = listener.local_addr()?;
    info!("event=server_start module=server status=ok address={address}");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("event=shutdown module=server signal=ctrl_c"),
            Err(err) => {
                error!("event=shutdown module=server status=error error={err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use signal::unix::SignalKind;

        match signal::unix::signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("event=shutdown module=server signal=terminate");
            }
            Err(err) => {
                error!("event=shutdown module=server status=error error={err}");
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
