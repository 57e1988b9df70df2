//! PharmaQR server entry point.
//!
//! # Responsibility
//! - Load configuration, start logging and open the tablet store.
//! - Announce reachable URLs and serve until shutdown.

use std::process::ExitCode;

use log::{error, info};
use pharmaqr_core::db::open_db;
use pharmaqr_server::{AppState, Config};
use tokio::net::TcpListener;

mod net;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=startup module=cli status=error error={message}");
            eprintln!("pharmaqr: {message}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), String> {
    let config = Config::load().map_err(|err| err.to_string())?;
    pharmaqr_core::init_logging(&config.log_level, &config.log_dir.to_string_lossy())?;

    info!(
        "event=startup module=cli status=ok version={} db_path={}",
        pharmaqr_core::core_version(),
        config.db_path.display()
    );
    if !config.defaulted.is_empty() {
        info!(
            "event=config_defaults module=cli keys={}",
            config.defaulted.join(",")
        );
    }

    let conn = open_db(&config.db_path).map_err(|err| err.to_string())?;
    let listener = TcpListener::bind(config.bind_address())
        .await
        .map_err(|err| format!("cannot bind {}: {err}", config.bind_address()))?;

    println!("PharmaQR {}", pharmaqr_core::core_version());
    for url in net::announced_urls(net::local_ip(), config.port) {
        println!("  serving on {url}");
    }
    println!("  database: {}", config.db_path.display());
    if let Some((level, log_dir)) = pharmaqr_core::logging_status() {
        println!("  logs: {} (level {level})", log_dir.display());
    }

    pharmaqr_server::serve(listener, AppState::new(config, conn))
        .await
        .map_err(|err| err.to_string())
}
