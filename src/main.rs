// src/main.rs

//! # Certificate Verification Simulator - Main Entry Point
//!
//! Loads configuration, starts the session timer loop, logs workflow events
//! and serves the HTTP API.
//!
//! ## Environment Variables
//! - `RUST_LOG`: log filter (default `info`)
//! - `CERTVERIFY_SERVER__HOST` / `CERTVERIFY_SERVER__PORT`: bind address
//!   (default 127.0.0.1:3000)
//! - `CERTVERIFY_UPLOAD__MAX_SIZE_BYTES`: upload limit (default 10 MiB)
//! - `CERTVERIFY_TIMINGS__*_MS`: simulated step pacing
//! - `CERTVERIFY_RANDOM_SEED`: (Optional) fixed seed for reproducible runs

use anyhow::Context;
use cert_verify_sim::config::Settings;
use cert_verify_sim::scheduler::driver::SessionDriver;
use cert_verify_sim::services::api_server::ApiServer;
use cert_verify_sim::services::workflow_controller::WorkflowController;
use dotenv::dotenv;
use log::{debug, info, warn};
use tokio::sync::broadcast::error::RecvError;

/// Main application entry point
///
/// # Initialization Sequence
/// 1. Load `.env` and initialise logging
/// 2. Load layered settings
/// 3. Start the session driver and an event logger
/// 4. Start API server
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::load().context("failed to load configuration")?;
    debug!("loaded settings: {:?}", settings);

    let driver = SessionDriver::new(WorkflowController::from_settings(&settings));
    let _timer_loop = driver.spawn();

    // Mirror every workflow event into the log
    let mut events = driver.subscribe().await;
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => debug!("workflow event: {:?}", event),
                Err(RecvError::Lagged(missed)) => warn!("event logger missed {} events", missed),
                Err(RecvError::Closed) => break,
            }
        }
    });

    let addr = settings.socket_addr();
    info!("Available endpoints:");
    info!("- GET  /session");
    info!("- POST /session/upload");
    info!("- POST /session/proceed | /session/advance | /session/reset");
    info!("- GET  /statistics | /institutions | /fraud-alerts | /certificates");
    info!("- GET  /sample-certificates | /charts");

    ApiServer::new(driver)
        .run(addr)
        .await
        .with_context(|| format!("API server on {} failed", addr))
}
