//! Taxi Ledger: a personal daily-earnings ledger.
//!
//! Days are kept in a local SQLite store keyed by date and can be backed up
//! to a single JSON file in the Google Drive app-data folder, merged with
//! last-write-wins.

pub mod backend;

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use crate::backend::{create_router, initialize_backend, LedgerConfig};

/// Load configuration, build the backend and serve the REST API until the
/// process is stopped.
pub async fn run() -> Result<()> {
    let config = LedgerConfig::load()?;
    let app_state = initialize_backend(&config).await?;
    let app = create_router(app_state);

    let addr: SocketAddr = config
        .bind_address
        .parse()
        .with_context(|| format!("Invalid bind address '{}'", config.bind_address))?;
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
