//! Binary entrypoint for the call ingest service.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use tracing::info;

use call_ingest::{server, telemetry, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
  telemetry::init().context("Failed to initialise tracing")?;

  info!(
    "Starting {} version {}",
    env!("CARGO_PKG_NAME"),
    env!("CARGO_PKG_VERSION")
  );

  let config = Config::from_env().context("Invalid configuration")?;
  info!(table = %config.table, "writing rows to BigQuery");

  let state = AppState::from_config(&config).context("Failed to build BigQuery client")?;
  server::serve(&config.bind_addr(), Arc::new(state)).await
}
