//! Process configuration, read once from the environment at startup.

use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::warehouse::{TableRef, TableRefError, DEFAULT_API_BASE};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_METADATA_HOST: &str = "metadata.google.internal";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("{0} must be set")]
  Missing(&'static str),

  #[error("{var}: {reason}")]
  Invalid { var: &'static str, reason: String },

  #[error(transparent)]
  Table(#[from] TableRefError),
}

#[derive(Debug, Clone)]
pub struct Config {
  pub host: String,
  pub port: u16,
  /// Destination table, `BIGQUERY_TABLE_ID`. Required.
  pub table: TableRef,
  /// BigQuery REST root; override to point at an emulator.
  pub api_base: String,
  /// Static bearer token. When unset, tokens come from the metadata server.
  pub access_token: Option<String>,
  pub metadata_host: String,
  /// Upper bound for one outbound call to BigQuery or the metadata server.
  pub request_timeout: Duration,
}

impl Config {
  pub fn from_env() -> Result<Self, ConfigError> {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  /// Build from any key lookup. Empty values count as unset.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let table = get("BIGQUERY_TABLE_ID")
      .ok_or(ConfigError::Missing("BIGQUERY_TABLE_ID"))?
      .parse::<TableRef>()?;

    let port = match get("PORT") {
      Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
        var: "PORT",
        reason: e.to_string(),
      })?,
      None => {
        debug!("Using default port: {DEFAULT_PORT}");
        DEFAULT_PORT
      }
    };

    let timeout_secs = match get("REQUEST_TIMEOUT_SECS") {
      Some(raw) => raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
        var: "REQUEST_TIMEOUT_SECS",
        reason: e.to_string(),
      })?,
      None => DEFAULT_REQUEST_TIMEOUT_SECS,
    };

    Ok(Self {
      host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
      port,
      table,
      api_base: get("BIGQUERY_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
      access_token: get("BIGQUERY_ACCESS_TOKEN"),
      metadata_host: get("GCE_METADATA_HOST").unwrap_or_else(|| DEFAULT_METADATA_HOST.to_string()),
      request_timeout: Duration::from_secs(timeout_secs),
    })
  }

  pub fn bind_addr(&self) -> String {
    format!("{}:{}", self.host, self.port)
  }
}
