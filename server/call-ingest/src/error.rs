//! Structured error types for the ingest path and their HTTP mapping.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use thiserror::Error;
use tracing::{error, info};

use crate::types::{ErrorBody, InsertErrorsBody, RowInsertError};

/// Failures talking to the warehouse (transport, auth, non-2xx answers).
#[derive(Debug, Error)]
pub enum WarehouseError {
  #[error("http: {0}")]
  Http(#[from] reqwest::Error),

  #[error("bigquery api returned {status}: {message}")]
  Api { status: u16, message: String },

  #[error("auth: {0}")]
  Auth(String),
}

/// Everything the handler can answer with besides 200.
#[derive(Debug, Error)]
pub enum IngestError {
  /// Client sent something we cannot interpret (400).
  #[error("{0}")]
  Validation(String),

  /// Warehouse accepted the request but rejected the row (400).
  #[error("warehouse rejected {} row(s)", .0.len())]
  InsertRejected(Vec<RowInsertError>),

  #[error("{0}")]
  Warehouse(#[from] WarehouseError),

  #[error("{0}")]
  Unexpected(String),
}

impl IngestError {
  pub fn validation(msg: impl Into<String>) -> Self {
    Self::Validation(msg.into())
  }

  pub fn unexpected(msg: impl Into<String>) -> Self {
    Self::Unexpected(msg.into())
  }

  pub fn status(&self) -> StatusCode {
    match self {
      Self::Validation(_) | Self::InsertRejected(_) => StatusCode::BAD_REQUEST,
      Self::Warehouse(_) | Self::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for IngestError {
  fn into_response(self) -> Response {
    let status = self.status();
    match self {
      Self::InsertRejected(errors) => {
        info!(rows = errors.len(), "insert rejected: {:?}", errors);
        (status, Json(InsertErrorsBody { errors })).into_response()
      }
      Self::Validation(msg) => {
        info!("client error: {}", msg);
        (status, Json(ErrorBody { error: msg })).into_response()
      }
      other => {
        let msg = other.to_string();
        error!("server error: {}", msg);
        (status, Json(ErrorBody { error: msg })).into_response()
      }
    }
  }
}
