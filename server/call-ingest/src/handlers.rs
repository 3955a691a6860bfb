//! HTTP handlers for the ingest service.

use axum::{
  body::Bytes,
  extract::{rejection::QueryRejection, Query, State},
  Json,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::IngestError;
use crate::normalize;
use crate::state::AppState;
use crate::timestamp::{self, INVALID_TIMESTAMP};
use crate::types::{CallEventParams, SuccessBody};

pub async fn health() -> &'static str {
  "ok"
}

/// Normalize one call event from the query string and stream it into the warehouse.
pub async fn insert_call_event(
  State(state): State<Arc<AppState>>,
  params: Result<Query<CallEventParams>, QueryRejection>,
  body: Bytes,
) -> Result<Json<SuccessBody>, IngestError> {
  let Query(params) = params.map_err(|e| IngestError::unexpected(e.body_text()))?;

  let date = match timestamp_from_body(&body)? {
    Some(raw) if !raw.is_empty() => timestamp::resolve_timestamp(Some(raw.as_str()))?,
    _ => timestamp::now_canonical(),
  };

  let record = normalize::assemble(&params, date);
  debug!(
    date = %record.date,
    disposition = ?record.disposition,
    lead_id = %record.lead_id,
    "assembled call record"
  );

  let errors = state.warehouse.insert_row(&record).await?;
  if !errors.is_empty() {
    return Err(IngestError::InsertRejected(errors));
  }

  info!(lead_id = %record.lead_id, "call event inserted");
  Ok(Json(SuccessBody::inserted()))
}

/// Pull `timestamp` out of an optional JSON body. Bodies that are empty, not
/// JSON, or not an object carry no timestamp; a non-string value is invalid.
fn timestamp_from_body(body: &[u8]) -> Result<Option<String>, IngestError> {
  if body.is_empty() {
    return Ok(None);
  }
  let Ok(value) = serde_json::from_slice::<Value>(body) else {
    debug!("ignoring non-JSON request body");
    return Ok(None);
  };
  match value.get("timestamp") {
    None | Some(Value::Null) => Ok(None),
    Some(Value::String(s)) => Ok(Some(s.clone())),
    Some(_) => Err(IngestError::validation(INVALID_TIMESTAMP)),
  }
}
