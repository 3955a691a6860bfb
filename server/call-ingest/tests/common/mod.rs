//! Shared helpers for the HTTP integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use call_ingest::{AppState, CallRecord, RowInsertError, Warehouse, WarehouseError};

/// What the fake answers with on every insert.
pub enum Outcome {
  Accept,
  Reject(Vec<RowInsertError>),
  Fail(u16, &'static str),
}

/// In-memory warehouse that records every row it is handed.
pub struct FakeWarehouse {
  outcome: Outcome,
  rows: Mutex<Vec<CallRecord>>,
}

impl FakeWarehouse {
  pub fn new(outcome: Outcome) -> Arc<Self> {
    Arc::new(Self {
      outcome,
      rows: Mutex::new(Vec::new()),
    })
  }

  pub fn rows(&self) -> Vec<CallRecord> {
    self.rows.lock().unwrap().clone()
  }
}

#[async_trait]
impl Warehouse for FakeWarehouse {
  async fn insert_row(&self, record: &CallRecord) -> Result<Vec<RowInsertError>, WarehouseError> {
    self.rows.lock().unwrap().push(record.clone());
    match &self.outcome {
      Outcome::Accept => Ok(vec![]),
      Outcome::Reject(errors) => Ok(errors.clone()),
      Outcome::Fail(status, message) => Err(WarehouseError::Api {
        status: *status,
        message: message.to_string(),
      }),
    }
  }
}

pub fn state_with(warehouse: Arc<dyn Warehouse>) -> Arc<AppState> {
  Arc::new(AppState::new(warehouse))
}

/// Send one request through the router and decode the JSON answer.
pub async fn send(
  state: Arc<AppState>,
  method: &str,
  uri: &str,
  body: &str,
) -> (StatusCode, serde_json::Value) {
  let request = Request::builder()
    .method(method)
    .uri(uri)
    .header("content-type", "application/json")
    .body(Body::from(body.to_string()))
    .unwrap();

  let response = call_ingest::router(state).oneshot(request).await.unwrap();
  let status = response.status();
  let bytes = response.into_body().collect().await.unwrap().to_bytes();
  let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
  (status, json)
}
