//! Warehouse collaborator: one-row streaming insert into BigQuery.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::auth::TokenSource;
use crate::error::WarehouseError;
use crate::types::{CallRecord, RowInsertError};

pub const DEFAULT_API_BASE: &str = "https://bigquery.googleapis.com/bigquery/v2";

/// Insert one row and report per-row errors; an empty list means the row landed.
/// Implementations are shared by every request, so they must be thread-safe.
#[async_trait]
pub trait Warehouse: Send + Sync {
  async fn insert_row(&self, record: &CallRecord) -> Result<Vec<RowInsertError>, WarehouseError>;
}

// ---------------------------------------------------------------------------
// Table reference
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid table id {0:?}: expected project.dataset.table")]
pub struct TableRefError(String);

/// Fully qualified `project.dataset.table`. Domain-scoped projects
/// (`example.com:proj`) keep their dots, so the id is split from the right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
  pub project: String,
  pub dataset: String,
  pub table: String,
}

impl FromStr for TableRef {
  type Err = TableRefError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let mut parts = s.rsplitn(3, '.');
    let (Some(table), Some(dataset), Some(project)) = (parts.next(), parts.next(), parts.next())
    else {
      return Err(TableRefError(s.to_string()));
    };
    if [project, dataset, table].iter().any(|p| p.trim().is_empty()) {
      return Err(TableRefError(s.to_string()));
    }
    Ok(Self {
      project: project.to_string(),
      dataset: dataset.to_string(),
      table: table.to_string(),
    })
  }
}

impl fmt::Display for TableRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{}.{}", self.project, self.dataset, self.table)
  }
}

impl TableRef {
  pub fn insert_all_url(&self, api_base: &str) -> String {
    format!(
      "{}/projects/{}/datasets/{}/tables/{}/insertAll",
      api_base.trim_end_matches('/'),
      self.project,
      self.dataset,
      self.table
    )
  }
}

// ---------------------------------------------------------------------------
// BigQuery REST client
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct InsertAllRequest<'a> {
  rows: Vec<InsertRow<'a>>,
}

#[derive(Serialize)]
struct InsertRow<'a> {
  #[serde(rename = "insertId")]
  insert_id: String,
  json: &'a CallRecord,
}

#[derive(Deserialize)]
struct InsertAllResponse {
  #[serde(default, rename = "insertErrors")]
  insert_errors: Vec<RowInsertError>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
  error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
  message: String,
}

/// `tabledata.insertAll` client. Built once per process; `reqwest::Client`
/// pools connections internally.
pub struct BigQueryClient {
  http: reqwest::Client,
  insert_url: String,
  table: TableRef,
  tokens: TokenSource,
}

impl BigQueryClient {
  pub fn new(http: reqwest::Client, api_base: &str, table: TableRef, tokens: TokenSource) -> Self {
    Self {
      insert_url: table.insert_all_url(api_base),
      http,
      table,
      tokens,
    }
  }
}

#[async_trait]
impl Warehouse for BigQueryClient {
  async fn insert_row(&self, record: &CallRecord) -> Result<Vec<RowInsertError>, WarehouseError> {
    let token = self.tokens.token().await?;
    let body = InsertAllRequest {
      rows: vec![InsertRow {
        insert_id: Uuid::new_v4().to_string(),
        json: record,
      }],
    };

    let resp = self
      .http
      .post(&self.insert_url)
      .bearer_auth(token)
      .json(&body)
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      let text = resp.text().await.unwrap_or_default();
      let message = serde_json::from_str::<ApiErrorBody>(&text)
        .map(|b| b.error.message)
        .unwrap_or(text);
      return Err(WarehouseError::Api {
        status: status.as_u16(),
        message,
      });
    }

    let parsed: InsertAllResponse = resp.json().await?;
    debug!(
      table = %self.table,
      insert_errors = parsed.insert_errors.len(),
      "insertAll completed"
    );
    Ok(parsed.insert_errors)
  }
}
