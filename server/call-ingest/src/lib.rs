//! Call Ingest Service
//!
//! HTTP handler that turns one call-center event (query params + optional JSON
//! timestamp) into one BigQuery row: placeholder fields are defaulted,
//! disposition codes translated, the timestamp validated or defaulted to now.

pub mod auth;
pub mod config;
pub mod disposition;
pub mod error;
mod handlers;
pub mod normalize;
pub mod server;
pub mod state;
pub mod telemetry;
pub mod timestamp;
pub mod types;
pub mod warehouse;

pub use config::Config;
pub use error::{IngestError, WarehouseError};
pub use handlers::{health, insert_call_event};
pub use server::router;
pub use state::AppState;
pub use types::{CallEventParams, CallRecord, RowInsertError};
pub use warehouse::{BigQueryClient, TableRef, Warehouse};
