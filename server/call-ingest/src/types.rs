//! Request/response types for the ingest service (JSON contracts + the warehouse row).

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Inbound (query string)
// ---------------------------------------------------------------------------

/// Query parameters of one call event. Every field is optional at this layer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallEventParams {
  pub first_name: Option<String>,
  pub last_name: Option<String>,
  pub list_description: Option<String>,
  pub dialed_number: Option<String>,
  pub disposition: Option<String>,
  pub talk_time: Option<String>,
  pub term_reason: Option<String>,
  pub call_note: Option<String>,
  pub email: Option<String>,
  #[serde(rename = "listID")]
  pub list_id: Option<String>,
  #[serde(rename = "leadID")]
  pub lead_id: Option<String>,
  #[serde(rename = "subscriberID")]
  pub subscriber_id: Option<String>,
  pub lead_type: Option<String>,
  pub source: Option<String>,
}

// ---------------------------------------------------------------------------
// Warehouse row
// ---------------------------------------------------------------------------

/// One denormalized row of the call table. Field order matches the table schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CallRecord {
  pub date: String,
  pub first_name: Option<String>,
  pub last_name: Option<String>,
  pub call_notes_formatted: String,
  pub phone: Option<String>,
  pub email: Option<String>,
  #[serde(rename = "ListID")]
  pub list_id: Option<String>,
  pub disposition: Option<String>,
  #[serde(rename = "LeadID")]
  pub lead_id: String,
  pub talk_time_formatted: String,
  pub term_reason_formatted: String,
  #[serde(rename = "SubscriberIDFormatted")]
  pub subscriber_id_formatted: String,
  pub list_description_formatted: String,
  pub lead_type: Option<String>,
  pub source: Option<String>,
}

/// Per-row failure reported by the warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowInsertError {
  pub index: u32,
  #[serde(default)]
  pub errors: Vec<ErrorProto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorProto {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub reason: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub location: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub debug_info: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------

pub const SUCCESS_MESSAGE: &str = "Data inserted into BigQuery successfully";

#[derive(Debug, Serialize)]
pub struct SuccessBody {
  pub status: &'static str,
  pub message: &'static str,
}

impl SuccessBody {
  pub fn inserted() -> Self {
    Self {
      status: "success",
      message: SUCCESS_MESSAGE,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
  pub error: String,
}

#[derive(Debug, Serialize)]
pub struct InsertErrorsBody {
  pub errors: Vec<RowInsertError>,
}
