//! Normalize query parameters into the warehouse row.

use crate::disposition;
use crate::types::{CallEventParams, CallRecord};

/// Markers the dialer leaves in fields it never filled in.
pub const PLACEHOLDER_OPEN: &str = "--A--";
pub const PLACEHOLDER_CLOSE: &str = "--B--";

pub const DEFAULT_TALK_TIME: &str = "0";
pub const DEFAULT_LEAD_ID: &str = "0";

/// True when the value still carries both placeholder markers.
pub fn is_placeholder(value: &str) -> bool {
  value.contains(PLACEHOLDER_OPEN) && value.contains(PLACEHOLDER_CLOSE)
}

/// Replace an unfilled placeholder with `default`; keep anything else.
pub fn transform_field(value: &str, default: &str) -> String {
  if is_placeholder(value) {
    default.to_string()
  } else {
    value.to_string()
  }
}

/// Like [`transform_field`], with an absent parameter resolving to `default`.
fn transform_param(value: Option<&str>, default: &str) -> String {
  value.map_or_else(|| default.to_string(), |v| transform_field(v, default))
}

/// Build the row from the request parameters and an already-resolved date.
pub fn assemble(params: &CallEventParams, date: String) -> CallRecord {
  let lead_id = params
    .lead_id
    .as_deref()
    .filter(|id| !id.is_empty())
    .unwrap_or(DEFAULT_LEAD_ID)
    .to_string();

  CallRecord {
    date,
    first_name: params.first_name.clone(),
    last_name: params.last_name.clone(),
    call_notes_formatted: transform_param(params.call_note.as_deref(), ""),
    phone: params.dialed_number.clone(),
    email: params.email.clone(),
    list_id: params.list_id.clone(),
    disposition: params
      .disposition
      .as_deref()
      .map(|code| disposition::translate(code).to_string()),
    lead_id,
    talk_time_formatted: transform_param(params.talk_time.as_deref(), DEFAULT_TALK_TIME),
    term_reason_formatted: transform_param(params.term_reason.as_deref(), ""),
    subscriber_id_formatted: transform_param(params.subscriber_id.as_deref(), ""),
    list_description_formatted: transform_param(params.list_description.as_deref(), ""),
    lead_type: params.lead_type.clone(),
    source: params.source.clone(),
  }
}
