//! End-to-end tests for the HTTP boundary with an in-memory warehouse.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use call_ingest::timestamp::{CANONICAL_FORMAT, INVALID_TIMESTAMP};
use call_ingest::types::{ErrorProto, SUCCESS_MESSAGE};
use call_ingest::RowInsertError;
use common::{send, state_with, FakeWarehouse, Outcome};

#[tokio::test]
async fn placeholder_and_lead_defaults_end_to_end() {
  let warehouse = FakeWarehouse::new(Outcome::Accept);
  let (status, body) = send(
    state_with(warehouse.clone()),
    "POST",
    "/?disposition=NI&talkTime=--A--XX--B--&leadID=",
    r#"{"timestamp":"2023-06-01T12:00:00"}"#,
  )
  .await;

  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!({"status": "success", "message": SUCCESS_MESSAGE}));

  let rows = warehouse.rows();
  assert_eq!(rows.len(), 1);
  let row = &rows[0];
  assert_eq!(row.disposition.as_deref(), Some("Not Interested"));
  assert_eq!(row.talk_time_formatted, "0");
  assert_eq!(row.lead_id, "0");
  assert_eq!(row.date, "2023-06-01 12:00:00");
}

#[tokio::test]
async fn full_query_string_maps_onto_the_row() {
  let warehouse = FakeWarehouse::new(Outcome::Accept);
  let uri = "/?firstName=Ada&lastName=Lovelace&listDescription=Spring%20Promo\
             &dialedNumber=5550100&disposition=CALLBK&talkTime=95&termReason=AGENT\
             &callNote=call%20after%205&email=ada%40example.com&listID=300\
             &leadID=42&subscriberID=--A--subscriber_id--B--&leadType=warm&source=web";
  let (status, _) = send(state_with(warehouse.clone()), "POST", uri, "").await;
  assert_eq!(status, StatusCode::OK);

  let row = &warehouse.rows()[0];
  assert_eq!(row.first_name.as_deref(), Some("Ada"));
  assert_eq!(row.last_name.as_deref(), Some("Lovelace"));
  assert_eq!(row.list_description_formatted, "Spring Promo");
  assert_eq!(row.phone.as_deref(), Some("5550100"));
  assert_eq!(row.disposition.as_deref(), Some("Call Back"));
  assert_eq!(row.talk_time_formatted, "95");
  assert_eq!(row.term_reason_formatted, "AGENT");
  assert_eq!(row.call_notes_formatted, "call after 5");
  assert_eq!(row.email.as_deref(), Some("ada@example.com"));
  assert_eq!(row.list_id.as_deref(), Some("300"));
  assert_eq!(row.lead_id, "42");
  assert_eq!(row.subscriber_id_formatted, "");
  assert_eq!(row.lead_type.as_deref(), Some("warm"));
  assert_eq!(row.source.as_deref(), Some("web"));
}

#[tokio::test]
async fn missing_timestamp_defaults_to_now() {
  let warehouse = FakeWarehouse::new(Outcome::Accept);
  let (status, _) = send(state_with(warehouse.clone()), "POST", "/?disposition=B", "").await;
  assert_eq!(status, StatusCode::OK);

  let (status, _) = send(
    state_with(warehouse.clone()),
    "POST",
    "/?disposition=B",
    r#"{"timestamp":""}"#,
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  for row in warehouse.rows() {
    assert!(chrono::NaiveDateTime::parse_from_str(&row.date, CANONICAL_FORMAT).is_ok());
    assert_eq!(row.disposition.as_deref(), Some("Busy"));
  }
}

#[tokio::test]
async fn method_is_not_enforced() {
  let warehouse = FakeWarehouse::new(Outcome::Accept);
  let (status, _) = send(state_with(warehouse.clone()), "GET", "/?disposition=WN", "").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(warehouse.rows()[0].disposition.as_deref(), Some("Wrong Number"));
}

#[tokio::test]
async fn invalid_timestamp_is_400_and_nothing_is_written() {
  let warehouse = FakeWarehouse::new(Outcome::Accept);
  let (status, body) = send(
    state_with(warehouse.clone()),
    "POST",
    "/?disposition=NI",
    r#"{"timestamp":"not-a-date"}"#,
  )
  .await;

  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body, json!({"error": INVALID_TIMESTAMP}));
  assert!(warehouse.rows().is_empty());
}

#[tokio::test]
async fn rejected_row_is_400_with_errors_echoed() {
  let rejection = vec![RowInsertError {
    index: 0,
    errors: vec![ErrorProto {
      reason: Some("invalid".into()),
      location: Some("TalkTimeFormatted".into()),
      debug_info: None,
      message: Some("Cannot convert value to integer".into()),
    }],
  }];
  let warehouse = FakeWarehouse::new(Outcome::Reject(rejection));
  let (status, body) = send(state_with(warehouse), "POST", "/?talkTime=abc", "").await;

  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(
    body,
    json!({"errors": [{
      "index": 0,
      "errors": [{
        "reason": "invalid",
        "location": "TalkTimeFormatted",
        "message": "Cannot convert value to integer"
      }]
    }]})
  );
}

#[tokio::test]
async fn warehouse_failure_is_500() {
  let warehouse = FakeWarehouse::new(Outcome::Fail(404, "Not found: Table p:d.t"));
  let (status, body) = send(state_with(warehouse), "POST", "/?disposition=NI", "").await;

  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert_eq!(
    body["error"],
    "bigquery api returned 404: Not found: Table p:d.t"
  );
}

#[tokio::test]
async fn health_answers_ok() {
  let warehouse = FakeWarehouse::new(Outcome::Accept);
  let (status, _) = send(state_with(warehouse.clone()), "GET", "/health", "").await;
  assert_eq!(status, StatusCode::OK);
  assert!(warehouse.rows().is_empty());
}

#[tokio::test]
async fn basic_format_timestamp_is_accepted() {
  let warehouse = FakeWarehouse::new(Outcome::Accept);
  let (status, _) = send(
    state_with(warehouse.clone()),
    "POST",
    "/?disposition=DC",
    r#"{"timestamp":"20230601T120000"}"#,
  )
  .await;

  assert_eq!(status, StatusCode::OK);
  assert_eq!(warehouse.rows()[0].date, "2023-06-01 12:00:00");
}

#[tokio::test]
async fn loose_or_non_string_timestamps_are_400() {
  for body in [
    r#"{"timestamp":"2023-6-1T12:00:00"}"#,
    r#"{"timestamp":"2023-06-01Z"}"#,
    r#"{"timestamp":1700000000}"#,
    r#"{"timestamp":false}"#,
  ] {
    let warehouse = FakeWarehouse::new(Outcome::Accept);
    let (status, resp) = send(state_with(warehouse.clone()), "POST", "/?disposition=NI", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "body {body}");
    assert_eq!(resp, json!({"error": INVALID_TIMESTAMP}));
    assert!(warehouse.rows().is_empty());
  }
}
