//! Access tokens for the BigQuery REST API.

use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::WarehouseError;

/// Refresh this long before the metadata server says the token expires.
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

pub enum TokenSource {
  /// Fixed token, e.g. from `gcloud auth print-access-token`.
  Static(String),
  /// Default service account of the instance running us.
  Metadata(MetadataTokenSource),
}

impl TokenSource {
  pub async fn token(&self) -> Result<String, WarehouseError> {
    match self {
      Self::Static(token) => Ok(token.clone()),
      Self::Metadata(source) => source.token().await,
    }
  }
}

#[derive(Deserialize)]
struct MetadataToken {
  access_token: String,
  expires_in: u64,
}

struct CachedToken {
  value: String,
  refresh_at: Instant,
}

pub struct MetadataTokenSource {
  http: reqwest::Client,
  url: String,
  cached: Mutex<Option<CachedToken>>,
}

impl MetadataTokenSource {
  /// `host` is a bare `host[:port]`, as in `GCE_METADATA_HOST`.
  pub fn new(http: reqwest::Client, host: &str) -> Self {
    Self {
      http,
      url: format!("http://{host}/computeMetadata/v1/instance/service-accounts/default/token"),
      cached: Mutex::new(None),
    }
  }

  pub async fn token(&self) -> Result<String, WarehouseError> {
    // Held across the fetch so concurrent requests share one refresh.
    let mut cached = self.cached.lock().await;
    if let Some(token) = cached.as_ref() {
      if Instant::now() < token.refresh_at {
        return Ok(token.value.clone());
      }
    }

    let fetched = self.fetch().await?;
    let lifetime = Duration::from_secs(fetched.expires_in).saturating_sub(REFRESH_MARGIN);
    debug!(expires_in = fetched.expires_in, "fetched access token from metadata server");

    *cached = Some(CachedToken {
      value: fetched.access_token.clone(),
      refresh_at: Instant::now() + lifetime,
    });
    Ok(fetched.access_token)
  }

  async fn fetch(&self) -> Result<MetadataToken, WarehouseError> {
    let resp = self
      .http
      .get(&self.url)
      .header("Metadata-Flavor", "Google")
      .send()
      .await
      .map_err(|e| WarehouseError::Auth(format!("metadata server unreachable: {e}")))?;

    let status = resp.status();
    if !status.is_success() {
      return Err(WarehouseError::Auth(format!(
        "metadata server returned {}",
        status.as_u16()
      )));
    }

    resp
      .json::<MetadataToken>()
      .await
      .map_err(|e| WarehouseError::Auth(format!("malformed token response: {e}")))
  }
}
