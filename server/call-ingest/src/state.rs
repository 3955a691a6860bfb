//! Process-wide state shared by every request.

use std::sync::Arc;

use crate::auth::{MetadataTokenSource, TokenSource};
use crate::config::Config;
use crate::warehouse::{BigQueryClient, Warehouse};

pub struct AppState {
  pub warehouse: Arc<dyn Warehouse>,
}

impl AppState {
  pub fn new(warehouse: Arc<dyn Warehouse>) -> Self {
    Self { warehouse }
  }

  /// Build the BigQuery-backed state once at startup.
  pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
    let http = reqwest::Client::builder()
      .timeout(config.request_timeout)
      .build()?;

    let tokens = match &config.access_token {
      Some(token) => TokenSource::Static(token.clone()),
      None => TokenSource::Metadata(MetadataTokenSource::new(http.clone(), &config.metadata_host)),
    };

    let client = BigQueryClient::new(http, &config.api_base, config.table.clone(), tokens);
    Ok(Self::new(Arc::new(client)))
  }
}
