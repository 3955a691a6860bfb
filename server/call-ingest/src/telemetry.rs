//! Tracing subscriber setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init() -> Result<(), tracing_subscriber::util::TryInitError> {
  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
      format!("{}=debug,tower_http=debug", env!("CARGO_CRATE_NAME")).into()
    }))
    .with(tracing_subscriber::fmt::layer())
    .try_init()
}
