//! Router, middleware and the serve loop.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use axum::{
  extract::Request,
  routing::{any, get},
  Router,
};
use tokio::signal;
use tower_http::{
  cors::CorsLayer,
  trace::{DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
  LatencyUnit,
};
use tracing::{error, info, info_span, Level};

use crate::handlers;
use crate::state::AppState;

/// `/` takes the event regardless of method; `/health` is for probes.
pub fn router(state: Arc<AppState>) -> Router {
  Router::new()
    .route("/", any(handlers::insert_call_event))
    .route("/health", get(handlers::health))
    .layer(
      TraceLayer::new_for_http()
        .make_span_with(|request: &Request<_>| {
          info_span!(
            "http_request",
            method = ?request.method(),
            uri = ?request.uri(),
          )
        })
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(
          DefaultOnResponse::new()
            .level(Level::INFO)
            .latency_unit(LatencyUnit::Millis),
        )
        .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
    )
    .layer(CorsLayer::permissive())
    .with_state(state)
}

/// Serve until SIGINT/SIGTERM, then drain in-flight requests.
pub async fn serve(addr: &str, state: Arc<AppState>) -> Result<()> {
  let listener = tokio::net::TcpListener::bind(addr)
    .await
    .with_context(|| format!("Failed to bind to address: {addr}"))?;

  info!(
    "call-ingest listening on http://{}",
    listener.local_addr().context("Failed to get local address")?
  );

  axum::serve(listener, router(state))
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

  info!("call-ingest shut down");
  Ok(())
}

async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = signal::ctrl_c().await {
      error!("failed to listen for Ctrl+C: {}", e);
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
      Ok(mut sig) => {
        sig.recv().await;
      }
      Err(e) => {
        error!("failed to install SIGTERM handler: {}", e);
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    _ = ctrl_c => {},
    _ = terminate => {},
  }
  info!("shutdown signal received, draining connections");
}
