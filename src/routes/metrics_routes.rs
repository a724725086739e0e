//! Metrics relay endpoint.

use std::time::Instant;

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Router};
use tracing::{debug, warn};

use crate::relay::{self, RelayError};
use crate::state::AppState;
use crate::utils::http_helpers::APPLICATION_JSON;

/// Registers the metrics route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/metrics", get(metrics_handler))
}

/// Runs the collector and relays its stdout as-is, or a JSON error with a 500.
async fn metrics_handler(State(state): State<AppState>) -> Result<Response, RelayError> {
    let started = Instant::now();

    match relay::collect(state.collector.as_ref()).await {
        Ok(body) => {
            debug!(
                bytes = body.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Relaying collector output"
            );
            Ok((StatusCode::OK, [(CONTENT_TYPE, APPLICATION_JSON)], body).into_response())
        }
        Err(e) => {
            warn!(
                error_type = e.kind(),
                error = %e,
                command = %state.collector.describe(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Metrics collection failed"
            );
            Err(e)
        }
    }
}
