//! Banner and store connectivity check.

use axum::{extract::State, http::StatusCode};
use tracing::instrument;

use crate::state::AppState;

/// Root banner.
pub async fn root() -> &'static str {
    "NextShop API is running!"
}

/// Store connectivity check.
///
/// Runs a `ping` against the database. Returns 500 with a plain-text
/// message if the store does not answer.
#[instrument(skip(state))]
pub async fn ping(State(state): State<AppState>) -> (StatusCode, &'static str) {
    match state.products().ping().await {
        Ok(()) => (StatusCode::OK, "Pinged MongoDB successfully!"),
        Err(e) => {
            tracing::warn!(error = %e, "Store ping failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "MongoDB connection failed")
        }
    }
}
