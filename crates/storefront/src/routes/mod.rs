//! HTTP routes for the form glue server.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                -> liveness check
//! POST /api/save-order        -> order summary row in the "orders" sheet
//! POST /api/submit-interest   -> interest row in the "interest" sheet
//! POST /api/sendmail          -> contact mail to the shop inbox
//! ```

pub mod forms;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the glue router with state applied.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/save-order", post(forms::save_order))
        .route("/api/submit-interest", post(forms::submit_interest))
        .route("/api/sendmail", post(forms::send_mail))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
