//! Route definitions for the `/slots` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::slots;
use crate::state::AppState;

/// Routes mounted at `/slots`.
///
/// ```text
/// GET  /{id}        -> get_slot
/// POST /{id}/book   -> book_slot
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(slots::get_slot))
        .route("/{id}/book", post(slots::book_slot))
}
