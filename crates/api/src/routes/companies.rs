//! Route definitions for the `/companies` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::companies;
use crate::state::AppState;

/// Routes mounted at `/companies`.
///
/// ```text
/// GET /              -> list_companies
/// GET /{id}          -> get_company
/// GET /{id}/slots    -> list_company_slots
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(companies::list_companies))
        .route("/{id}", get(companies::get_company))
        .route("/{id}/slots", get(companies::list_company_slots))
}
