//! Route definitions for the `/appointments` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::appointments;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/calendar.ics", get(appointments::download_calendar))
}
