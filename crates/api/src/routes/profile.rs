//! Route definitions for the caller's own resources, mounted at `/me`.

use axum::routing::get;
use axum::Router;

use crate::handlers::profile;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/profile", get(profile::get_my_profile))
}
