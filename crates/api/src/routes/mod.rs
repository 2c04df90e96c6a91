pub mod appointments;
pub mod auth;
pub mod companies;
pub mod health;
pub mod profile;
pub mod slots;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup                          sign up (public)
/// /auth/login                           login (public)
/// /auth/refresh                         refresh (public)
/// /auth/logout                          logout (requires auth)
/// /auth/session                         current identity (requires auth)
///
/// /me/profile                           resolve own profile (requires auth)
///
/// /companies                            list
/// /companies/{id}                       get
/// /companies/{id}/slots                 slots with availability
///
/// /slots/{id}                           get
/// /slots/{id}/book                      book (POST)
///
/// /appointments/{id}/calendar.ics       calendar download
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/me", profile::router())
        .nest("/companies", companies::router())
        .nest("/slots", slots::router())
        .nest("/appointments", appointments::router())
}
