//! Client-side core of CareerKey.
//!
//! Views hold their own state and catch every backend failure at the call
//! site, keeping the message for display. They talk to the service through
//! the [`backend::Backend`] trait; [`http::HttpBackend`] is the production
//! implementation.

pub mod backend;
pub mod config;
pub mod confirmation;
pub mod error;
pub mod home;
pub mod http;
pub mod schedule;
pub mod session;
pub mod store;

#[cfg(test)]
pub(crate) mod fake;
