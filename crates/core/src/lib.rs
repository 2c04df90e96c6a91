//! Domain logic shared by the CareerKey service and client.
//!
//! Nothing in this crate performs I/O. Storage seams are expressed as traits
//! (see [`profile::ProfileStore`]) so the same algorithms run against
//! PostgreSQL in the service and against in-memory fakes in tests.

pub mod availability;
pub mod error;
pub mod ics;
pub mod navigation;
pub mod profile;
pub mod roles;
pub mod student;
pub mod timezone;
pub mod types;
