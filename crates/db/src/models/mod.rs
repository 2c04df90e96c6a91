//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` entity struct matching the database
//! row and, where the service writes the table, a create DTO.

pub mod appointment;
pub mod company;
pub mod profile;
pub mod session;
pub mod time_slot;
pub mod user;
