pub mod appointments;
pub mod auth;
pub mod companies;
pub mod profile;
pub mod slots;
