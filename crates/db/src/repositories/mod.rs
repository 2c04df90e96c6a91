//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod appointment_repo;
pub mod company_repo;
pub mod profile_repo;
pub mod session_repo;
pub mod time_slot_repo;
pub mod user_repo;

pub use appointment_repo::AppointmentRepo;
pub use company_repo::CompanyRepo;
pub use profile_repo::ProfileRepo;
pub use session_repo::SessionRepo;
pub use time_slot_repo::TimeSlotRepo;
pub use user_repo::UserRepo;
