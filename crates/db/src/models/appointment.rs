//! Appointment entity model.
//!
//! Appointments are created exclusively by the `book_slot` SQL function, so
//! there is no create DTO.

use careerkey_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `appointments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Appointment {
    pub id: DbId,
    pub slot_id: DbId,
    pub student_id: String,
    pub status: String,
    pub created_at: Timestamp,
}
