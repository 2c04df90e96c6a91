//! Time slot entity model and DTOs.

use careerkey_core::availability::BookableSlot;
use careerkey_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `time_slots` table. Availability is derived, never stored.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TimeSlot {
    pub id: DbId,
    pub company_id: DbId,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub capacity: i32,
    pub created_at: Timestamp,
}

impl BookableSlot for TimeSlot {
    fn slot_id(&self) -> DbId {
        self.id
    }

    fn capacity(&self) -> i32 {
        self.capacity
    }

    fn start_time(&self) -> Timestamp {
        self.start_time
    }
}

/// DTO for creating a time slot.
#[derive(Debug)]
pub struct CreateTimeSlot {
    pub company_id: DbId,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub capacity: i32,
}
