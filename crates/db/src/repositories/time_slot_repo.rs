//! Repository for the `time_slots` table.

use careerkey_core::types::DbId;
use sqlx::PgPool;

use crate::models::time_slot::{CreateTimeSlot, TimeSlot};

const COLUMNS: &str = "id, company_id, start_time, end_time, capacity, created_at";

/// Provides reads (and a seeding insert) for time slots.
pub struct TimeSlotRepo;

impl TimeSlotRepo {
    /// Insert a time slot. Used for seeding and tests.
    pub async fn create(pool: &PgPool, input: &CreateTimeSlot) -> Result<TimeSlot, sqlx::Error> {
        let query = format!(
            "INSERT INTO time_slots (company_id, start_time, end_time, capacity)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TimeSlot>(&query)
            .bind(input.company_id)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(input.capacity)
            .fetch_one(pool)
            .await
    }

    /// List a company's slots ordered by start time.
    pub async fn list_by_company(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<Vec<TimeSlot>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM time_slots WHERE company_id = $1 ORDER BY start_time, id"
        );
        sqlx::query_as::<_, TimeSlot>(&query)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TimeSlot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM time_slots WHERE id = $1");
        sqlx::query_as::<_, TimeSlot>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
