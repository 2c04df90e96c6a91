//! Repository for the `appointments` table.

use careerkey_core::availability::STATUS_BOOKED;
use careerkey_core::types::DbId;
use sqlx::PgPool;

use crate::models::appointment::Appointment;

const COLUMNS: &str = "id, slot_id, student_id, status, created_at";

/// Appointment reads plus the `book_slot` procedure call.
pub struct AppointmentRepo;

impl AppointmentRepo {
    /// Slot id of every `booked` appointment in `slot_ids`, one entry per
    /// appointment. Callers group these into per-slot counts.
    pub async fn booked_slot_ids(
        pool: &PgPool,
        slot_ids: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT slot_id FROM appointments WHERE slot_id = ANY($1) AND status = $2",
        )
        .bind(slot_ids)
        .bind(STATUS_BOOKED)
        .fetch_all(pool)
        .await
    }

    /// Call the atomic `book_slot` SQL function and return the new
    /// appointment id.
    ///
    /// Rejections (full slot, unknown slot, repeat booking) surface as
    /// `sqlx::Error::Database` carrying the procedure's message.
    pub async fn book_slot(
        pool: &PgPool,
        slot_id: DbId,
        student_id: &str,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT book_slot($1, $2)")
            .bind(slot_id)
            .bind(student_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Appointment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM appointments WHERE id = $1");
        sqlx::query_as::<_, Appointment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
