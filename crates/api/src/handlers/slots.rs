//! Handlers for the `/slots` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use careerkey_core::error::CoreError;
use careerkey_core::student::AnonymousStudentId;
use careerkey_core::types::DbId;
use careerkey_db::models::time_slot::TimeSlot;
use careerkey_db::repositories::{AppointmentRepo, TimeSlotRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /slots/{id}/book`.
#[derive(Debug, Deserialize)]
pub struct BookSlotRequest {
    pub student_id: String,
}

/// Payload returned after a successful booking.
#[derive(Debug, Serialize)]
pub struct BookingCreated {
    pub appointment_id: DbId,
}

/// GET /api/v1/slots/{id}
pub async fn get_slot(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TimeSlot>>> {
    let slot = TimeSlotRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "TimeSlot",
            id,
        }))?;
    Ok(Json(DataResponse { data: slot }))
}

/// POST /api/v1/slots/{id}/book
///
/// One call to the `book_slot` procedure, which is the sole authority on
/// capacity. Rejections come back as 409 `BOOKING_FAILED`.
pub async fn book_slot(
    State(state): State<AppState>,
    Path(slot_id): Path<DbId>,
    Json(input): Json<BookSlotRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<BookingCreated>>)> {
    let student_id = AnonymousStudentId::from_stored(input.student_id).ok_or_else(|| {
        AppError::Core(CoreError::Validation(
            "student_id must be a non-empty token".into(),
        ))
    })?;

    let appointment_id = AppointmentRepo::book_slot(&state.pool, slot_id, student_id.as_str())
        .await
        .map_err(|e| {
            let err = AppError::from_booking(e);
            if let AppError::BookingFailed(msg) = &err {
                tracing::info!(slot_id = %slot_id, reason = %msg, "Booking rejected");
            }
            err
        })?;

    tracing::info!(slot_id = %slot_id, appointment_id = %appointment_id, "Slot booked");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: BookingCreated { appointment_id },
        }),
    ))
}
