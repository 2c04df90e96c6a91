//! Handlers for the `/appointments` resource.

use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use careerkey_core::error::CoreError;
use careerkey_core::ics::{self, AppointmentEvent};
use careerkey_core::timezone::resolve_time_zone;
use careerkey_core::types::DbId;
use careerkey_db::repositories::{AppointmentRepo, CompanyRepo, TimeSlotRepo};
use chrono::Utc;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Query parameters for the calendar download.
#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    /// IANA zone the appointment was shown in. Invalid or missing falls back to UTC.
    pub tz: Option<String>,
}

/// GET /api/v1/appointments/{id}/calendar.ics
///
/// Download the appointment as a single-event iCalendar file.
pub async fn download_calendar(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(query): Query<CalendarQuery>,
) -> AppResult<impl IntoResponse> {
    let appointment = AppointmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Appointment",
            id,
        }))?;

    let slot = TimeSlotRepo::find_by_id(&state.pool, appointment.slot_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "TimeSlot",
            id: appointment.slot_id,
        }))?;

    let company = CompanyRepo::find_by_id(&state.pool, slot.company_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Company",
            id: slot.company_id,
        }))?;

    // The server has no meaningful local zone of its own.
    let tz = resolve_time_zone(query.tz.as_deref(), None);
    let appointment_id = appointment.id.to_string();

    let body = ics::build_calendar(
        &AppointmentEvent {
            appointment_id: &appointment_id,
            company_name: &company.company_name,
            start: slot.start_time,
            end: slot.end_time,
            time_zone: tz.name(),
        },
        Utc::now(),
    );

    let disposition = format!("attachment; filename=\"{}\"", ics::file_name(&appointment_id));

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, ics::CONTENT_TYPE.to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}
