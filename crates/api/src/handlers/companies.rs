//! Handlers for the `/companies` resource.

use axum::extract::{Path, State};
use axum::Json;
use careerkey_core::availability::{attach_booked_counts, SlotAvailability};
use careerkey_core::error::CoreError;
use careerkey_core::types::DbId;
use careerkey_db::models::company::Company;
use careerkey_db::models::time_slot::TimeSlot;
use careerkey_db::repositories::{AppointmentRepo, CompanyRepo, TimeSlotRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/companies
pub async fn list_companies(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Company>>>> {
    let companies = CompanyRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: companies }))
}

/// GET /api/v1/companies/{id}
pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Company>>> {
    let company = find_company(&state, id).await?;
    Ok(Json(DataResponse { data: company }))
}

/// GET /api/v1/companies/{id}/slots
///
/// The company's slots ordered by start time, each with its booked count and
/// whether it is full.
pub async fn list_company_slots(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<SlotAvailability<TimeSlot>>>>> {
    find_company(&state, id).await?;

    let slots = TimeSlotRepo::list_by_company(&state.pool, id).await?;
    let slot_ids: Vec<DbId> = slots.iter().map(|s| s.id).collect();
    let booked = AppointmentRepo::booked_slot_ids(&state.pool, &slot_ids).await?;

    tracing::debug!(company_id = %id, slots = slots.len(), booked = booked.len(), "Loaded slot availability");

    Ok(Json(DataResponse {
        data: attach_booked_counts(slots, booked),
    }))
}

async fn find_company(state: &AppState, id: DbId) -> AppResult<Company> {
    CompanyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Company",
            id,
        }))
}
