//! Handler for the caller's own profile.

use axum::extract::State;
use axum::Json;
use careerkey_core::error::CoreError;
use careerkey_core::profile::{resolve_profile, Identity, ResolvedProfile};
use careerkey_db::profile_store::PgProfileStore;
use careerkey_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/me/profile
///
/// Read the caller's profile, creating it from the sign-up metadata on first
/// visit.
pub async fn get_my_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<ResolvedProfile>>> {
    let user = UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    let identity = Identity {
        user_id: user.id,
        metadata: user.metadata.0,
    };

    let store = PgProfileStore::new(state.pool.clone());
    let resolved = resolve_profile(&store, Some(&identity)).await?;

    if let Some(warning) = &resolved.warning {
        tracing::warn!(user_id = %identity.user_id, warning = %warning, "Profile resolved with warning");
    }

    Ok(Json(DataResponse { data: resolved }))
}
