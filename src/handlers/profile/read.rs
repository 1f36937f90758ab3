use axum::extract::{Extension, Path, State};

use super::NO_PROFILE;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::ProfileView;
use crate::state::AppState;
use crate::validation::parse_id;

/// GET /api/profile/me - the caller's own profile
pub async fn me_get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<ProfileView> {
    let profile = state
        .store
        .find_profile_view(auth.id)
        .await?
        .ok_or_else(|| ApiError::not_found(NO_PROFILE))?;

    Ok(ApiResponse::success(profile))
}

/// GET /api/profile - every profile, public
pub async fn profiles_get(State(state): State<AppState>) -> ApiResult<Vec<ProfileView>> {
    let profiles = state.store.list_profile_views().await?;
    Ok(ApiResponse::success(profiles))
}

/// GET /api/profile/user/:user_id - profile by owner id, public
pub async fn user_profile_get(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<ProfileView> {
    let user_id = parse_id(&user_id, "user")?;

    let profile = state
        .store
        .find_profile_view(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile not found"))?;

    Ok(ApiResponse::success(profile))
}
