// handlers/profile/experience.rs - PUT/DELETE /api/profile/experience

use axum::extract::{Extension, Path, State};
use serde::Deserialize;
use uuid::Uuid;

use super::load_own_profile;
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult, AuthUser};
use crate::models::{Experience, Profile};
use crate::state::AppState;
use crate::validation::{non_empty, parse_id, Validator};

#[derive(Debug, Default, Deserialize)]
pub struct ExperienceRequest {
    #[serde(alias = "titles")]
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

impl ExperienceRequest {
    pub fn into_entry(self) -> Result<Experience, ApiError> {
        let mut v = Validator::new();
        let title = v.required("title", self.title, "Title is required");
        let company = v.required("company", self.company, "Company is required");
        let from = v.required_date("from", self.from, "From date is required");
        let to = v.optional_date("to", self.to);

        let (Some(title), Some(company), Some(from)) = (title, company, from) else {
            return Err(v.into_error());
        };
        v.finish()?;

        Ok(Experience {
            id: Uuid::new_v4(),
            title,
            company,
            location: non_empty(self.location),
            from,
            to,
            current: self.current,
            description: non_empty(self.description),
        })
    }
}

/// PUT /api/profile/experience - prepend an experience entry to the caller's profile
pub async fn experience_put(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiJson(payload): ApiJson<ExperienceRequest>,
) -> ApiResult<Profile> {
    let entry = payload.into_entry()?;

    let mut profile = load_own_profile(&state, auth.id).await?;
    profile.add_experience(entry);
    state.store.save_profile(&profile).await?;

    Ok(ApiResponse::success(profile))
}

/// DELETE /api/profile/experience/:exp_id - remove one experience entry
///
/// An unknown id is reported as `NotFound` and nothing is written.
pub async fn experience_delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(exp_id): Path<String>,
) -> ApiResult<Profile> {
    let exp_id = parse_id(&exp_id, "experience")?;

    let mut profile = load_own_profile(&state, auth.id).await?;
    if profile.remove_experience(exp_id).is_none() {
        return Err(ApiError::not_found("Experience not found"));
    }
    state.store.save_profile(&profile).await?;

    Ok(ApiResponse::success(profile))
}
