// handlers/profile/education.rs - PUT/DELETE /api/profile/education

use axum::extract::{Extension, Path, State};
use serde::Deserialize;
use uuid::Uuid;

use super::load_own_profile;
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult, AuthUser};
use crate::models::{Education, Profile};
use crate::state::AppState;
use crate::validation::{non_empty, parse_id, Validator};

#[derive(Debug, Default, Deserialize)]
pub struct EducationRequest {
    pub school: Option<String>,
    pub degree: Option<String>,
    pub fieldofstudy: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

impl EducationRequest {
    pub fn into_entry(self) -> Result<Education, ApiError> {
        let mut v = Validator::new();
        let school = v.required("school", self.school, "School is required");
        let degree = v.required("degree", self.degree, "Degree is required");
        let fieldofstudy = v.required("fieldofstudy", self.fieldofstudy, "Field of study is required");
        let from = v.required_date("from", self.from, "From date is required");
        let to = v.optional_date("to", self.to);

        let (Some(school), Some(degree), Some(fieldofstudy), Some(from)) = (school, degree, fieldofstudy, from)
        else {
            return Err(v.into_error());
        };
        v.finish()?;

        Ok(Education {
            id: Uuid::new_v4(),
            school,
            degree,
            fieldofstudy,
            from,
            to,
            current: self.current,
            description: non_empty(self.description),
        })
    }
}

/// PUT /api/profile/education - prepend an education entry to the caller's profile
pub async fn education_put(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiJson(payload): ApiJson<EducationRequest>,
) -> ApiResult<Profile> {
    let entry = payload.into_entry()?;

    let mut profile = load_own_profile(&state, auth.id).await?;
    profile.add_education(entry);
    state.store.save_profile(&profile).await?;

    Ok(ApiResponse::success(profile))
}

/// DELETE /api/profile/education/:edu_id - remove one education entry
pub async fn education_delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(edu_id): Path<String>,
) -> ApiResult<Profile> {
    let edu_id = parse_id(&edu_id, "education")?;

    let mut profile = load_own_profile(&state, auth.id).await?;
    if profile.remove_education(edu_id).is_none() {
        return Err(ApiError::not_found("Education not found"));
    }
    state.store.save_profile(&profile).await?;

    Ok(ApiResponse::success(profile))
}
