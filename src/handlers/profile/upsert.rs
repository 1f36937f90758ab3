// handlers/profile/upsert.rs - POST /api/profile

use axum::extract::{Extension, State};
use serde::Deserialize;

use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult, AuthUser};
use crate::models::{Profile, ProfileUpdate, Social};
use crate::state::AppState;
use crate::validation::{non_empty, split_list, Validator};

/// Skills arrive either as "a, b, c" from form posts or as a JSON array
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SkillsInput {
    Delimited(String),
    List(Vec<String>),
}

impl SkillsInput {
    pub fn normalize(self) -> Vec<String> {
        match self {
            SkillsInput::Delimited(raw) => split_list(&raw),
            SkillsInput::List(items) => items
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileRequest {
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub status: Option<String>,
    pub githubusername: Option<String>,
    pub skills: Option<SkillsInput>,
    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
}

impl ProfileRequest {
    /// Validate and turn the request into a partial update
    pub fn into_update(self) -> Result<ProfileUpdate, ApiError> {
        let mut v = Validator::new();
        let status = v.required("status", self.status, "Status is required");

        let skills = self.skills.map(SkillsInput::normalize).filter(|s| !s.is_empty());
        if skills.is_none() {
            v.reject("skills", "Skills is required");
        }
        v.finish()?;

        Ok(ProfileUpdate {
            company: non_empty(self.company),
            website: non_empty(self.website),
            location: non_empty(self.location),
            bio: non_empty(self.bio),
            status,
            githubusername: non_empty(self.githubusername),
            skills,
            social: Social {
                youtube: non_empty(self.youtube),
                twitter: non_empty(self.twitter),
                facebook: non_empty(self.facebook),
                linkedin: non_empty(self.linkedin),
                instagram: non_empty(self.instagram),
            },
        })
    }
}

/// POST /api/profile - create the caller's profile, or merge into the existing one
pub async fn profile_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiJson(payload): ApiJson<ProfileRequest>,
) -> ApiResult<Profile> {
    let update = payload.into_update()?;

    // A token can outlive its account
    if state.store.find_user(auth.id).await?.is_none() {
        return Err(ApiError::not_found("User not found"));
    }

    let profile = match state.store.find_profile(auth.id).await? {
        Some(mut existing) => {
            existing.apply(update);
            tracing::info!("Updating profile for user {}", auth.id);
            existing
        }
        None => {
            let mut created = Profile::new(auth.id);
            created.apply(update);
            tracing::info!("Creating profile for user {}", auth.id);
            created
        }
    };

    state.store.save_profile(&profile).await?;
    Ok(ApiResponse::success(profile))
}
