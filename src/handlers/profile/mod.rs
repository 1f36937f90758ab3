// handlers/profile/mod.rs - /api/profile handlers
//
// Reads return a `ProfileView` (owner name and avatar joined in); writes
// return the stored `Profile`. Every load-modify-save here is
// last-write-wins: two concurrent edits of one profile can drop one of them.

pub mod delete;
pub mod education;
pub mod experience;
pub mod read;
pub mod upsert;

pub use delete::profile_delete;
pub use education::{education_delete, education_put};
pub use experience::{experience_delete, experience_put};
pub use read::{me_get, profiles_get, user_profile_get};
pub use upsert::profile_post;

use uuid::Uuid;

use crate::error::ApiError;
use crate::models::Profile;
use crate::state::AppState;

pub(crate) const NO_PROFILE: &str = "There is no profile for this user";

/// Load the caller's profile or fail with `NotFound`
pub(crate) async fn load_own_profile(state: &AppState, user: Uuid) -> Result<Profile, ApiError> {
    state
        .store
        .find_profile(user)
        .await?
        .ok_or_else(|| ApiError::not_found(NO_PROFILE))
}
