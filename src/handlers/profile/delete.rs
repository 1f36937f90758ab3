use axum::extract::{Extension, State};
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// DELETE /api/profile - remove the caller's posts, profile and account
///
/// Safe to repeat: deleting an identity that is already gone still succeeds.
pub async fn profile_delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Value> {
    let posts = state.store.delete_posts_by_user(auth.id).await?;
    let profile = state.store.delete_profile(auth.id).await?;
    let user = state.store.delete_user(auth.id).await?;

    tracing::info!(
        "Deleted account {} (profile: {}, user: {}, posts: {})",
        auth.id,
        profile,
        user,
        posts
    );

    Ok(ApiResponse::success(json!({ "msg": "User deleted" })))
}
