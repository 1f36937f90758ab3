// handlers/posts.rs - /api/post

use axum::extract::{Extension, Path, State};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult, AuthUser};
use crate::models::Post;
use crate::state::AppState;
use crate::validation::{parse_id, Validator};

#[derive(Debug, Default, Deserialize)]
pub struct PostRequest {
    pub text: Option<String>,
}

/// POST /api/post - publish a post as the caller
pub async fn post_create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiJson(payload): ApiJson<PostRequest>,
) -> ApiResult<Post> {
    let mut v = Validator::new();
    let Some(text) = v.required("text", payload.text, "Text is required") else {
        return Err(v.into_error());
    };

    let author = state
        .store
        .find_user(auth.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let post = Post::new(&author, text);
    state.store.insert_post(&post).await?;

    Ok(ApiResponse::success(post))
}

/// GET /api/post - all posts, newest first
pub async fn posts_list(State(state): State<AppState>) -> ApiResult<Vec<Post>> {
    let posts = state.store.list_posts().await?;
    Ok(ApiResponse::success(posts))
}

/// GET /api/post/:id
pub async fn post_get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Post> {
    let id = parse_id(&id, "post")?;
    let post = state
        .store
        .find_post(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    Ok(ApiResponse::success(post))
}

/// DELETE /api/post/:id - only the author may delete
pub async fn post_delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_id(&id, "post")?;
    let post = state
        .store
        .find_post(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    if post.user != auth.id {
        return Err(ApiError::unauthorized("User not authorized"));
    }

    state.store.delete_post(id).await?;
    Ok(ApiResponse::success(json!({ "msg": "Post removed" })))
}
