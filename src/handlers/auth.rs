// handlers/auth.rs - POST /api/auth (login), GET /api/auth (current user)

use axum::extract::{Extension, State};
use serde::Deserialize;

use super::users::TokenResponse;
use crate::auth::verify_password;
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult, AuthUser};
use crate::models::UserView;
use crate::state::AppState;
use crate::validation::Validator;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /api/auth - exchange e-mail and password for a token
///
/// Unknown e-mail and wrong password produce the same response.
pub async fn login_post(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> ApiResult<TokenResponse> {
    let mut v = Validator::new();
    let email = v.email("email", payload.email, "Please include a valid email");
    let password = v.min_length("password", payload.password, 1, "Password is required");
    let (Some(email), Some(password)) = (email, password) else {
        return Err(v.into_error());
    };

    let user = state
        .store
        .find_user_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::bad_request(INVALID_CREDENTIALS))?;

    if !verify_password(&password, &user.password)? {
        tracing::warn!("Failed login for user {}", user.id);
        return Err(ApiError::bad_request(INVALID_CREDENTIALS));
    }

    let token = state.tokens.issue(user.id)?;
    Ok(ApiResponse::success(TokenResponse { token }))
}

/// GET /api/auth - the authenticated user, without the password
pub async fn current_user_get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<UserView> {
    let user = state
        .store
        .find_user(auth.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(ApiResponse::success(UserView::from(user)))
}
