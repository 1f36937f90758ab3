// handlers/users.rs - POST /api/users (registration)

use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::auth::{gravatar_url, hash_password};
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::models::User;
use crate::state::AppState;
use crate::store::StoreError;
use crate::validation::Validator;

pub const MIN_PASSWORD_LENGTH: usize = 6;

const USER_EXISTS: &str = "User already exists";

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Returned by registration and login
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /api/users - register a new account and receive a token
///
/// ```json
/// { "name": "string", "email": "string", "password": "string (6+ chars)" }
/// ```
pub async fn register_post(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> ApiResult<TokenResponse> {
    let mut v = Validator::new();
    let name = v.required("name", payload.name, "Name is required");
    let email = v.email("email", payload.email, "Please include a valid email");
    let password = v.min_length(
        "password",
        payload.password,
        MIN_PASSWORD_LENGTH,
        "Please enter a password with 6 or more characters",
    );
    let (Some(name), Some(email), Some(password)) = (name, email, password) else {
        return Err(v.into_error());
    };

    if state.store.find_user_by_email(&email).await?.is_some() {
        return Err(ApiError::bad_request(USER_EXISTS));
    }

    let avatar = gravatar_url(&email);
    let user = User::new(name, email, hash_password(&password)?, avatar);
    // A concurrent registration can pass the check above and lose at insert
    state.store.insert_user(&user).await.map_err(|e| match e {
        StoreError::Duplicate(_) => ApiError::bad_request(USER_EXISTS),
        other => other.into(),
    })?;
    tracing::info!("Registered user {}", user.id);

    let token = state.tokens.issue(user.id)?;
    Ok(ApiResponse::success(TokenResponse { token }))
}
