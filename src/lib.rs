pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod state;
pub mod store;
pub mod validation;


use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Json},
    routing::{delete, get, post, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub use state::AppState;

/// Build the full application router around `state`
pub fn app(state: AppState) -> Router {
    let config = config::config();

    let mut router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        // Protected (JWT)
        .merge(protected_routes(state.clone()))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security.cors_origins));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn public_routes() -> Router<AppState> {
    use handlers::{auth, profile, users};

    Router::new()
        .route("/api/users", post(users::register_post))
        .route("/api/auth", post(auth::login_post))
        .route("/api/profile", get(profile::profiles_get))
        .route("/api/profile/user/:user_id", get(profile::user_profile_get))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use handlers::{auth, posts, profile};

    Router::new()
        .route("/api/auth", get(auth::current_user_get))
        // Profile
        .route("/api/profile", post(profile::profile_post).delete(profile::profile_delete))
        .route("/api/profile/me", get(profile::me_get))
        .route("/api/profile/experience", put(profile::experience_put))
        .route("/api/profile/experience/:exp_id", delete(profile::experience_delete))
        .route("/api/profile/education", put(profile::education_put))
        .route("/api/profile/education/:edu_id", delete(profile::education_delete))
        // Posts
        .route("/api/post", post(posts::post_create).get(posts::posts_list))
        .route("/api/post/:id", get(posts::post_get).delete(posts::post_delete))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::jwt_auth_middleware,
        ))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins = origins.iter().filter_map(|o| HeaderValue::from_str(o).ok());

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "DevConnector API",
            "version": env!("CARGO_PKG_VERSION"),
            "status": "API running",
            "endpoints": {
                "users": "/api/users (public - registration)",
                "auth": "/api/auth (POST public - login, GET protected - current user)",
                "profile": "/api/profile[/me|/user/:user_id|/experience|/education] (mixed)",
                "post": "/api/post[/:id] (protected)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "store unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                    }
                })),
            )
        }
    }
}
