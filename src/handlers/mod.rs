// handlers/mod.rs - Route handlers grouped by resource
//
// Public endpoints take only `State<AppState>`; protected ones also take
// `Extension<AuthUser>`, injected by the JWT middleware wired in `app()`.

pub mod auth;     // POST /api/auth, GET /api/auth
pub mod posts;    // /api/post
pub mod profile;  // /api/profile
pub mod users;    // POST /api/users
