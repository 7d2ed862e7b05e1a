pub mod auth;
pub mod health;
pub mod profiles;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/signup                 register + login (public)
/// /auth/login                  login (public)
/// /auth/refresh                rotate tokens (public)
/// /auth/logout                 end sessions (requires auth)
/// /auth/session                current session (requires auth)
///
/// /profiles                    catalog view, create (multipart)
/// /profiles/{id}               get, owner edit
/// /profiles/{id}/ratings       submit a score
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/profiles", profiles::router())
}
