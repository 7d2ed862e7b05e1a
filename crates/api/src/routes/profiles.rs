//! Route definitions for the `/profiles` resource. All routes require auth.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::profiles;
use crate::state::AppState;

/// Routes mounted at `/profiles`.
///
/// ```text
/// GET   /                -> list_profiles
/// POST  /                -> create_profile (multipart)
/// GET   /{id}            -> get_profile
/// PATCH /{id}            -> update_profile
/// POST  /{id}/ratings    -> rate_profile
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(profiles::list_profiles).post(profiles::create_profile),
        )
        .route(
            "/{id}",
            get(profiles::get_profile).patch(profiles::update_profile),
        )
        .route("/{id}/ratings", post(profiles::rate_profile))
}
