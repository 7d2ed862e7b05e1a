//! Handlers for the `/profiles` resource.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use homecarpent_core::assembly::ProfileDraft;
use homecarpent_core::catalog::{compute_view, ViewParameters};
use homecarpent_core::error::CoreError;
use homecarpent_core::media::MediaUpload;
use homecarpent_core::profile::{parse_score, submit_rating, Profile, ProfilePatch};
use homecarpent_core::types::DbId;
use homecarpent_core::user_type::UserType;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /profiles`.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    /// `customer`, `designer` or `carpenter`; absent or empty means all.
    pub role: Option<String>,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub sort_by_timeline: bool,
}

impl CatalogQuery {
    fn into_params(self) -> Result<ViewParameters, CoreError> {
        let role_filter = match self.role.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(name) => Some(UserType::from_name(name)?),
        };
        Ok(ViewParameters {
            role_filter,
            search_term: self.search,
            sort_by_timeline: self.sort_by_timeline,
        })
    }
}

/// Request body for `POST /profiles/{id}/ratings`.
///
/// `score` is kept as raw JSON so `4.5` or `"4"` are reported as an invalid
/// rating rather than a generic deserialisation failure.
#[derive(Debug, Deserialize)]
pub struct RatingRequest {
    pub score: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/profiles?role=&search=&sort_by_timeline=
///
/// Filtered, searched and optionally sorted catalog view.
pub async fn list_profiles(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<CatalogQuery>,
) -> AppResult<Json<DataResponse<Vec<Profile>>>> {
    let params = query.into_params()?;
    let snapshot = state.catalog.current().await?;
    let view = compute_view(&snapshot, &params);
    Ok(Json(DataResponse { data: view }))
}

/// POST /api/v1/profiles
///
/// Multipart form. Text fields: `name`, `location`, `description`,
/// `timeline`, `catalog`, `user_type` (defaults to the account's type).
/// File fields: `photos` (repeatable), `video`, `profile_pic`.
pub async fn create_profile(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<Profile>>)> {
    let mut draft = ProfileDraft {
        user_type: user.identity.user_type,
        ..ProfileDraft::default()
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "photos" | "photos[]" | "video" | "profile_pic" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                // Browsers send an empty part for an untouched file input.
                if data.is_empty() {
                    continue;
                }
                let mut upload = MediaUpload::new(file_name, data.to_vec());
                if let Some(ct) = content_type {
                    upload = upload.with_content_type(ct);
                }
                match name.as_str() {
                    "video" => draft.video = Some(upload),
                    "profile_pic" => draft.profile_pic = Some(upload),
                    _ => draft.photos.push(upload),
                }
            }
            "name" | "location" | "description" | "timeline" | "catalog" | "user_type" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                match name.as_str() {
                    "name" => draft.name = text,
                    "location" => draft.location = text,
                    "description" => draft.description = text,
                    "timeline" => draft.timeline = text,
                    "catalog" => draft.catalog = text,
                    _ => draft.user_type = UserType::from_name(text.trim())?,
                }
            }
            _ => {} // ignore unknown fields
        }
    }

    let profile = state
        .assembler
        .assemble_and_create(Some(user.identity.user_id), draft)
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: profile })))
}

/// GET /api/v1/profiles/{id}
pub async fn get_profile(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Profile>>> {
    let profile = find_profile(&state, id).await?;
    Ok(Json(DataResponse { data: profile }))
}

/// PATCH /api/v1/profiles/{id}
///
/// Owner-only edit of the descriptive fields. Rating and reviews cannot be
/// set here.
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(patch): Json<ProfilePatch>,
) -> AppResult<Json<DataResponse<Profile>>> {
    patch.validate()?;

    let profile = find_profile(&state, id).await?;
    if profile.owner_id != Some(user.identity.user_id) {
        return Err(CoreError::Forbidden("Only the profile owner can edit it".into()).into());
    }
    if patch.is_empty() {
        return Ok(Json(DataResponse { data: profile }));
    }

    let updated = state.profiles.update(id, &patch).await?;
    Ok(Json(DataResponse { data: updated }))
}

/// POST /api/v1/profiles/{id}/ratings
///
/// Append a 1-5 score and return the profile with its new average.
pub async fn rate_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<RatingRequest>,
) -> AppResult<Json<DataResponse<Profile>>> {
    let score = parse_score(&input.score)?;
    let profile = find_profile(&state, id).await?;

    let rated = submit_rating(&profile, score)?;
    let saved = state
        .profiles
        .update(id, &ProfilePatch::rating_of(&rated))
        .await?;

    tracing::info!(
        profile_id = id,
        user_id = user.identity.user_id,
        score,
        rating = saved.rating,
        "Rating submitted"
    );
    Ok(Json(DataResponse { data: saved }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_profile(state: &AppState, id: DbId) -> AppResult<Profile> {
    state
        .profiles
        .find_by_id(id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Profile",
                id,
            })
        })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn empty_role_means_all() {
        let query = CatalogQuery {
            role: Some(" ".into()),
            ..CatalogQuery::default()
        };
        assert_eq!(query.into_params().unwrap().role_filter, None);
    }

    #[test]
    fn unknown_role_is_validation_error() {
        let query = CatalogQuery {
            role: Some("plumber".into()),
            ..CatalogQuery::default()
        };
        assert_matches!(query.into_params(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn role_and_flags_pass_through() {
        let query = CatalogQuery {
            role: Some("carpenter".into()),
            search: "pune".into(),
            sort_by_timeline: true,
        };
        let params = query.into_params().unwrap();
        assert_eq!(params.role_filter, Some(UserType::Carpenter));
        assert_eq!(params.search_term, "pune");
        assert!(params.sort_by_timeline);
    }
}
