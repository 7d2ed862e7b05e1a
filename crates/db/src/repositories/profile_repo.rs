//! Repository for the `profiles` table.

use homecarpent_core::profile::{NewProfile, ProfilePatch};
use homecarpent_core::types::DbId;
use sqlx::PgPool;

use crate::models::profile::ProfileRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, name, location, description, timeline, catalog, user_type, \
                       photo_urls, video_url, profile_pic_url, rating, reviews, \
                       created_at, updated_at";

/// Provides CRUD operations for profiles.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Insert a new profile with an empty review history.
    pub async fn create(pool: &PgPool, input: &NewProfile) -> Result<ProfileRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles
                (owner_id, name, location, description, timeline, catalog, user_type,
                 photo_urls, video_url, profile_pic_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProfileRow>(&query)
            .bind(input.owner_id)
            .bind(&input.name)
            .bind(&input.location)
            .bind(&input.description)
            .bind(&input.timeline)
            .bind(&input.catalog)
            .bind(input.user_type.name())
            .bind(&input.photo_urls)
            .bind(&input.video_url)
            .bind(&input.profile_pic_url)
            .fetch_one(pool)
            .await
    }

    /// Find a profile by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ProfileRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, ProfileRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Every profile in insertion order.
    pub async fn list(pool: &PgPool) -> Result<Vec<ProfileRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles ORDER BY id ASC");
        sqlx::query_as::<_, ProfileRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Apply the `Some` fields of `patch`. Rating and reviews are written
    /// together or not at all.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        patch: &ProfilePatch,
    ) -> Result<Option<ProfileRow>, sqlx::Error> {
        let query = format!(
            "UPDATE profiles SET
                name = COALESCE($2, name),
                location = COALESCE($3, location),
                description = COALESCE($4, description),
                timeline = COALESCE($5, timeline),
                catalog = COALESCE($6, catalog),
                reviews = COALESCE($7, reviews),
                rating = COALESCE($8, rating)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let reviews: Option<Vec<i16>> = patch
            .rating
            .as_ref()
            .map(|r| r.reviews().iter().map(|&s| i16::from(s)).collect());
        sqlx::query_as::<_, ProfileRow>(&query)
            .bind(id)
            .bind(patch.name.as_deref().map(str::trim))
            .bind(&patch.location)
            .bind(&patch.description)
            .bind(&patch.timeline)
            .bind(&patch.catalog)
            .bind(reviews)
            .bind(patch.rating.as_ref().map(|r| r.rating()))
            .fetch_optional(pool)
            .await
    }
}
