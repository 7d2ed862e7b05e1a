//! Profile row and its conversion to the core [`Profile`].

use homecarpent_core::error::CoreError;
use homecarpent_core::profile::Profile;
use homecarpent_core::types::{DbId, Timestamp};
use homecarpent_core::user_type::UserType;
use sqlx::FromRow;

/// A row from the `profiles` table.
///
/// `reviews` is a `SMALLINT[]`; the CHECK constraint keeps every element in
/// 1..=5.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub id: DbId,
    pub owner_id: Option<DbId>,
    pub name: String,
    pub location: String,
    pub description: String,
    pub timeline: String,
    pub catalog: String,
    pub user_type: String,
    pub photo_urls: Vec<String>,
    pub video_url: Option<String>,
    pub profile_pic_url: Option<String>,
    pub rating: f64,
    pub reviews: Vec<i16>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = CoreError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let user_type = UserType::from_name(&row.user_type)
            .map_err(|_| CoreError::Internal(format!("Profile {} has unknown user_type", row.id)))?;
        let reviews = row
            .reviews
            .into_iter()
            .map(|s| {
                u8::try_from(s).map_err(|_| {
                    CoreError::Internal(format!("Profile {} has out-of-range review {s}", row.id))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Profile {
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            location: row.location,
            description: row.description,
            timeline: row.timeline,
            catalog: row.catalog,
            user_type,
            photo_urls: row.photo_urls,
            video_url: row.video_url,
            profile_pic_url: row.profile_pic_url,
            rating: row.rating,
            reviews,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
