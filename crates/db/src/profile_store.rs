//! [`ProfileRepository`] backed by the `profiles` table.

use async_trait::async_trait;
use homecarpent_core::error::CoreError;
use homecarpent_core::ports::ProfileRepository;
use homecarpent_core::profile::{NewProfile, Profile, ProfilePatch};
use homecarpent_core::types::DbId;

use crate::repositories::ProfileRepo;
use crate::DbPool;

/// Database failures surface to the core as `Internal`; the detail goes to
/// the log, not the caller.
fn internal(err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, "Profile query failed");
    CoreError::Internal("Database error".into())
}

#[derive(Clone)]
pub struct PgProfileRepository {
    pool: DbPool,
}

impl PgProfileRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn list_all(&self) -> Result<Vec<Profile>, CoreError> {
        ProfileRepo::list(&self.pool)
            .await
            .map_err(internal)?
            .into_iter()
            .map(Profile::try_from)
            .collect()
    }

    async fn create(&self, input: &NewProfile) -> Result<Profile, CoreError> {
        ProfileRepo::create(&self.pool, input)
            .await
            .map_err(internal)?
            .try_into()
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Profile>, CoreError> {
        ProfileRepo::find_by_id(&self.pool, id)
            .await
            .map_err(internal)?
            .map(Profile::try_from)
            .transpose()
    }

    async fn update(&self, id: DbId, patch: &ProfilePatch) -> Result<Profile, CoreError> {
        ProfileRepo::update(&self.pool, id, patch)
            .await
            .map_err(internal)?
            .ok_or(CoreError::NotFound {
                entity: "Profile",
                id,
            })?
            .try_into()
    }
}
