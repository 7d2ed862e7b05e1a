use std::sync::Arc;
use std::time::Duration;

use homecarpent_cloud::{LocalBlobStore, S3BlobStore};
use homecarpent_core::assembly::ProfileAssembler;
use homecarpent_core::memory::{InMemoryIdentityGateway, InMemoryProfileRepository};
use homecarpent_core::ports::{BlobStore, IdentityGateway, ProfileRepository};
use homecarpent_events::{CatalogSnapshot, EventBus, NotifyingProfileRepository};

use crate::config::{BlobConfig, ServerConfig};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool; `None` with the in-memory backend.
    pub pool: Option<homecarpent_db::DbPool>,
    pub config: Arc<ServerConfig>,
    pub identity: Arc<dyn IdentityGateway>,
    pub blobs: Arc<dyn BlobStore>,
    /// Profile writes go through here so every change is announced to
    /// `catalog`.
    pub profiles: Arc<dyn ProfileRepository>,
    /// Cached listing served to catalog reads.
    pub catalog: Arc<CatalogSnapshot>,
    pub assembler: ProfileAssembler,
}

impl AppState {
    /// Wire the collaborators together.
    ///
    /// `profiles` is the raw repository. Writers get it wrapped in a
    /// [`NotifyingProfileRepository`]; the catalog snapshot reads it directly
    /// and refreshes on the notifications.
    pub fn new(
        config: ServerConfig,
        pool: Option<homecarpent_db::DbPool>,
        identity: Arc<dyn IdentityGateway>,
        blobs: Arc<dyn BlobStore>,
        profiles: Arc<dyn ProfileRepository>,
    ) -> Self {
        let event_bus = Arc::new(EventBus::default());
        let writer: Arc<dyn ProfileRepository> = Arc::new(NotifyingProfileRepository::new(
            Arc::clone(&profiles),
            Arc::clone(&event_bus),
        ));

        let mut catalog = CatalogSnapshot::new(profiles, &event_bus);
        if config.catalog_max_age_secs > 0 {
            catalog = catalog.with_max_age(Duration::from_secs(config.catalog_max_age_secs));
        }

        let assembler = ProfileAssembler::new(Arc::clone(&blobs), Arc::clone(&writer))
            .with_max_upload_bytes(config.max_upload_bytes);

        Self {
            pool,
            config: Arc::new(config),
            identity,
            blobs,
            profiles: writer,
            catalog: Arc::new(catalog),
            assembler,
        }
    }

    /// State with in-process identity and profile storage. Nothing persists
    /// across restarts.
    pub fn in_memory(config: ServerConfig, blobs: Arc<dyn BlobStore>) -> Self {
        Self::new(
            config,
            None,
            Arc::new(InMemoryIdentityGateway::default()),
            blobs,
            Arc::new(InMemoryProfileRepository::default()),
        )
    }
}

/// Build the blob store selected by `config`.
pub async fn build_blob_store(config: &BlobConfig) -> Arc<dyn BlobStore> {
    match config {
        BlobConfig::Local {
            dir,
            public_base_url,
        } => Arc::new(LocalBlobStore::new(dir.clone(), public_base_url.clone())),
        BlobConfig::S3 {
            bucket,
            public_base_url,
        } => Arc::new(S3BlobStore::from_env(bucket.clone(), public_base_url.clone()).await),
    }
}
