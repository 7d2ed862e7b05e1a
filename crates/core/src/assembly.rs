//! Profile creation: upload every media file, then write the profile once.
//!
//! Photos are uploaded concurrently, alongside the optional video and
//! profile picture. The repository write only happens after every upload has
//! succeeded; the first failure aborts the whole operation with
//! [`CoreError::UploadFailed`] and nothing is persisted. Blobs that did make
//! it to storage before the failure (or before the future was dropped) are
//! left in place.

use std::sync::Arc;

use futures::future::try_join_all;

use crate::error::CoreError;
use crate::media::{
    blob_name, content_type_for_extension, validate_upload, MediaKind, MediaUpload,
    DEFAULT_MAX_UPLOAD_BYTES,
};
use crate::ports::{BlobStore, ProfileRepository};
use crate::profile::{validate_name, NewProfile, Profile};
use crate::types::DbId;
use crate::user_type::UserType;

/// Form input for a new profile, including the raw media files.
#[derive(Debug, Clone, Default)]
pub struct ProfileDraft {
    pub name: String,
    pub location: String,
    pub description: String,
    pub timeline: String,
    pub catalog: String,
    pub user_type: UserType,
    pub photos: Vec<MediaUpload>,
    pub video: Option<MediaUpload>,
    pub profile_pic: Option<MediaUpload>,
}

/// Turns a [`ProfileDraft`] into a persisted [`Profile`].
#[derive(Clone)]
pub struct ProfileAssembler {
    blobs: Arc<dyn BlobStore>,
    profiles: Arc<dyn ProfileRepository>,
    max_upload_bytes: usize,
}

impl ProfileAssembler {
    pub fn new(blobs: Arc<dyn BlobStore>, profiles: Arc<dyn ProfileRepository>) -> Self {
        Self {
            blobs,
            profiles,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    /// Shape checks only: non-empty name and acceptable media files.
    pub fn validate(&self, draft: &ProfileDraft) -> Result<(), CoreError> {
        validate_name(&draft.name)?;
        for photo in &draft.photos {
            validate_upload(MediaKind::Photo, photo, self.max_upload_bytes)?;
        }
        if let Some(video) = &draft.video {
            validate_upload(MediaKind::Video, video, self.max_upload_bytes)?;
        }
        if let Some(pic) = &draft.profile_pic {
            validate_upload(MediaKind::ProfilePicture, pic, self.max_upload_bytes)?;
        }
        Ok(())
    }

    /// Upload all media of `draft` and create the profile.
    ///
    /// Not retried: on [`CoreError::UploadFailed`] the caller resubmits the
    /// whole draft.
    pub async fn assemble_and_create(
        &self,
        owner_id: Option<DbId>,
        draft: ProfileDraft,
    ) -> Result<Profile, CoreError> {
        self.validate(&draft)?;

        let ProfileDraft {
            name,
            location,
            description,
            timeline,
            catalog,
            user_type,
            photos,
            video,
            profile_pic,
        } = draft;
        let photo_count = photos.len();

        let photo_uploads = try_join_all(photos.into_iter().map(|p| self.upload(p)));
        let (photo_urls, video_url, profile_pic_url) = tokio::try_join!(
            photo_uploads,
            self.upload_optional(video),
            self.upload_optional(profile_pic),
        )?;

        let input = NewProfile {
            owner_id,
            name: name.trim().to_string(),
            location,
            description,
            timeline,
            catalog,
            user_type,
            photo_urls,
            video_url,
            profile_pic_url,
        };
        let profile = self.profiles.create(&input).await?;

        tracing::info!(
            profile_id = profile.id,
            user_type = %profile.user_type,
            photos = photo_count,
            backend = self.blobs.backend_tag(),
            "Profile created"
        );
        Ok(profile)
    }

    async fn upload(&self, upload: MediaUpload) -> Result<String, CoreError> {
        let name = blob_name(&upload.file_name);
        let content_type = upload
            .content_type
            .clone()
            .or_else(|| content_type_for_extension(&upload.extension()).map(str::to_string));

        let stored = self
            .blobs
            .store(&name, content_type.as_deref(), upload.bytes)
            .await;
        stored.map_err(|err| {
            tracing::warn!(blob = %name, error = %err, "Upload failed, abandoning profile");
            match err {
                CoreError::UploadFailed { .. } => err,
                other => CoreError::upload_failed(name, other),
            }
        })
    }

    async fn upload_optional(
        &self,
        upload: Option<MediaUpload>,
    ) -> Result<Option<String>, CoreError> {
        match upload {
            Some(u) => self.upload(u).await.map(Some),
            None => Ok(None),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
