use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid rating: {0}")]
    InvalidRating(String),

    #[error("Upload of '{name}' failed: {reason}")]
    UploadFailed { name: String, reason: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for an [`UploadFailed`](CoreError::UploadFailed) error.
    pub fn upload_failed(name: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::UploadFailed {
            name: name.into(),
            reason: reason.to_string(),
        }
    }
}
