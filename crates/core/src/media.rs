//! Media upload shape checks and blob naming.
//!
//! Only the file extension and size are checked; content sniffing is left to
//! whatever serves the blobs.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Prefix every uploaded blob is stored under.
pub const UPLOAD_PREFIX: &str = "uploads";

/// Default per-file upload limit (50 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Image extensions accepted for photos and profile pictures.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

/// Video extensions accepted for the showcase video.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov"];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// What an uploaded file is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Video,
    ProfilePicture,
}

impl MediaKind {
    /// Lowercase extensions accepted for this kind of file.
    pub fn allowed_extensions(self) -> &'static [&'static str] {
        match self {
            Self::Photo | Self::ProfilePicture => IMAGE_EXTENSIONS,
            Self::Video => VIDEO_EXTENSIONS,
        }
    }

    /// Name used in validation messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Video => "video",
            Self::ProfilePicture => "profile picture",
        }
    }
}

/// A raw file handed over by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaUpload {
    /// Client-supplied file name, e.g. `kitchen.jpg`.
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl MediaUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Lowercased extension without the dot, or `""`.
    pub fn extension(&self) -> String {
        match self.file_name.rsplit_once('.') {
            Some((_, ext)) => ext.to_lowercase(),
            None => String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check extension, emptiness and size of an upload.
pub fn validate_upload(
    kind: MediaKind,
    upload: &MediaUpload,
    max_bytes: usize,
) -> Result<(), CoreError> {
    let ext = upload.extension();
    let allowed = kind.allowed_extensions();
    if !allowed.contains(&ext.as_str()) {
        return Err(CoreError::Validation(format!(
            "Unsupported {} format '.{ext}' for '{}'. Supported: {allowed:?}",
            kind.label(),
            upload.file_name,
        )));
    }
    if upload.bytes.is_empty() {
        return Err(CoreError::Validation(format!(
            "{} '{}' is empty",
            kind.label(),
            upload.file_name
        )));
    }
    if upload.bytes.len() > max_bytes {
        return Err(CoreError::Validation(format!(
            "{} '{}' is {} bytes, above the {max_bytes} byte limit",
            kind.label(),
            upload.file_name,
            upload.bytes.len(),
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Naming
// ---------------------------------------------------------------------------

/// Reduce a client file name to `[A-Za-z0-9._-]`, dropping any directory
/// part. Falls back to `file` when nothing usable remains.
pub fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('.');
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Blob key for an upload: `uploads/<uuid>-<sanitised name>`.
///
/// The random prefix keeps two uploads of `kitchen.jpg` from overwriting
/// each other.
pub fn blob_name(file_name: &str) -> String {
    format!(
        "{UPLOAD_PREFIX}/{}-{}",
        uuid::Uuid::new_v4(),
        sanitize_file_name(file_name)
    )
}

/// Best-effort MIME type from a file extension.
pub fn content_type_for_extension(ext: &str) -> Option<&'static str> {
    match ext {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "mp4" => Some("video/mp4"),
        "webm" => Some("video/webm"),
        "mov" => Some("video/quicktime"),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
