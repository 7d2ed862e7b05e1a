//! Blob storage backends for profile media.
//!
//! - [`LocalBlobStore`] -- files on local disk, served back by the API.
//! - [`S3BlobStore`] -- Amazon S3 or any S3-compatible object store.

pub mod local;
pub mod s3;

pub use local::LocalBlobStore;
pub use s3::S3BlobStore;
