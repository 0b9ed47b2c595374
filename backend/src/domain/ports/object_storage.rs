//! Port for object storage buckets.

use async_trait::async_trait;

use crate::domain::Caller;

use super::define_port_error;

define_port_error! {
    /// Errors raised by object storage adapters.
    pub enum ObjectStorageError {
        /// Storage could not be reached.
        Connection { message: String } => "object storage connection failed: {message}",
        /// Storage refused the upload.
        Rejected { message: String } => "object storage rejected upload: {message}",
    }
}

/// Uploads objects and resolves their public URLs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `bytes` at `bucket/path`.
    async fn upload(
        &self,
        caller: &Caller,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ObjectStorageError>;

    /// Public URL for an object in a public bucket.
    fn public_url(&self, bucket: &str, path: &str) -> String;
}
