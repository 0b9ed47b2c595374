//! Storage-backed `ObjectStorage` adapter.

use async_trait::async_trait;

use super::client::SupabaseClient;
use super::error::BackendError;
use crate::domain::Caller;
use crate::domain::ports::{ObjectStorage, ObjectStorageError};

/// Uploads to storage buckets with the caller's token.
#[derive(Debug, Clone)]
pub struct SupabaseObjectStorage {
    client: SupabaseClient,
}

impl SupabaseObjectStorage {
    /// Create the adapter.
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

fn map_error(error: BackendError) -> ObjectStorageError {
    if error.is_unavailable() {
        ObjectStorageError::connection(error.to_string())
    } else {
        ObjectStorageError::rejected(error.message())
    }
}

#[async_trait]
impl ObjectStorage for SupabaseObjectStorage {
    async fn upload(
        &self,
        caller: &Caller,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ObjectStorageError> {
        self.client
            .upload_object(&caller.token, bucket, path, bytes, content_type)
            .await
            .map_err(map_error)
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        self.client.public_object_url(bucket, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outbound::supabase::BackendErrorKind;
    use rstest::rstest;

    #[rstest]
    #[case(BackendErrorKind::Connection, true)]
    #[case(BackendErrorKind::Server, true)]
    #[case(BackendErrorKind::InvalidRequest, false)]
    #[case(BackendErrorKind::Forbidden, false)]
    fn only_outages_are_connection_errors(#[case] kind: BackendErrorKind, #[case] outage: bool) {
        let error = map_error(BackendError::new(kind, "upload property-images", "payload too large"));
        assert_eq!(matches!(error, ObjectStorageError::Connection { .. }), outage);
    }
}
