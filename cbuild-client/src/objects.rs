//! Object store API endpoints

use crate::BuildServiceClient;
use crate::error::{ClientError, Result};
use cbuild_core::dto::object::UploadedObject;
use reqwest::Body;

impl BuildServiceClient {
    // =============================================================================
    // Source Objects
    // =============================================================================

    /// Upload a zip archive as an object
    ///
    /// `body` may be a buffer or an open `tokio::fs::File`, which is streamed.
    ///
    /// # Arguments
    /// * `bucket` - Target bucket
    /// * `key` - Object key within the bucket
    /// * `body` - Object contents
    ///
    /// # Returns
    /// Where the service stored the object
    pub async fn upload_object(
        &self,
        bucket: &str,
        key: &str,
        body: impl Into<Body>,
    ) -> Result<UploadedObject> {
        if bucket.is_empty() || key.is_empty() {
            return Err(ClientError::InvalidRequest(
                "bucket and key must not be empty".to_string(),
            ));
        }

        let url = format!(
            "{}/api/objects/{}/{}",
            self.base_url,
            bucket,
            key.trim_start_matches('/')
        );
        let response = self
            .client
            .put(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/zip")
            .body(body)
            .send()
            .await?;

        self.handle_response(response).await
    }
}
