//! cbuild HTTP Client
//!
//! A small, type-safe HTTP client for the remote build service.
//!
//! The service exposes four capabilities that cbuild relies on: starting a
//! build, reporting build status in batches, serving the build's log events
//! page by page, and storing the uploaded source archive.
//!
//! # Example
//!
//! ```no_run
//! use cbuild_client::BuildServiceClient;
//! use cbuild_core::dto::build::SubmitBuild;
//!
//! #[tokio::main]
//! async fn main() -> cbuild_client::Result<()> {
//!     let client = BuildServiceClient::new("http://localhost:8080");
//!
//!     let build = client.submit_build(&SubmitBuild {
//!         project: "my-project".to_string(),
//!         source_location: "sources/4b1e.zip".to_string(),
//!         buildspec_override: None,
//!     }).await?;
//!
//!     println!("Started build: {}", build.build_id);
//!     Ok(())
//! }
//! ```

pub mod error;
mod builds;
mod logs;
mod objects;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use cbuild_core::dto::log::LogPage;

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client for the remote build service
///
/// Endpoints are grouped by concern:
/// - Builds (submit, batch status)
/// - Log events (paginated reads)
/// - Objects (source archive upload)
#[derive(Debug, Clone)]
pub struct BuildServiceClient {
    /// Base URL of the build service (e.g., "http://localhost:8080")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl BuildServiceClient {
    /// Create a new build service client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the service (e.g., "http://localhost:8080")
    ///
    /// # Example
    /// ```
    /// use cbuild_client::BuildServiceClient;
    ///
    /// let client = BuildServiceClient::new("http://localhost:8080");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new build service client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use cbuild_client::BuildServiceClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = BuildServiceClient::with_client("http://localhost:8080", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Create a client whose every request gives up after `timeout`
    ///
    /// A hung request then surfaces as [`ClientError::RequestFailed`].
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, client))
    }

    /// Get the base URL of the build service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// Non-success statuses become [`ClientError::ApiError`] carrying the
    /// response body.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}
