//! Logs repository
//!
//! Reads pages of a build's log stream. This is a stateless reader; the
//! continuation token is held by the tailer.

use async_trait::async_trait;
use cbuild_client::{BuildServiceClient, Result};
use cbuild_core::domain::job::LogLocator;
use cbuild_core::domain::log::PageToken;
use cbuild_core::dto::log::LogPage;
use std::sync::Arc;

/// Repository trait for reading log pages
#[async_trait]
pub trait LogRepository: Send + Sync {
    /// Fetches the page of log lines following `token`
    ///
    /// A stream that does not exist yet yields an empty page, not an error.
    ///
    /// # Arguments
    /// * `locator` - Log group and stream of the build
    /// * `token` - Token returned by the previous fetch, `None` for the first
    async fn fetch_page(&self, locator: &LogLocator, token: Option<&PageToken>)
    -> Result<LogPage>;
}

/// HTTP implementation of LogRepository
pub struct HttpLogRepository {
    client: Arc<BuildServiceClient>,
}

impl HttpLogRepository {
    /// Creates a new HTTP log repository
    pub fn new(client: Arc<BuildServiceClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LogRepository for HttpLogRepository {
    async fn fetch_page(
        &self,
        locator: &LogLocator,
        token: Option<&PageToken>,
    ) -> Result<LogPage> {
        self.client
            .get_log_events(&locator.group, &locator.stream, token)
            .await
    }
}
