//! Status repository
//!
//! Queries the build service for build completion.

use async_trait::async_trait;
use cbuild_client::{BuildServiceClient, Result};
use cbuild_core::domain::build::BuildStatus;
use std::sync::Arc;

/// Repository trait for build status queries
#[async_trait]
pub trait StatusRepository: Send + Sync {
    /// Returns the status of each requested build
    ///
    /// # Arguments
    /// * `build_ids` - Builds to query
    async fn batch_status(&self, build_ids: &[String]) -> Result<Vec<BuildStatus>>;
}

/// HTTP implementation of StatusRepository
pub struct HttpStatusRepository {
    client: Arc<BuildServiceClient>,
}

impl HttpStatusRepository {
    /// Creates a new HTTP status repository
    pub fn new(client: Arc<BuildServiceClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StatusRepository for HttpStatusRepository {
    async fn batch_status(&self, build_ids: &[String]) -> Result<Vec<BuildStatus>> {
        self.client.batch_get_builds(build_ids).await
    }
}
