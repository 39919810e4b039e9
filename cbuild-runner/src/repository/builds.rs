//! Builds repository
//!
//! Starts builds on the remote build service.

use async_trait::async_trait;
use cbuild_client::{BuildServiceClient, Result};
use cbuild_core::dto::build::SubmitBuild;
use std::sync::Arc;

/// Repository trait for starting builds
#[async_trait]
pub trait BuildRepository: Send + Sync {
    /// Submits a build and returns its identifier
    ///
    /// # Arguments
    /// * `req` - Project, source location and optional buildspec override
    async fn submit_build(&self, req: &SubmitBuild) -> Result<String>;
}

/// HTTP implementation of BuildRepository
pub struct HttpBuildRepository {
    client: Arc<BuildServiceClient>,
}

impl HttpBuildRepository {
    /// Creates a new HTTP build repository
    pub fn new(client: Arc<BuildServiceClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BuildRepository for HttpBuildRepository {
    async fn submit_build(&self, req: &SubmitBuild) -> Result<String> {
        let submitted = self.client.submit_build(req).await?;
        Ok(submitted.build_id)
    }
}
