//! Build-related API endpoints

use crate::BuildServiceClient;
use crate::error::Result;
use cbuild_core::domain::build::BuildStatus;
use cbuild_core::dto::build::{BatchGetBuilds, BatchGetBuildsResponse, SubmitBuild, SubmittedBuild};
use tracing::debug;

impl BuildServiceClient {
    // =============================================================================
    // Build Lifecycle
    // =============================================================================

    /// Start a build from an uploaded source archive
    ///
    /// # Arguments
    /// * `req` - Project, source location and optional buildspec override
    ///
    /// # Returns
    /// The identifier of the started build
    ///
    /// # Example
    /// ```no_run
    /// # use cbuild_client::BuildServiceClient;
    /// # use cbuild_core::dto::build::SubmitBuild;
    /// # async fn example() -> cbuild_client::Result<()> {
    /// let client = BuildServiceClient::new("http://localhost:8080");
    /// let build = client.submit_build(&SubmitBuild {
    ///     project: "my-project".to_string(),
    ///     source_location: "sources/4b1e.zip".to_string(),
    ///     buildspec_override: Some("version: 0.2".to_string()),
    /// }).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn submit_build(&self, req: &SubmitBuild) -> Result<SubmittedBuild> {
        let url = format!("{}/api/builds", self.base_url);
        let response = self.client.post(&url).json(req).send().await?;

        self.handle_response(response).await
    }

    /// Get the status of several builds at once
    ///
    /// # Arguments
    /// * `ids` - Build identifiers to query
    ///
    /// # Returns
    /// One status per build the service knows about
    pub async fn batch_get_builds(&self, ids: &[String]) -> Result<Vec<BuildStatus>> {
        let url = format!("{}/api/builds/batch-get", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&BatchGetBuilds { ids: ids.to_vec() })
            .send()
            .await?;

        let body: BatchGetBuildsResponse = self.handle_response(response).await?;
        debug!(requested = ids.len(), returned = body.builds.len(), "batch build status");

        Ok(body.builds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientError;
    use cbuild_core::domain::build::BuildPhase;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_submit_build() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/builds")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(serde_json::json!({
                "project": "proj",
                "source_location": "sources/4b1e.zip",
                "buildspec_override": "version: 0.2"
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"build_id":"proj:abc123"}"#)
            .create_async()
            .await;

        let client = BuildServiceClient::new(server.url());
        let build = client
            .submit_build(&SubmitBuild {
                project: "proj".to_string(),
                source_location: "sources/4b1e.zip".to_string(),
                buildspec_override: Some("version: 0.2".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(build.build_id, "proj:abc123");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_submit_build_omits_missing_buildspec() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/builds")
            .match_body(Matcher::Json(serde_json::json!({
                "project": "proj",
                "source_location": "sources/4b1e.zip"
            })))
            .with_status(201)
            .with_body(r#"{"build_id":"proj:abc123"}"#)
            .create_async()
            .await;

        let client = BuildServiceClient::new(server.url());
        client
            .submit_build(&SubmitBuild {
                project: "proj".to_string(),
                source_location: "sources/4b1e.zip".to_string(),
                buildspec_override: None,
            })
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_submit_build_rejected() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/builds")
            .with_status(400)
            .with_body("unknown project")
            .create_async()
            .await;

        let client = BuildServiceClient::new(server.url());
        let err = client
            .submit_build(&SubmitBuild {
                project: "nope".to_string(),
                source_location: "sources/4b1e.zip".to_string(),
                buildspec_override: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::ApiError { status: 400, ref message } if message == "unknown project"));

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_batch_get_builds() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/builds/batch-get")
            .match_body(Matcher::Json(serde_json::json!({ "ids": ["proj:abc123"] })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"builds":[{"id":"proj:abc123","build_complete":true,"build_status":"SUCCEEDED","current_phase":"COMPLETED"}]}"#,
            )
            .create_async()
            .await;

        let client = BuildServiceClient::new(server.url());
        let builds = client
            .batch_get_builds(&["proj:abc123".to_string()])
            .await
            .unwrap();

        assert_eq!(builds.len(), 1);
        assert!(builds[0].build_complete);
        assert_eq!(builds[0].build_status, BuildPhase::Succeeded);
        assert_eq!(builds[0].current_phase.as_deref(), Some("COMPLETED"));

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_batch_get_builds_unparseable() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/builds/batch-get")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = BuildServiceClient::new(server.url());
        let err = client
            .batch_get_builds(&["proj:abc123".to_string()])
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::ParseError(_)));

        mock.assert_async().await;
    }
}
