//! Log event API endpoints

use crate::BuildServiceClient;
use crate::error::Result;
use cbuild_core::domain::log::PageToken;
use cbuild_core::dto::log::LogPage;
use tracing::debug;

impl BuildServiceClient {
    // =============================================================================
    // Log Events
    // =============================================================================

    /// Read one page of log events from a stream
    ///
    /// The stream of a freshly started build may not exist yet; a 404 is
    /// reported as an empty page with no token instead of an error.
    ///
    /// # Arguments
    /// * `group` - Log group name
    /// * `stream` - Log stream name
    /// * `next_token` - Token from the previous page, `None` for the first read
    pub async fn get_log_events(
        &self,
        group: &str,
        stream: &str,
        next_token: Option<&PageToken>,
    ) -> Result<LogPage> {
        let url = format!("{}/api/logs/events", self.base_url);

        let mut query = vec![("group", group), ("stream", stream)];
        if let Some(token) = next_token {
            query.push(("next_token", token.as_str()));
        }

        let response = self.client.get(&url).query(&query).send().await?;

        let page: LogPage = match self.handle_response(response).await {
            Ok(page) => page,
            Err(e) if e.is_not_found() => {
                debug!(group, stream, "log stream not found yet");
                return Ok(LogPage::empty());
            }
            Err(e) => return Err(e),
        };

        debug!(
            count = page.lines.len(),
            next_token = page.next_token.as_ref().map(PageToken::as_str).unwrap_or(""),
            "retrieved log events"
        );

        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientError;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_first_page_has_no_token() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/logs/events")
            .match_query(Matcher::Regex(
                "^group=%2Fremote%2Fproj&stream=abc123$".to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"lines":[{"timestamp":1709294401000,"message":"step 1"}],"next_token":"f/1"}"#,
            )
            .create_async()
            .await;

        let client = BuildServiceClient::new(server.url());
        let page = client
            .get_log_events("/remote/proj", "abc123", None)
            .await
            .unwrap();

        assert_eq!(page.lines.len(), 1);
        assert_eq!(page.lines[0].message, "step 1");
        assert_eq!(page.next_token, Some(PageToken::from("f/1")));

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_token_is_sent() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/logs/events")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("group".into(), "/remote/proj".into()),
                Matcher::UrlEncoded("stream".into(), "abc123".into()),
                Matcher::UrlEncoded("next_token".into(), "f/1".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"lines":[],"next_token":"f/1"}"#)
            .create_async()
            .await;

        let client = BuildServiceClient::new(server.url());
        let token = PageToken::from("f/1");
        let page = client
            .get_log_events("/remote/proj", "abc123", Some(&token))
            .await
            .unwrap();

        assert!(page.lines.is_empty());
        assert_eq!(page.next_token, Some(token));

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_stream_is_an_empty_page() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/logs/events")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body("log stream does not exist")
            .create_async()
            .await;

        let client = BuildServiceClient::new(server.url());
        let page = client
            .get_log_events("/remote/proj", "abc123", None)
            .await
            .unwrap();

        assert_eq!(page, LogPage::empty());

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_is_reported() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/logs/events")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("throttled")
            .create_async()
            .await;

        let client = BuildServiceClient::new(server.url());
        let err = client
            .get_log_events("/remote/proj", "abc123", None)
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::ApiError { status: 503, ref message } if message == "throttled"));

        mock.assert_async().await;
    }
}
