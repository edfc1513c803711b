//! HTTP transport shared by sources.
//!
//! A [`Session`] wraps a preconfigured [`reqwest::Client`] and exposes the
//! one operation passive sources need: an authenticated JSON `POST` that
//! either yields the raw response body or a transport error. Decoding the
//! body is left to the caller.

use std::time::Duration;

use http::header::HeaderMap;
use serde::Serialize;

use crate::{ErrorKind, Result};

/// Default timeout in seconds before a request is deemed as failed, 20.
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
/// A timeout for only the connect phase of the client.
const CONNECT_TIMEOUT: u64 = 10;
/// Default user agent, `subquake-<PKG_VERSION>`.
pub const DEFAULT_USER_AGENT: &str = concat!("subquake/", env!("CARGO_PKG_VERSION"));

/// Handles outgoing requests to upstream search APIs.
///
/// The request timeout doubles as the cancellation mechanism: every network
/// call is bounded by it, and an elapsed timeout surfaces as
/// [`ErrorKind::Transport`] to the source driving the request.
#[derive(Debug, Clone)]
pub struct Session {
    client: reqwest::Client,
}

impl Session {
    /// Create a session whose requests are bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an `Err` if the underlying client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .gzip(true)
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT))
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(ErrorKind::Transport)?;
        Ok(Self { client })
    }

    /// `POST` a JSON body to `url` with the given extra headers and return
    /// the raw response body.
    ///
    /// # Errors
    ///
    /// Returns an `Err` on connect failure, timeout, or a non-success HTTP
    /// status. The body is returned undecoded; structural problems are the
    /// caller's to detect.
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        headers: HeaderMap,
        body: &T,
    ) -> Result<Vec<u8>> {
        let response = self
            .client
            .post(url)
            .headers(headers)
            .json(body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ErrorKind::UnexpectedStatus(status));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_json, header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn post_json_returns_raw_body() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({"query": "ping"})))
            .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
            .mount(&server)
            .await;

        let session = Session::new(Duration::from_secs(5))?;
        let body = session
            .post_json(
                &server.uri(),
                HeaderMap::new(),
                &serde_json::json!({"query": "ping"}),
            )
            .await?;
        assert_eq!(body, b"pong");
        Ok(())
    }

    #[tokio::test]
    async fn non_success_status_is_a_transport_error() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let session = Session::new(Duration::from_secs(5))?;
        let result = session
            .post_json(&server.uri(), HeaderMap::new(), &serde_json::json!({}))
            .await;
        assert_eq!(
            result.unwrap_err(),
            ErrorKind::UnexpectedStatus(StatusCode::SERVICE_UNAVAILABLE)
        );
        Ok(())
    }
}
