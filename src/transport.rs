//! Transport Module
//!
//! HTTP access to the upstream catalog API behind a small trait, so the
//! retry and catalog layers depend only on `TransportError`'s
//! classification surface.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::TransportError;
use crate::session::SessionStore;

/// Header identifying the calling client to the upstream API
pub const CLIENT_PLATFORM_HEADER: &str = "X-Client-Platform";

/// Value sent in [`CLIENT_PLATFORM_HEADER`]
pub const CLIENT_PLATFORM: &str = "miniecom-rust";

// == Response ==
/// Successful upstream response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code (2xx)
    pub status: u16,
    /// Raw response body
    pub body: String,
}

impl Response {
    /// Decodes the body as JSON.
    ///
    /// # Errors
    /// A body that does not match `T` is a permanent `TransportError`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TransportError> {
        serde_json::from_str(&self.body).map_err(|err| {
            TransportError::status(self.status, format!("Invalid response body: {}", err))
        })
    }
}

// == Transport ==
/// Request functions of the upstream API.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `GET <base>/<path>?<query>`; non-2xx responses are errors.
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Response, TransportError>;

    /// Sends `POST <base>/<path>` with a JSON body; non-2xx responses are
    /// errors.
    async fn post(&self, path: &str, body: &serde_json::Value) -> Result<Response, TransportError>;
}

// == HTTP Transport ==
/// `Transport` over reqwest.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    session: Option<SessionStore>,
}

impl HttpTransport {
    /// Creates a transport for `base_url` with a per-request `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| TransportError::no_response(format!("HTTP client setup failed: {}", err)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session: None,
        })
    }

    /// Attaches the session's token as a bearer token on every request.
    pub fn with_session(mut self, session: SessionStore) -> Self {
        self.session = Some(session);
        self
    }

    /// Returns the base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        label: &str,
    ) -> Result<Response, TransportError> {
        let mut request = request.header(CLIENT_PLATFORM_HEADER, CLIENT_PLATFORM);

        if let Some(session) = &self.session {
            if let Some(token) = session.valid_token().await {
                request = request.bearer_auth(token);
                debug!("Token attached to request");
            }
        }

        debug!("{}", label);
        let response = request.send().await.map_err(classify_reqwest_error)?;
        let status = response.status();
        let body = response.text().await.map_err(classify_reqwest_error)?;

        if !status.is_success() {
            return Err(TransportError::status(
                status.as_u16(),
                format!("{} failed with status {}", label, status),
            ));
        }

        Ok(Response {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Response, TransportError> {
        let request = self.client.get(self.url_for(path)).query(query);
        self.send(request, &format!("GET {}", path)).await
    }

    async fn post(&self, path: &str, body: &serde_json::Value) -> Result<Response, TransportError> {
        let request = self.client.post(self.url_for(path)).json(body);
        self.send(request, &format!("POST {}", path)).await
    }
}

/// Maps a reqwest failure onto the classification flags.
fn classify_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::timeout(err.to_string());
    }

    match err.status() {
        Some(status) => TransportError::status(status.as_u16(), err.to_string()),
        None => TransportError::no_response(err.to_string()),
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::{ErrorClass, Retryable};
    use crate::storage::MemoryStore;
    use std::sync::Arc;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/1"))
            .and(header(CLIENT_PLATFORM_HEADER, CLIENT_PLATFORM))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"id":1}"#))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(server.uri(), Duration::from_secs(5)).unwrap();
        let response = transport.get("/products/1", &[]).await.unwrap();

        assert_eq!(response.status, 200);
        let json: serde_json::Value = response.json().unwrap();
        assert_eq!(json["id"], 1);
    }

    #[tokio::test]
    async fn test_server_error_is_transient() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(server.uri(), Duration::from_secs(5)).unwrap();
        let err = transport.get("products", &[]).await.unwrap_err();

        assert_eq!(err.status, Some(503));
        assert_eq!(err.classify(), ErrorClass::Transient);
    }

    #[tokio::test]
    async fn test_not_found_is_permanent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(server.uri(), Duration::from_secs(5)).unwrap();
        let err = transport.get("products/999999", &[]).await.unwrap_err();

        assert_eq!(err.status, Some(404));
        assert_eq!(err.classify(), ErrorClass::Permanent);
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(server.uri(), Duration::from_millis(50)).unwrap();
        let err = transport.get("products", &[]).await.unwrap_err();

        assert!(err.timed_out);
        assert_eq!(err.classify(), ErrorClass::Transient);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_no_response() {
        // Port 9 (discard) is closed on test machines
        let transport = HttpTransport::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = transport.get("products", &[]).await.unwrap_err();

        assert!(err.no_response);
        assert_eq!(err.classify(), ErrorClass::Transient);
    }

    #[tokio::test]
    async fn test_query_is_encoded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/search"))
            .and(query_param("q", "red lipstick"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(server.uri(), Duration::from_secs(5)).unwrap();
        let query = [("q", "red lipstick".to_string())];

        assert!(transport.get("products/search", &query).await.is_ok());
    }

    #[tokio::test]
    async fn test_bearer_token_attached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("authorization", "Bearer secret-token"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;

        let session = SessionStore::new(Arc::new(MemoryStore::new()));
        session
            .set_token("secret-token", Duration::from_secs(60))
            .await
            .unwrap();

        let transport = HttpTransport::new(server.uri(), Duration::from_secs(5))
            .unwrap()
            .with_session(session);

        assert!(transport.get("auth/me", &[]).await.is_ok());
    }

    #[test]
    fn test_url_joining() {
        let transport =
            HttpTransport::new("https://dummyjson.com/", Duration::from_secs(1)).unwrap();

        assert_eq!(transport.base_url(), "https://dummyjson.com");
        assert_eq!(transport.url_for("/products/1"), "https://dummyjson.com/products/1");
        assert_eq!(transport.url_for("products"), "https://dummyjson.com/products");
    }

    #[test]
    fn test_invalid_body_is_permanent() {
        let response = Response {
            status: 200,
            body: "<html>".to_string(),
        };

        let err = response.json::<serde_json::Value>().unwrap_err();
        assert_eq!(err.classify(), ErrorClass::Permanent);
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(header(CLIENT_PLATFORM_HEADER, CLIENT_PLATFORM))
            .and(body_json(serde_json::json!({"username": "emilys"})))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(server.uri(), Duration::from_secs(5)).unwrap();
        let response = transport
            .post("auth/login", &serde_json::json!({"username": "emilys"}))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn test_post_rejection_carries_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(server.uri(), Duration::from_secs(5)).unwrap();
        let err = transport
            .post("auth/login", &serde_json::json!({}))
            .await
            .unwrap_err();

        assert_eq!(err.status, Some(400));
        assert_eq!(err.classify(), ErrorClass::Permanent);
    }
}
