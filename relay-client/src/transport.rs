//! Transport layer
//!
//! Abstracts the HTTP round trip so the protocol logic can be tested without a
//! server. Provides:
//! - Transport trait: one request in, status/location/body out
//! - HttpTransport: reqwest-backed implementation with basic auth

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::LOCATION;
use tracing::debug;

use crate::config::Credentials;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Request relative to the build server's base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    /// Path starting with `/`
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: Vec::new(),
        }
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            query: Vec::new(),
        }
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub location: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Transport errors
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("connection timeout")]
    Timeout,

    #[error("HTTP request failed: {0}")]
    Http(reqwest::Error),

    /// The request could not be built (bad URL, bad header value)
    #[error("invalid HTTP request: {0}")]
    InvalidRequest(reqwest::Error),

    #[error("server unavailable: {0}")]
    Unavailable(String),
}

impl TransportError {
    /// Sending the same request again may succeed
    pub fn is_transient(&self) -> bool {
        !matches!(self, Self::InvalidRequest(_))
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_builder() {
            Self::InvalidRequest(err)
        } else {
            Self::Http(err)
        }
    }
}

/// Transport trait for talking to the build server
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// reqwest-backed transport
///
/// Every request carries basic auth when credentials are configured.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    credentials: Option<Credentials>,
    client: Client,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, credentials: Option<Credentials>) -> Self {
        Self::with_client(base_url, credentials, Client::new())
    }

    /// Use a preconfigured reqwest client (proxies, TLS roots, pool limits)
    pub fn with_client(
        base_url: impl Into<String>,
        credentials: Option<Credentials>,
        client: Client,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!("{:?} {}", request.method, url);

        let builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        let builder = builder.query(&request.query);
        let builder = match &self.credentials {
            Some(creds) => builder.basic_auth(&creds.user, Some(&creds.api_token)),
            None => builder,
        };

        let response = builder.send().await?;

        let status = response.status().as_u16();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse {
            status,
            location,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        extract::{Path, Query},
        http::{HeaderMap, StatusCode, header},
        response::{IntoResponse, Response},
        routing::{get, post},
    };
    use std::collections::HashMap;

    // base64("bot:secret")
    const EXPECTED_AUTH: &str = "Basic Ym90OnNlY3JldA==";

    fn authorized(headers: &HeaderMap) -> bool {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            == Some(EXPECTED_AUTH)
    }

    async fn trigger(
        Path(job): Path<String>,
        Query(params): Query<HashMap<String, String>>,
        headers: HeaderMap,
    ) -> Response {
        if !authorized(&headers) {
            return StatusCode::UNAUTHORIZED.into_response();
        }
        if job == "broken" {
            return (StatusCode::INTERNAL_SERVER_ERROR, "job is disabled").into_response();
        }
        let location = format!(
            "http://ci.local/queue/item/17/?job={}&branch={}",
            job,
            params.get("ghprbTargetBranch").cloned().unwrap_or_default()
        );
        (StatusCode::CREATED, [(header::LOCATION, location)]).into_response()
    }

    async fn echo_query(Query(params): Query<HashMap<String, String>>) -> Json<serde_json::Value> {
        Json(serde_json::json!({ "query": params }))
    }

    async fn spawn_server() -> String {
        let app = Router::new()
            .route("/job/{job}/buildWithParameters", post(trigger))
            .route("/echo", get(echo_query));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn credentials() -> Option<Credentials> {
        Some(Credentials::new("bot", "secret"))
    }

    #[test]
    fn test_transport_trims_trailing_slash() {
        let transport = HttpTransport::new("http://ci.local:8080/", None);
        assert_eq!(transport.base_url(), "http://ci.local:8080");
    }

    #[test]
    fn test_request_builder() {
        let request = HttpRequest::post("/job/e2e/buildWithParameters")
            .query("ghprbPullId", "42")
            .query("buildId", "e2e-42-1");
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.query_value("buildId"), Some("e2e-42-1"));
        assert_eq!(request.query_value("missing"), None);
    }

    #[tokio::test]
    async fn test_post_returns_status_and_location() {
        let base = spawn_server().await;
        let transport = HttpTransport::new(base, credentials());

        let response = transport
            .execute(
                HttpRequest::post("/job/e2e/buildWithParameters")
                    .query("ghprbTargetBranch", "main"),
            )
            .await
            .unwrap();

        assert_eq!(response.status, 201);
        assert_eq!(
            response.location.as_deref(),
            Some("http://ci.local/queue/item/17/?job=e2e&branch=main")
        );
    }

    #[tokio::test]
    async fn test_missing_credentials_are_rejected_by_server() {
        let base = spawn_server().await;
        let transport = HttpTransport::new(base, None);

        let response = transport
            .execute(HttpRequest::post("/job/e2e/buildWithParameters"))
            .await
            .unwrap();

        assert_eq!(response.status, 401);
        assert_eq!(response.location, None);
    }

    #[tokio::test]
    async fn test_error_body_is_returned() {
        let base = spawn_server().await;
        let transport = HttpTransport::new(base, credentials());

        let response = transport
            .execute(HttpRequest::post("/job/broken/buildWithParameters"))
            .await
            .unwrap();

        assert!(!response.is_success());
        assert_eq!(response.text(), "job is disabled");
    }

    #[tokio::test]
    async fn test_query_values_are_encoded() {
        let base = spawn_server().await;
        let transport = HttpTransport::new(base, None);
        let tree = "builds[number,result,actions[parameters[name,value]]]";

        let response = transport
            .execute(HttpRequest::get("/echo").query("tree", tree))
            .await
            .unwrap();

        let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
        assert_eq!(body["query"]["tree"], tree);
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = HttpTransport::new(format!("http://{}", addr), None);
        let err = transport
            .execute(HttpRequest::get("/queue/api/json"))
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::Http(_)));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_unparseable_url_is_not_transient() {
        let transport = HttpTransport::new("http://[bad-host", None);
        let err = transport
            .execute(HttpRequest::get("/queue/api/json"))
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::InvalidRequest(_)));
        assert!(!err.is_transient());
    }
}
