//! Authenticated HTTP transport for the search API
//!
//! [`Transport`] is the seam between the job client and the network. The
//! production implementation, [`HttpTransport`], sends every request with
//! basic authentication, fixed JSON headers and the stored session cookies,
//! and turns any network fault or status >= 300 into an [`ApiError`].

use super::session::Session;
use crate::config::Credentials;
use crate::domain::{ApiError, Result, SumoError};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE};
use reqwest::{Client, ClientBuilder, Method};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use std::sync::Mutex;
use std::time::Duration;

/// HTTP verbs used by the search API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    /// Whether the call changes server-side state
    pub fn is_state_changing(&self) -> bool {
        matches!(self, HttpMethod::Post)
    }
}

/// One request to the search API
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn with_query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Value of a query parameter, if present
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Status and body of a completed call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> std::result::Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|e| {
            ApiError::InvalidResponse(format!("{e}; body: {}", truncate(&self.body, 512)))
        })
    }

    /// Error for a response whose status the caller didn't expect
    pub fn unexpected(self) -> ApiError {
        ApiError::UnexpectedStatus {
            status: self.status,
            body: self.body,
        }
    }
}

/// Request/response seam to the search API
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform a single call, without retrying
    ///
    /// # Errors
    ///
    /// Network faults and any HTTP status >= 300 are returned as [`ApiError`].
    async fn request(&self, request: ApiRequest) -> std::result::Result<ApiResponse, ApiError>;
}

/// reqwest-based transport with basic auth and persistent session cookies
pub struct HttpTransport {
    client: Client,
    credentials: Credentials,
    session: Mutex<Session>,
}

impl HttpTransport {
    /// Create a new transport
    ///
    /// # Errors
    ///
    /// Returns [`SumoError::Configuration`] if the HTTP client cannot be built.
    pub fn new(credentials: Credentials, session: Session, timeout: Duration) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(concat!("sumo-export/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SumoError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            credentials,
            session: Mutex::new(session),
        })
    }

    /// Copy of the current session state
    pub fn session(&self) -> Session {
        self.lock_session().clone()
    }

    /// Build authorization header value
    fn auth_header_value(&self) -> String {
        let credentials = format!(
            "{}:{}",
            self.credentials.identity,
            self.credentials.secret.expose_secret().as_ref()
        );
        let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());
        format!("Basic {encoded}")
    }

    fn lock_session(&self) -> std::sync::MutexGuard<'_, Session> {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, request: ApiRequest) -> std::result::Result<ApiResponse, ApiError> {
        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        };

        let mut builder = self
            .client
            .request(method, &request.url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, self.auth_header_value());

        let cookie = self.lock_session().cookie_header();
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.to_string());
        }

        tracing::debug!(method = ?request.method, url = %request.url, "Sending request");

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout(e.to_string())
            } else {
                ApiError::ConnectionFailed(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let set_cookies: Vec<String> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(str::to_string)
            .collect();

        {
            let mut session = self.lock_session();
            session.absorb(set_cookies.iter().map(String::as_str));
            if request.method.is_state_changing() {
                if let Err(e) = session.save() {
                    tracing::warn!(error = %e, "Failed to persist session cookies");
                }
            }
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout(e.to_string())
            } else {
                ApiError::InvalidResponse(format!("Failed to read response body: {e}"))
            }
        })?;

        if status >= 300 {
            return Err(ApiError::UnexpectedStatus { status, body });
        }

        Ok(ApiResponse { status, body })
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builders() {
        let request = ApiRequest::get("https://api.example.com/jobs/1/messages")
            .with_query("limit", 10_000)
            .with_query("offset", 20_000);

        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.query_param("limit"), Some("10000"));
        assert_eq!(request.query_param("offset"), Some("20000"));
        assert_eq!(request.query_param("missing"), None);
        assert!(request.body.is_none());

        let post = ApiRequest::post("https://api.example.com/jobs", serde_json::json!({"a": 1}));
        assert!(post.method.is_state_changing());
        assert!(!request.method.is_state_changing());
    }

    #[test]
    fn test_response_json_error_is_invalid_response() {
        #[derive(Debug, serde::Deserialize)]
        struct Created {
            #[allow(dead_code)]
            id: String,
        }

        let response = ApiResponse::new(202, "<html>oops</html>");
        let err = response.json::<Created>().unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[test]
    fn test_unexpected_keeps_status_and_body() {
        let err = ApiResponse::new(200, "{}").unexpected();
        assert_eq!(
            err,
            ApiError::UnexpectedStatus {
                status: 200,
                body: "{}".to_string()
            }
        );
    }

    #[test]
    fn test_auth_header_is_basic() {
        let transport = HttpTransport::new(
            Credentials::new("user", "pass"),
            Session::in_memory(),
            Duration::from_secs(10),
        )
        .unwrap();

        // base64("user:pass")
        assert_eq!(transport.auth_header_value(), "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abcdef", 3), "abc");
        assert_eq!(truncate("ab", 3), "ab");
        assert_eq!(truncate("ééé", 2), "éé");
    }
}
