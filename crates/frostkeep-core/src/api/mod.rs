//! REST backend clients and shared wire plumbing.

pub mod auth;
pub mod categories;
pub mod files;
pub mod items;
pub mod types;
pub mod users;

use std::fmt;

use anyhow::{Context, Result};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::Config;

/// Standard User-Agent header for frostkeep API requests.
pub const USER_AGENT: &str = concat!("frostkeep/", env!("CARGO_PKG_VERSION"));

/// Environment variable overriding the backend base URL.
pub const BACKEND_URL_ENV: &str = "FROSTKEEP_BACKEND_URL";

/// Error category for backend calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Credentials or token rejected (401/403)
    Auth,
    /// Any other non-success HTTP status
    Http,
    /// The request could not be completed (no response)
    Network,
    /// Failed to parse a response body
    Parse,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Auth => write!(f, "auth"),
            ApiErrorKind::Http => write!(f, "http"),
            ApiErrorKind::Network => write!(f, "network"),
            ApiErrorKind::Parse => write!(f, "parse"),
        }
    }
}

/// Error from a backend call.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// Error category
    pub kind: ApiErrorKind,
    /// HTTP status, when a response was received
    pub status: Option<u16>,
    /// One-line summary suitable for display
    pub message: String,
    /// Optional raw error body
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error without an HTTP status.
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
            details: None,
        }
    }

    /// Creates an error from a non-success HTTP status and its body.
    ///
    /// The backend reports failures as `{"message": "..."}` (and some
    /// prototypes as `{"error": "..."}`); either is preferred over the bare
    /// status line when present.
    pub fn http_status(status: u16, body: &str) -> Self {
        let kind = if status == 401 || status == 403 {
            ApiErrorKind::Auth
        } else {
            ApiErrorKind::Http
        };

        let message = extract_error_message(body)
            .unwrap_or_else(|| format!("HTTP {status}"));

        Self {
            kind,
            status: Some(status),
            message,
            details: (!body.is_empty()).then(|| body.to_string()),
        }
    }

    /// Creates a network error from a transport failure.
    pub fn network(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "Request timed out".to_string()
        } else if err.is_connect() {
            "Could not connect to the backend".to_string()
        } else {
            "Request failed before a response was received".to_string()
        };
        Self {
            kind: ApiErrorKind::Network,
            status: None,
            message,
            details: Some(err.to_string()),
        }
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Parse, message)
    }

    /// Returns true when the backend answered 401 (session expired).
    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(401)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for backend operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Pulls a display message out of an error body, if the body carries one.
fn extract_error_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    if let Some(msg) = json.get("message").and_then(Value::as_str) {
        if !msg.is_empty() {
            return Some(msg.to_string());
        }
    }
    if let Some(msg) = json.get("error").and_then(Value::as_str) {
        if !msg.is_empty() {
            return Some(msg.to_string());
        }
    }
    None
}

/// Resolves the backend base URL with precedence: env > config > default.
pub fn resolve_backend_url(config: &Config) -> Result<String> {
    if let Ok(env_url) = std::env::var(BACKEND_URL_ENV) {
        let trimmed = env_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed)?;
            return Ok(trimmed.to_string());
        }
    }

    if let Some(config_url) = config.backend.effective_base_url() {
        validate_url(config_url)?;
        return Ok(config_url.to_string());
    }

    Ok(Config::DEFAULT_BASE_URL.to_string())
}

fn validate_url(url: &str) -> Result<()> {
    url::Url::parse(url).with_context(|| format!("Invalid backend base URL: {url}"))?;
    Ok(())
}

/// Shared HTTP handle for all backend clients.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct Backend {
    http: reqwest::Client,
    base_url: String,
}

impl Backend {
    /// Creates a backend handle for a base URL with default client settings.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Creates a backend handle from configuration (URL resolution + timeout).
    pub fn from_config(config: &Config) -> Result<Self> {
        let base_url = resolve_backend_url(config)?;

        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self { http, base_url })
    }

    /// Returns the base URL this handle points at.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins a path onto the base URL.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        self.http.get(self.url(path))
    }

    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.http.post(self.url(path))
    }

    pub(crate) fn put(&self, path: &str) -> RequestBuilder {
        self.http.put(self.url(path))
    }

    pub(crate) fn delete(&self, path: &str) -> RequestBuilder {
        self.http.delete(self.url(path))
    }
}

/// Sends a request and parses a JSON body from a success response.
pub(crate) async fn expect_json<T: DeserializeOwned>(builder: RequestBuilder) -> ApiResult<T> {
    let response = fail_on_status(builder).await?;
    response
        .json()
        .await
        .map_err(|err| ApiError::parse(format!("Invalid response body: {err}")))
}

/// Sends a request and discards the body of a success response.
pub(crate) async fn expect_ok(builder: RequestBuilder) -> ApiResult<()> {
    fail_on_status(builder).await?;
    Ok(())
}

async fn fail_on_status(builder: RequestBuilder) -> ApiResult<reqwest::Response> {
    let response = builder.send().await.map_err(ApiError::network)?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::http_status(status.as_u16(), &body))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Error mapping: 401 with a message body becomes an auth error.
    #[test]
    fn test_http_status_unauthorized() {
        let err = ApiError::http_status(401, r#"{"message":"Bad credentials"}"#);
        assert_eq!(err.kind, ApiErrorKind::Auth);
        assert_eq!(err.status, Some(401));
        assert_eq!(err.message, "Bad credentials");
        assert!(err.is_unauthorized());
    }

    /// Error mapping: 403 is an auth error but not "unauthorized".
    #[test]
    fn test_http_status_forbidden() {
        let err = ApiError::http_status(403, "");
        assert_eq!(err.kind, ApiErrorKind::Auth);
        assert_eq!(err.message, "HTTP 403");
        assert!(!err.is_unauthorized());
    }

    /// Error mapping: the `error` field is used when `message` is absent.
    #[test]
    fn test_http_status_error_field() {
        let err = ApiError::http_status(400, r#"{"success":false,"error":"File too large"}"#);
        assert_eq!(err.kind, ApiErrorKind::Http);
        assert_eq!(err.message, "File too large");
    }

    /// Error mapping: non-JSON bodies fall back to the status line.
    #[test]
    fn test_http_status_plain_body() {
        let err = ApiError::http_status(500, "Internal Server Error");
        assert_eq!(err.kind, ApiErrorKind::Http);
        assert_eq!(err.message, "HTTP 500");
        assert_eq!(err.details.as_deref(), Some("Internal Server Error"));
    }

    /// URL joining tolerates a trailing slash on the base.
    #[test]
    fn test_backend_url_join() {
        let backend = Backend::new("http://localhost:8082/api/");
        assert_eq!(
            backend.url("/items/search"),
            "http://localhost:8082/api/items/search"
        );
    }

    /// Base URL resolution: config wins over the built-in default.
    #[test]
    fn test_resolve_backend_url_from_config() {
        let config = Config {
            backend: crate::config::BackendConfig {
                base_url: Some("https://freezer.example.com/api".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let url = resolve_backend_url(&config).unwrap();
        assert_eq!(url, "https://freezer.example.com/api");
    }

    /// Base URL resolution: unset everywhere falls back to the default.
    #[test]
    fn test_resolve_backend_url_default() {
        let config = Config::default();
        let url = resolve_backend_url(&config).unwrap();
        assert_eq!(url, Config::DEFAULT_BASE_URL);
    }
}
