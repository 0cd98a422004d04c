//! Todo service HTTP clients
//!
//! - `AuthClient`: login and registration
//! - `TodoClient`: bearer-authenticated CRUD on the todo collection
//!
//! Both share one `HttpClient` (connection pool, base URL, timeout).

pub mod auth;
pub mod todos;

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use crate::config::Config;

pub use auth::AuthClient;
pub use todos::TodoClient;

/// Login endpoint (form-encoded credentials)
pub const LOGIN_PATH: &str = "/api/v1/auth/login/access-token";

/// Registration endpoint (JSON credentials)
pub const REGISTER_PATH: &str = "/api/v1/auth/register";

/// Todo collection endpoint
pub const TODOS_PATH: &str = "/api/v1/todos/";

/// Errors returned by the todo service clients
#[derive(Error, Debug)]
pub enum ApiError {
    /// The service answered with a non-success status
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The request never produced a response
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// A success response had an unexpected body
    #[error("Unexpected response from server: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    pub(crate) fn rejected(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError::Rejected {
            status: status.as_u16(),
            message: message.into(),
        }
    }

    /// HTTP status, when the service answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            ApiError::Request(e) => e.status().map(|s| s.as_u16()),
            ApiError::InvalidResponse(_) => None,
        }
    }

    /// The token was refused
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED.as_u16())
    }
}

/// Shared HTTP client rooted at the service URL
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a client for `base_url` (trailing slashes are dropped)
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    /// Client for the configured service URL and timeout
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(config.api_url.as_str(), config.request_timeout())
    }

    /// Service root without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    /// Absolute URL for an API path
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Error body shape used by the service: `{ "detail": ... }`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

/// Extract a human-readable `detail` from an error body
///
/// `detail` is either a string or, for request validation failures, a
/// list of objects carrying a `msg`.
pub(crate) fn detail_message(body: &str) -> Option<String> {
    let detail = serde_json::from_str::<ErrorBody>(body).ok()?.detail?;
    match detail {
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        serde_json::Value::Array(items) => items
            .first()
            .and_then(|item| item.get("msg"))
            .and_then(|msg| msg.as_str())
            .map(str::to_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trims_trailing_slashes() {
        let http = HttpClient::new("http://localhost:8000//", Duration::from_secs(1)).unwrap();
        assert_eq!(http.base_url(), "http://localhost:8000");
        assert_eq!(http.url(TODOS_PATH), "http://localhost:8000/api/v1/todos/");
    }

    #[test]
    fn test_detail_message_string() {
        assert_eq!(
            detail_message(r#"{"detail": "Incorrect email or password"}"#),
            Some("Incorrect email or password".to_string())
        );
    }

    #[test]
    fn test_detail_message_validation_list() {
        let body = r#"{"detail": [{"loc": ["body", "email"], "msg": "value is not a valid email address"}]}"#;
        assert_eq!(
            detail_message(body),
            Some("value is not a valid email address".to_string())
        );
    }

    #[test]
    fn test_detail_message_missing() {
        assert_eq!(detail_message(r#"{"error": "nope"}"#), None);
        assert_eq!(detail_message(r#"{"detail": ""}"#), None);
        assert_eq!(detail_message("Internal Server Error"), None);
    }

    #[test]
    fn test_rejected_status_helpers() {
        let err = ApiError::rejected(StatusCode::UNAUTHORIZED, "Failed to fetch todos");
        assert_eq!(err.status(), Some(401));
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "Failed to fetch todos");

        let err = ApiError::InvalidResponse("missing field".into());
        assert!(err.status().is_none());
    }
}
