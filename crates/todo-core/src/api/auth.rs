//! Login and registration against the todo service

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{detail_message, ApiError, HttpClient, LOGIN_PATH, REGISTER_PATH};

/// Message used when a failed login carries no `detail`
pub const LOGIN_FAILED: &str = "Login failed";

/// Message used when a failed registration carries no `detail`
pub const REGISTRATION_FAILED: &str = "Registration failed";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Client for the authentication endpoints
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: HttpClient,
}

impl AuthClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Exchange credentials for a bearer token
    ///
    /// Credentials are sent form-encoded as `username` / `password`.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let response = self
            .http
            .client()
            .post(self.http.url(LOGIN_PATH))
            .form(&[("username", email), ("password", password)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = detail_message(&body).unwrap_or_else(|| LOGIN_FAILED.to_string());
            warn!(status = status.as_u16(), %message, "Login rejected");
            return Err(ApiError::rejected(status, message));
        }

        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        debug!("Login succeeded");
        Ok(token.access_token)
    }

    /// Create an account; success carries no payload
    pub async fn register(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let response = self
            .http
            .client()
            .post(self.http.url(REGISTER_PATH))
            .json(&RegisterRequest { email, password })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message =
                detail_message(&body).unwrap_or_else(|| REGISTRATION_FAILED.to_string());
            warn!(status = status.as_u16(), %message, "Registration rejected");
            return Err(ApiError::rejected(status, message));
        }

        debug!("Registration succeeded");
        Ok(())
    }
}
