//! HTTP API calls.
//!
//! Thin wrappers over the server's JSON endpoints. Every call is a single
//! request with no retry; failures come back as [`ApiError`] for the caller
//! to show.

use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ApiError, ServerConfig, Session, validate_credentials};

/// Request body for login and user creation.
#[derive(Debug, Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

/// Successful login response.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    id: Uuid,
    username: String,
    token: String,
    refresh_token: String,
}

impl From<LoginResponse> for Session {
    fn from(response: LoginResponse) -> Self {
        Self {
            user_id: response.id,
            username: response.username,
            auth_token: response.token,
            refresh_token: response.refresh_token,
        }
    }
}

/// HTTP client for the chat server API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    server: ServerConfig,
}

impl ApiClient {
    /// Create a client for the given server.
    pub fn new(server: ServerConfig) -> Self {
        Self { http: reqwest::Client::new(), server }
    }

    /// Server endpoints this client talks to.
    pub fn server(&self) -> &ServerConfig {
        &self.server
    }

    /// Log in and return the resulting session.
    ///
    /// Any status above 201 is a failure.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, ApiError> {
        let endpoint = self.server.login_url();
        tracing::debug!(%endpoint, username, "logging in");

        let response = self
            .http
            .post(&endpoint)
            .json(&Credentials { username, password })
            .send()
            .await
            .map_err(|source| ApiError::Request { endpoint: endpoint.clone(), source })?;

        let response = expect_status(response, &endpoint, |status| status.as_u16() <= 201)?;
        let body: LoginResponse = response
            .json()
            .await
            .map_err(|source| ApiError::InvalidResponse { endpoint: endpoint.clone(), source })?;

        tracing::info!(username = %body.username, user_id = %body.id, "logged in");
        Ok(body.into())
    }

    /// Create a user. Credentials are validated locally first.
    ///
    /// Only `201 Created` counts as success.
    pub async fn create_user(&self, username: &str, password: &str) -> Result<(), ApiError> {
        validate_credentials(username, password)?;

        let endpoint = self.server.users_url();
        tracing::debug!(%endpoint, username, "creating user");

        let response = self
            .http
            .post(&endpoint)
            .json(&Credentials { username, password })
            .send()
            .await
            .map_err(|source| ApiError::Request { endpoint: endpoint.clone(), source })?;

        expect_status(response, &endpoint, |status| status == StatusCode::CREATED)?;
        tracing::info!(username, "user created");
        Ok(())
    }

    /// Check that `username` exists. Requires an authenticated session.
    ///
    /// Only `200 OK` counts as success.
    pub async fn check_user_exists(
        &self,
        session: &Session,
        username: &str,
    ) -> Result<(), ApiError> {
        if username.is_empty() {
            return Err(ApiError::EmptyUsername);
        }

        let endpoint = self.server.user_url(username);
        let mut request = self.http.get(&endpoint);
        for (name, value) in session.auth_headers() {
            request = request.header(name, value);
        }

        let response = request
            .send()
            .await
            .map_err(|source| ApiError::Request { endpoint: endpoint.clone(), source })?;

        expect_status(response, &endpoint, |status| status == StatusCode::OK)?;
        Ok(())
    }
}

/// Pass the response through if `accept` holds for its status.
fn expect_status(
    response: Response,
    endpoint: &str,
    accept: impl Fn(StatusCode) -> bool,
) -> Result<Response, ApiError> {
    let status = response.status();
    if accept(status) {
        return Ok(response);
    }

    tracing::warn!(endpoint, %status, "unexpected status");
    Err(ApiError::Status { endpoint: endpoint.to_string(), status })
}
