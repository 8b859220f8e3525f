//! Session credentials and server endpoints.

use std::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use uuid::Uuid;

/// Header carrying the bearer token.
pub const AUTH_HEADER: &str = "auth";

/// Header carrying the refresh token.
pub const REFRESH_TOKEN_HEADER: &str = "x-refresh-token";

const LOGIN_PATH: &str = "api/login";
const USERS_PATH: &str = "api/users";
const WEBSOCKET_PATH: &str = "ws";

/// Characters escaped in a single path segment: everything but unreserved.
const PATH_SEGMENT: &AsciiSet =
    &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Credentials of the logged-in user.
///
/// Created once by a successful login and never modified afterwards. Lives
/// only in memory.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    /// Server-assigned user identifier.
    pub user_id: Uuid,
    /// Username as confirmed by the server.
    pub username: String,
    /// Bearer token for authorized requests.
    pub auth_token: String,
    /// Refresh token sent alongside the bearer token.
    pub refresh_token: String,
}

impl Session {
    /// Authorization headers for HTTP requests and the WebSocket handshake.
    pub fn auth_headers(&self) -> [(&'static str, String); 2] {
        [
            (AUTH_HEADER, format!("Bearer {}", self.auth_token)),
            (REFRESH_TOKEN_HEADER, format!("Token {}", self.refresh_token)),
        ]
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("username", &self.username)
            .field("auth_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Identity a connection sends messages as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
    /// Username placed in the sender field of outgoing messages.
    pub name: String,
    /// User identifier.
    pub id: Uuid,
}

impl From<&Session> for UserInfo {
    fn from(session: &Session) -> Self {
        Self { name: session.username.clone(), id: session.user_id }
    }
}

/// Server endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    base_url: String,
    websocket_url: String,
}

impl ServerConfig {
    /// Endpoints of a plain-HTTP server at `host:port`.
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            base_url: format!("http://{host}:{port}/"),
            websocket_url: format!("ws://{host}:{port}/{WEBSOCKET_PATH}"),
        }
    }

    /// Base URL of the HTTP API, ending in `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the streaming endpoint.
    pub fn websocket_url(&self) -> &str {
        &self.websocket_url
    }

    /// Login endpoint.
    pub fn login_url(&self) -> String {
        format!("{}{LOGIN_PATH}", self.base_url)
    }

    /// User creation endpoint.
    pub fn users_url(&self) -> String {
        format!("{}{USERS_PATH}", self.base_url)
    }

    /// Lookup endpoint for a single user.
    ///
    /// The username is percent-encoded as one path segment, so `/`, `?` and
    /// `#` stay part of the name.
    pub fn user_url(&self, username: &str) -> String {
        let segment = utf8_percent_encode(username, PATH_SEGMENT);
        format!("{}{USERS_PATH}/{segment}", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            user_id: Uuid::nil(),
            username: "alice123456".into(),
            auth_token: "jwt".into(),
            refresh_token: "refresh".into(),
        }
    }

    #[test]
    fn auth_headers_carry_both_tokens() {
        let headers = session().auth_headers();
        assert_eq!(headers[0], (AUTH_HEADER, "Bearer jwt".to_string()));
        assert_eq!(headers[1], (REFRESH_TOKEN_HEADER, "Token refresh".to_string()));
    }

    #[test]
    fn debug_redacts_tokens() {
        let debug = format!("{:?}", session());
        assert!(debug.contains("alice123456"));
        assert!(!debug.contains("jwt"));
        assert!(!debug.contains("refresh\""));
    }

    #[test]
    fn endpoints_from_host_and_port() {
        let server = ServerConfig::new("localhost", 8080);
        assert_eq!(server.base_url(), "http://localhost:8080/");
        assert_eq!(server.websocket_url(), "ws://localhost:8080/ws");
        assert_eq!(server.login_url(), "http://localhost:8080/api/login");
        assert_eq!(server.users_url(), "http://localhost:8080/api/users");
        assert_eq!(server.user_url("bob"), "http://localhost:8080/api/users/bob");
    }

    #[test]
    fn user_url_escapes_reserved_characters() {
        let server = ServerConfig::new("localhost", 8080);
        assert_eq!(
            server.user_url("bob#1?x=1/y"),
            "http://localhost:8080/api/users/bob%231%3Fx%3D1%2Fy"
        );
        assert_eq!(server.user_url("bob_1.2-3~"), "http://localhost:8080/api/users/bob_1.2-3~");
        assert_eq!(server.user_url("bé b"), "http://localhost:8080/api/users/b%C3%A9%20b");
    }
}
