//! Error taxonomy for the relay.
//!
//! Every failure a request can hit is folded into [`ApiError`] and rendered
//! as the uniform boundary shape `{"success": false, "error": ..., "status_code"?: ...}`
//! with an HTTP status mirroring the error class. Handlers never panic on
//! upstream or network failures; they return one of these variants instead.

use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    /// Spotify reported an error during the authorization redirect.
    OAuth(String),
    /// The callback state did not match the state issued at login.
    CsrfMismatch,
    /// No access token is available; the user has to authenticate first.
    NotAuthenticated,
    /// Malformed or incomplete client input.
    InvalidRequest(String),
    /// Non-401 failure from Spotify; status and message are forwarded verbatim.
    Upstream { status: u16, message: String },
    /// The access token expired and could not be refreshed, or the retry
    /// after a refresh was rejected again.
    RefreshFailed,
    /// Transport-level failure talking to Spotify.
    Network(reqwest::Error),
    /// The token store could not be written.
    Storage(String),
}

impl ApiError {
    /// The HTTP status this error maps to at the boundary.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::OAuth(_) | ApiError::CsrfMismatch | ApiError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotAuthenticated | ApiError::RefreshFailed => StatusCode::UNAUTHORIZED,
            ApiError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ApiError::Network(_) | ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::OAuth(e) => write!(f, "{}", e),
            ApiError::CsrfMismatch => write!(f, "State mismatch - possible CSRF attack"),
            ApiError::NotAuthenticated => {
                write!(f, "Not authenticated. Please authenticate with Spotify first.")
            }
            ApiError::InvalidRequest(msg) => write!(f, "{}", msg),
            ApiError::Upstream { message, .. } => write!(f, "{}", message),
            ApiError::RefreshFailed => write!(
                f,
                "Access token expired and refresh failed. Please re-authenticate at /auth/login"
            ),
            ApiError::Network(e) => write!(f, "Request to Spotify API failed: {}", e),
            ApiError::Storage(e) => write!(f, "Failed to persist tokens: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "success": false,
            "error": self.to_string(),
        });
        if let ApiError::Upstream { status, .. } = &self {
            body["status_code"] = json!(status);
        }
        (self.status(), Json(body)).into_response()
    }
}
