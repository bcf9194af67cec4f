//! Tutor API error types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tutor error with classification
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TutorError {
    pub kind: TutorErrorKind,
    pub message: String,
}

impl TutorError {
    #[must_use]
    pub fn new(kind: TutorErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(TutorErrorKind::Network, message)
    }

    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(TutorErrorKind::Timeout, message)
    }

    #[must_use]
    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(TutorErrorKind::Auth, message)
    }

    #[must_use]
    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::new(TutorErrorKind::RateLimit, message)
    }

    #[must_use]
    pub fn server_error(message: impl Into<String>) -> Self {
        Self::new(TutorErrorKind::ServerError, message)
    }

    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(TutorErrorKind::InvalidRequest, message)
    }

    #[must_use]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(TutorErrorKind::InvalidResponse, message)
    }

    #[must_use]
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(TutorErrorKind::Unknown, message)
    }

    /// Classify a non-success HTTP status
    #[must_use]
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        match status.as_u16() {
            401 | 403 => Self::auth(format!("Authentication failed: {body}")),
            429 => Self::rate_limit(format!("Rate limited: {body}")),
            400 | 404 | 422 => Self::invalid_request(format!("Invalid request: {body}")),
            500..=599 => Self::server_error(format!("Server error: {body}")),
            _ => Self::unknown(format!("HTTP {status}: {body}")),
        }
    }

    /// Classify a reqwest transport error
    #[must_use]
    pub fn from_transport(e: &reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::timeout(format!("Request timeout: {e}"))
        } else if e.is_connect() {
            Self::network(format!("Connection failed: {e}"))
        } else {
            Self::network(format!("Request failed: {e}"))
        }
    }
}

/// Error classification, used for logging and the submit outcome.
///
/// Every kind takes the same fallback path in the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TutorErrorKind {
    /// Connection refused, DNS, reset
    Network,
    /// Client timeout elapsed
    Timeout,
    /// 401/403
    Auth,
    /// 429
    RateLimit,
    /// 5xx
    ServerError,
    /// 4xx other than auth and rate limit
    InvalidRequest,
    /// Success status with a body we couldn't parse
    InvalidResponse,
    Unknown,
}
