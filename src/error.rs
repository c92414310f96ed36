//! Bot error types with HTTP status code mapping.
//!
//! [`GameError`] is the central error type of the crate. Each variant
//! maps to a specific HTTP status code and structured JSON error response.
//! Rejected guesses are not errors: they are reported through
//! [`crate::domain::AnswerRejection`] and never abort a round.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::{ChannelId, ParticipantId};

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2002,
///     "message": "a round is already running in channel C123",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Crate-wide error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                  |
/// |-----------|-----------------|------------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request / 401        |
/// | 2000–2999 | State/Not Found | 404 Not Found / 409 Conflict |
/// | 3000–3999 | Server          | 500 Internal Server Error    |
/// | 4000–4999 | Upstream        | 502 Bad Gateway              |
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// No round has ever been started in the channel.
    #[error("no round in channel {0}")]
    RoundNotFound(ChannelId),

    /// A round is still collecting answers in the channel.
    #[error("a round is already running in channel {0}")]
    RoundInProgress(ChannelId),

    /// Statistics were requested from a round that has not finished.
    #[error("round in channel {0} has not finished")]
    RoundNotFinished(ChannelId),

    /// The participant has never played a finished round.
    #[error("no statistics for participant {0}")]
    StatsNotFound(ParticipantId),

    /// The product source failed to provide a product.
    #[error("product lookup failed: {0}")]
    ProductLookup(String),

    /// Configuration values are out of range or malformed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Event callback carried a wrong verification token.
    #[error("request verification failed")]
    Unauthorized,

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GameError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::InvalidConfig(_) => 1002,
            Self::Unauthorized => 1003,
            Self::RoundNotFound(_) => 2001,
            Self::RoundInProgress(_) => 2002,
            Self::RoundNotFinished(_) => 2003,
            Self::StatsNotFound(_) => 2004,
            Self::Internal(_) => 3000,
            Self::ProductLookup(_) => 4001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::InvalidConfig(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::RoundNotFound(_) | Self::StatsNotFound(_) => StatusCode::NOT_FOUND,
            Self::RoundInProgress(_) | Self::RoundNotFinished(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ProductLookup(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_in_progress_is_conflict() {
        let err = GameError::RoundInProgress(ChannelId::new("C1"));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.error_code(), 2002);
        assert_eq!(err.to_string(), "a round is already running in channel C1");
    }

    #[test]
    fn into_response_sets_status() {
        let response = GameError::StatsNotFound(ParticipantId::new("U1")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn product_lookup_is_bad_gateway() {
        let err = GameError::ProductLookup("catalog is empty".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }
}
