//! Round request and response DTOs.

use serde::{Deserialize, Serialize};

use super::PaginationMeta;
use crate::domain::{AnswerRejection, Price, RoundSummary};

/// Request body for submitting a guess.
#[derive(Debug, Clone, Deserialize)]
pub struct GuessRequest {
    /// Who is guessing.
    pub participant_id: String,
    /// Raw guess text, as typed in the chat.
    pub guess: String,
}

/// Result of a submitted guess.
#[derive(Debug, Clone, Serialize)]
pub struct GuessResponse {
    /// Whether the guess was recorded.
    pub accepted: bool,
    /// Recorded value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    /// Rejection reason code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<&'static str>,
    /// Human-readable rejection reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<Result<Price, AnswerRejection>> for GuessResponse {
    fn from(result: Result<Price, AnswerRejection>) -> Self {
        match result {
            Ok(price) => Self {
                accepted: true,
                price: Some(price),
                rejection: None,
                message: None,
            },
            Err(rejection) => Self {
                accepted: false,
                price: None,
                rejection: Some(rejection_code(&rejection)),
                message: Some(rejection.to_string()),
            },
        }
    }
}

fn rejection_code(rejection: &AnswerRejection) -> &'static str {
    match rejection {
        AnswerRejection::RoundFinished => "round_finished",
        AnswerRejection::AlreadyAnswered { .. } => "already_answered",
        AnswerRejection::ValueTaken(_) => "value_taken",
        AnswerRejection::Malformed(_) => "malformed",
    }
}

/// Paginated round list.
#[derive(Debug, Clone, Serialize)]
pub struct RoundListResponse {
    /// Round summaries for the requested page.
    pub data: Vec<RoundSummary>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}
