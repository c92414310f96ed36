//! Statistics response DTOs.

use serde::Serialize;

use crate::domain::{ParticipantId, UserStat};

/// A participant's lifetime statistics.
#[derive(Debug, Clone, Serialize)]
pub struct UserStatResponse {
    /// Participant identifier.
    pub participant_id: ParticipantId,
    /// Finished rounds played.
    pub games_played: u64,
    /// Rounds won.
    pub games_won: u64,
    /// Exact price matches.
    pub exact_price_matches: u64,
    /// Smallest distance to a true price, as a decimal string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_offset: Option<String>,
}

impl UserStatResponse {
    /// Builds the response for a participant.
    #[must_use]
    pub fn new(participant_id: ParticipantId, stat: &UserStat) -> Self {
        Self {
            participant_id,
            games_played: stat.games_played,
            games_won: stat.games_won,
            exact_price_matches: stat.exact_price_matches,
            minimum_offset: stat.minimum_offset.map(|offset| offset.to_string()),
        }
    }
}
