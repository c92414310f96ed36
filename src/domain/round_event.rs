//! Domain events reflecting round state changes.
//!
//! Every state change emits a [`RoundEvent`] through the
//! [`super::EventBus`]. Events are broadcast to WebSocket subscribers,
//! which is also how outbound [`Notice`]s reach the chat bridge.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::round::Outcome;
use super::{ChannelId, Notice, ParticipantId, Price};

/// Domain event emitted after every round mutation or outbound notice.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum RoundEvent {
    /// A new round started in a channel.
    RoundStarted {
        /// Channel identifier.
        channel_id: ChannelId,
        /// Name of the product to guess.
        product_name: String,
        /// When the round resolves.
        deadline: DateTime<Utc>,
        /// Start timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A guess passed admission.
    AnswerAccepted {
        /// Channel identifier.
        channel_id: ChannelId,
        /// Who answered.
        participant_id: ParticipantId,
        /// Recorded value.
        price: Price,
        /// Admission timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A round was resolved.
    RoundFinished {
        /// Channel identifier.
        channel_id: ChannelId,
        /// How the round ended.
        outcome: Outcome,
        /// Winner, present iff the outcome is a winner.
        #[serde(skip_serializing_if = "Option::is_none")]
        winner: Option<ParticipantId>,
        /// Revealed product price.
        product_price: Price,
        /// Number of recorded answers.
        answer_count: usize,
        /// Resolution timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Outbound notice for a channel, or for one participant in it.
    Notice {
        /// Channel identifier.
        channel_id: ChannelId,
        /// Recipient when the notice is ephemeral.
        #[serde(skip_serializing_if = "Option::is_none")]
        participant_id: Option<ParticipantId>,
        /// Rendered chat text.
        text: String,
        /// Structured payload.
        notice: Notice,
        /// Emission timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl RoundEvent {
    /// Builds a [`RoundEvent::Notice`], rendering the text.
    #[must_use]
    pub fn notice(
        channel_id: ChannelId,
        participant_id: Option<ParticipantId>,
        notice: Notice,
    ) -> Self {
        Self::Notice {
            channel_id,
            participant_id,
            text: notice.to_string(),
            notice,
            timestamp: Utc::now(),
        }
    }

    /// Returns the channel ID associated with this event.
    #[must_use]
    pub fn channel_id(&self) -> &ChannelId {
        match self {
            Self::RoundStarted { channel_id, .. }
            | Self::AnswerAccepted { channel_id, .. }
            | Self::RoundFinished { channel_id, .. }
            | Self::Notice { channel_id, .. } => channel_id,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::RoundStarted { .. } => "round_started",
            Self::AnswerAccepted { .. } => "answer_accepted",
            Self::RoundFinished { .. } => "round_finished",
            Self::Notice { .. } => "notice",
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn round_started_event_type() {
        let event = RoundEvent::RoundStarted {
            channel_id: ChannelId::new("C1"),
            product_name: "Blender".to_string(),
            deadline: Utc::now(),
            timestamp: Utc::now(),
        };
        assert_eq!(event.event_type_str(), "round_started");
        assert_eq!(event.channel_id().as_str(), "C1");
    }

    #[test]
    fn notice_event_serializes_text_and_payload() {
        let event = RoundEvent::notice(
            ChannelId::new("C1"),
            Some(ParticipantId::new("U1")),
            Notice::MalformedGuess,
        );
        let json = serde_json::to_string(&event).unwrap_or_default();
        assert!(json.contains("\"event_type\":\"notice\""));
        assert!(json.contains("\"kind\":\"malformed_guess\""));
        assert!(json.contains("\"participant_id\":\"U1\""));
        assert!(json.contains("not a valid guess"));
    }

    #[test]
    fn finished_event_skips_missing_winner() {
        let Ok(price) = Price::new(dec!(12)) else {
            panic!("valid price");
        };
        let event = RoundEvent::RoundFinished {
            channel_id: ChannelId::new("C2"),
            outcome: Outcome::Draw,
            winner: None,
            product_price: price,
            answer_count: 2,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap_or_default();
        assert!(json.contains("\"outcome\":\"draw\""));
        assert!(!json.contains("winner"));
    }
}
