//! WebSocket message types: envelope and commands.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level WebSocket message envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsMessage {
    /// Client-provided ID for requests; server-generated for events.
    #[serde(default)]
    pub id: String,
    /// Message type discriminator.
    #[serde(rename = "type")]
    pub msg_type: WsMessageType,
    /// ISO-8601 timestamp.
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    /// Variant-specific payload.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl WsMessage {
    /// Builds a server message stamped with the current time.
    #[must_use]
    pub fn new(id: impl Into<String>, msg_type: WsMessageType, payload: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            msg_type,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Builds an error reply.
    #[must_use]
    pub fn error(id: impl Into<String>, code: u16, message: impl Into<String>) -> Self {
        Self::new(
            id,
            WsMessageType::Error,
            serde_json::json!({ "code": code, "message": message.into() }),
        )
    }
}

/// Discriminator for WebSocket message types.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WsMessageType {
    /// Client → Server command.
    Command,
    /// Server → Client response to a command.
    Response,
    /// Server → Client broadcast event.
    Event,
    /// Server → Client error.
    Error,
}

/// Commands a client can send in the payload of a
/// [`WsMessageType::Command`] message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum WsCommand {
    /// Follow events of the given channels. `["*"]` follows all.
    Subscribe {
        /// Channel ids.
        channel_ids: Vec<String>,
    },
    /// Stop following the given channels.
    Unsubscribe {
        /// Channel ids.
        channel_ids: Vec<String>,
    },
    /// Submit a guess on behalf of a participant.
    Guess {
        /// Channel of the round.
        channel_id: String,
        /// Author of the guess.
        participant_id: String,
        /// Raw message text.
        guess: String,
    },
    /// Fetch a channel's round summary.
    GetRound {
        /// Channel of the round.
        channel_id: String,
    },
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn parses_guess_command() {
        let raw = serde_json::json!({
            "command": "guess",
            "channel_id": "C1",
            "participant_id": "U1",
            "guess": "12,5"
        });
        let Ok(cmd) = serde_json::from_value::<WsCommand>(raw) else {
            panic!("valid command");
        };
        assert_eq!(
            cmd,
            WsCommand::Guess {
                channel_id: "C1".to_string(),
                participant_id: "U1".to_string(),
                guess: "12,5".to_string(),
            }
        );
    }

    #[test]
    fn envelope_defaults_missing_fields() {
        let Ok(msg) = serde_json::from_str::<WsMessage>(r#"{"type":"command"}"#) else {
            panic!("valid envelope");
        };
        assert_eq!(msg.msg_type, WsMessageType::Command);
        assert!(msg.id.is_empty());
        assert!(msg.payload.is_null());
    }

    #[test]
    fn error_reply_shape() {
        let msg = WsMessage::error("7", 404, "unknown command");
        let Ok(value) = serde_json::to_value(&msg) else {
            panic!("serializable");
        };
        assert_eq!(value["type"], "error");
        assert_eq!(value["payload"]["code"], 404);
    }
}
