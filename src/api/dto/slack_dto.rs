//! Chat platform event callback payloads.

use serde::{Deserialize, Serialize};

/// Top-level body POSTed by the chat platform to the events endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventEnvelope {
    /// Endpoint ownership check; the challenge must be echoed back.
    UrlVerification {
        /// Value to echo.
        challenge: String,
        /// Verification token.
        #[serde(default)]
        token: Option<String>,
    },
    /// A subscribed event happened.
    EventCallback {
        /// Verification token.
        #[serde(default)]
        token: Option<String>,
        /// The event itself.
        event: ChatEvent,
    },
    /// Any envelope type the bot does not handle.
    #[serde(other)]
    Unsupported,
}

/// Inner event of an [`EventEnvelope::EventCallback`].
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// A message posted in a channel.
    Message {
        /// Author; absent for some system messages.
        #[serde(default)]
        user: Option<String>,
        /// Channel the message was posted in.
        channel: String,
        /// Message text.
        #[serde(default)]
        text: Option<String>,
        /// Present when a bot posted the message.
        #[serde(default)]
        bot_id: Option<String>,
        /// Present for edits, joins and other non-plain messages.
        #[serde(default)]
        subtype: Option<String>,
    },
    /// A message mentioning the bot.
    AppMention {
        /// Author.
        user: String,
        /// Channel the mention was posted in.
        channel: String,
        /// Message text, including the mention.
        text: String,
    },
    /// Any event type the bot does not handle.
    #[serde(other)]
    Other,
}

impl ChatEvent {
    /// Returns the `(channel, user, text)` of a plain participant message,
    /// or `None` for bot messages, subtyped messages and messages that
    /// mention someone (those arrive again as [`ChatEvent::AppMention`]).
    #[must_use]
    pub fn as_guess(&self) -> Option<(&str, &str, &str)> {
        match self {
            Self::Message {
                user: Some(user),
                channel,
                text: Some(text),
                bot_id: None,
                subtype: None,
            } if !text.contains("<@") => Some((channel.as_str(), user.as_str(), text.as_str())),
            _ => None,
        }
    }
}

/// Response to [`EventEnvelope::UrlVerification`].
#[derive(Debug, Clone, Serialize)]
pub struct ChallengeResponse {
    /// Echoed challenge.
    pub challenge: String,
}
