//! Round lifecycle state machine.
//!
//! A [`Round`] is one instance of the guessing game scoped to a channel.
//! It moves through exactly one transition:
//!
//! ```text
//! Active --submit_answer--> Active      (self-loop, records answers)
//! Active --resolve--------> Finished    (terminal)
//! ```
//!
//! The type is pure state: it never sleeps, spawns or sends. Timers and
//! notices live in [`crate::service::GameService`], which calls
//! [`Round::resolve`] when the deadline elapses.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::price::PriceError;
use super::{ChannelId, ParticipantId, Price, Product};
use crate::config::GameConfig;

/// Minimum number of answers for a round to produce a winner or a draw.
pub const MIN_PLAYERS: usize = 2;

/// Lifecycle phase of a round. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Collecting answers.
    Active,
    /// Resolved; answers and outcome are frozen.
    Finished,
}

/// How a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The round is still active.
    Unresolved,
    /// One participant guessed closest without going over.
    Winner,
    /// Enough participants answered but every guess was over the price.
    Draw,
    /// Fewer than [`MIN_PLAYERS`] participants answered.
    InsufficientPlayers,
}

impl Outcome {
    /// Returns the outcome as a static string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unresolved => "unresolved",
            Self::Winner => "winner",
            Self::Draw => "draw",
            Self::InsufficientPlayers => "insufficient_players",
        }
    }
}

/// Why a guess was not recorded. None of these change the round.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnswerRejection {
    /// The round has already been resolved.
    #[error("the round is already over")]
    RoundFinished,

    /// The participant already has an answer in this round.
    #[error("participant already answered {previous}")]
    AlreadyAnswered {
        /// The answer kept for the participant.
        previous: Price,
    },

    /// Another participant already holds this exact value.
    #[error("value {0} was already taken by another participant")]
    ValueTaken(Price),

    /// The text is not a positive decimal number.
    #[error("malformed guess: {0}")]
    Malformed(#[from] PriceError),
}

/// One game instance: product, answers and resolution.
#[derive(Debug, Clone)]
pub struct Round {
    channel_id: ChannelId,
    product: Product,
    phase: Phase,
    outcome: Outcome,
    answers: BTreeMap<ParticipantId, Price>,
    winner: Option<ParticipantId>,
    started_at: DateTime<Utc>,
    deadline: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
}

impl Round {
    /// Creates an active round whose deadline is `started_at` plus the
    /// configured round duration.
    #[must_use]
    pub fn new(
        channel_id: ChannelId,
        product: Product,
        config: &GameConfig,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            channel_id,
            product,
            phase: Phase::Active,
            outcome: Outcome::Unresolved,
            answers: BTreeMap::new(),
            winner: None,
            started_at,
            deadline: started_at + config.round_duration_delta(),
            finished_at: None,
        }
    }

    /// Channel the round belongs to.
    #[must_use]
    pub const fn channel_id(&self) -> &ChannelId {
        &self.channel_id
    }

    /// Product being guessed.
    #[must_use]
    pub const fn product(&self) -> &Product {
        &self.product
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// `true` while the round accepts answers.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    /// Resolution outcome; [`Outcome::Unresolved`] while active.
    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Recorded answers, ordered by participant id.
    #[must_use]
    pub const fn answers(&self) -> &BTreeMap<ParticipantId, Price> {
        &self.answers
    }

    /// The winner, present iff the outcome is [`Outcome::Winner`].
    #[must_use]
    pub const fn winner(&self) -> Option<&ParticipantId> {
        self.winner.as_ref()
    }

    /// When the round started.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// When the round resolves if nothing resolves it earlier.
    #[must_use]
    pub const fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    /// When the round was resolved.
    #[must_use]
    pub const fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Time left until the deadline, zero once it has passed.
    #[must_use]
    pub fn time_remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.deadline - now).to_std().unwrap_or(Duration::ZERO)
    }

    /// Handles a raw chat message as a guess.
    ///
    /// The finished check comes first so that any late message, numeric
    /// or not, is told the round is over. Only text that parses as a
    /// positive decimal reaches [`Round::submit_answer`].
    ///
    /// # Errors
    ///
    /// Returns the [`AnswerRejection`] explaining why nothing was recorded.
    pub fn submit_guess(
        &mut self,
        participant: &ParticipantId,
        text: &str,
    ) -> Result<Price, AnswerRejection> {
        if !self.is_active() {
            return Err(AnswerRejection::RoundFinished);
        }
        let price = Price::parse_guess(text)?;
        self.submit_answer(participant, price)
    }

    /// Applies the admission rules and records the answer.
    ///
    /// Rules, in order: the round must be active, the participant must not
    /// have answered yet, and no other participant may hold the same value.
    ///
    /// # Errors
    ///
    /// Returns the first [`AnswerRejection`] that applies.
    pub fn submit_answer(
        &mut self,
        participant: &ParticipantId,
        price: Price,
    ) -> Result<Price, AnswerRejection> {
        if !self.is_active() {
            return Err(AnswerRejection::RoundFinished);
        }
        if let Some(previous) = self.answers.get(participant) {
            return Err(AnswerRejection::AlreadyAnswered {
                previous: *previous,
            });
        }
        if self.answers.values().any(|taken| *taken == price) {
            return Err(AnswerRejection::ValueTaken(price));
        }
        self.answers.insert(participant.clone(), price);
        Ok(price)
    }

    /// Answers that do not exceed the product price.
    pub fn eligible_answers(&self) -> impl Iterator<Item = (&ParticipantId, &Price)> {
        let limit = self.product.price;
        self.answers.iter().filter(move |(_, price)| **price <= limit)
    }

    /// The highest eligible answer, if any.
    ///
    /// Admission rejects duplicate values, so the maximum is unique.
    #[must_use]
    pub fn best_eligible(&self) -> Option<(&ParticipantId, Price)> {
        self.eligible_answers()
            .max_by_key(|(_, price)| **price)
            .map(|(participant, price)| (participant, *price))
    }

    /// Performs the terminal transition.
    ///
    /// Returns the outcome on the first call and `None` on every later
    /// call, which leaves the round untouched.
    pub fn resolve(&mut self, now: DateTime<Utc>) -> Option<Outcome> {
        if !self.is_active() {
            return None;
        }
        self.phase = Phase::Finished;
        self.finished_at = Some(now);

        if self.answers.len() < MIN_PLAYERS {
            self.outcome = Outcome::InsufficientPlayers;
            return Some(self.outcome);
        }

        let winner = self.best_eligible().map(|(participant, _)| participant.clone());
        self.outcome = match winner {
            Some(participant) => {
                self.winner = Some(participant);
                Outcome::Winner
            }
            None => Outcome::Draw,
        };
        Some(self.outcome)
    }
}
