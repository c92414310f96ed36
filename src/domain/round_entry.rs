//! Registry entry combining a [`Round`] with its scheduled timers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::AbortHandle;

use super::round::{Outcome, Phase};
use super::{ChannelId, ParticipantId, Price, Round};

/// Handles to the deadline and reminder tasks of one round.
///
/// The tasks only hold a weak reference to the entry; aborting them is
/// how a resolved round makes sure nothing fires against it later.
#[derive(Debug, Default)]
pub struct ScheduledTimers {
    deadline: Option<AbortHandle>,
    reminders: Vec<AbortHandle>,
}

impl ScheduledTimers {
    /// Registers the deadline task, aborting a previously registered one.
    pub fn set_deadline(&mut self, handle: AbortHandle) {
        if let Some(old) = self.deadline.replace(handle) {
            old.abort();
        }
    }

    /// Registers a reminder task.
    pub fn push_reminder(&mut self, handle: AbortHandle) {
        self.reminders.push(handle);
    }

    /// Forgets the deadline task without aborting it.
    ///
    /// Called by the deadline task itself before it resolves the round, so
    /// that [`ScheduledTimers::cancel_all`] does not cancel the task that
    /// is running the completion.
    pub fn disarm_deadline(&mut self) {
        self.deadline = None;
    }

    /// Aborts every pending task.
    pub fn cancel_all(&mut self) {
        if let Some(deadline) = self.deadline.take() {
            deadline.abort();
        }
        for reminder in self.reminders.drain(..) {
            reminder.abort();
        }
    }

    /// Number of tasks still registered.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.reminders.len() + usize::from(self.deadline.is_some())
    }
}

/// A round together with its timers, stored per channel in
/// [`super::RoundRegistry`].
#[derive(Debug)]
pub struct RoundEntry {
    /// The game state.
    pub round: Round,

    /// Pending deadline and reminder tasks.
    pub timers: ScheduledTimers,
}

impl RoundEntry {
    /// Wraps a round with no timers scheduled yet.
    #[must_use]
    pub fn new(round: Round) -> Self {
        Self {
            round,
            timers: ScheduledTimers::default(),
        }
    }

    /// Channel of the wrapped round.
    #[must_use]
    pub const fn channel_id(&self) -> &ChannelId {
        self.round.channel_id()
    }
}

/// Lightweight view of a round for list endpoints.
///
/// The product price is only revealed once the round is finished.
#[derive(Debug, Clone, Serialize)]
pub struct RoundSummary {
    /// Channel identifier.
    pub channel_id: ChannelId,
    /// Current phase.
    pub phase: Phase,
    /// Resolution outcome.
    pub outcome: Outcome,
    /// Product name.
    pub product_name: String,
    /// True price, present once finished.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_price: Option<Price>,
    /// Number of recorded answers.
    pub answer_count: usize,
    /// Winner, present iff the outcome is a winner.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<ParticipantId>,
    /// Start timestamp.
    pub started_at: DateTime<Utc>,
    /// Deadline timestamp.
    pub deadline: DateTime<Utc>,
}

impl From<&Round> for RoundSummary {
    fn from(round: &Round) -> Self {
        Self {
            channel_id: round.channel_id().clone(),
            phase: round.phase(),
            outcome: round.outcome(),
            product_name: round.product().name.clone(),
            product_price: (!round.is_active()).then_some(round.product().price),
            answer_count: round.answers().len(),
            winner: round.winner().cloned(),
            started_at: round.started_at(),
            deadline: round.deadline(),
        }
    }
}

impl From<&RoundEntry> for RoundSummary {
    fn from(entry: &RoundEntry) -> Self {
        Self::from(&entry.round)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::domain::Product;
    use rust_decimal_macros::dec;
    use std::time::Duration;

    fn make_round() -> Round {
        let Ok(price) = Price::new(dec!(42)) else {
            panic!("valid price");
        };
        Round::new(
            ChannelId::new("C9"),
            Product::new("Lamp", price),
            &GameConfig::for_tests(),
            Utc::now(),
        )
    }

    #[test]
    fn summary_hides_price_while_active() {
        let mut round = make_round();
        let active = RoundSummary::from(&round);
        assert!(active.product_price.is_none());
        assert_eq!(active.phase, Phase::Active);

        let _ = round.resolve(Utc::now());
        let finished = RoundSummary::from(&round);
        assert_eq!(finished.product_price.map(|p| p.to_string()), Some("42.00".to_string()));
        assert_eq!(finished.outcome, Outcome::InsufficientPlayers);
    }

    #[tokio::test]
    async fn cancel_all_aborts_tasks() {
        let mut timers = ScheduledTimers::default();
        let deadline = tokio::spawn(tokio::time::sleep(Duration::from_secs(3600)));
        let reminder = tokio::spawn(tokio::time::sleep(Duration::from_secs(3600)));
        timers.set_deadline(deadline.abort_handle());
        timers.push_reminder(reminder.abort_handle());
        assert_eq!(timers.pending(), 2);

        timers.cancel_all();
        assert_eq!(timers.pending(), 0);
        let Err(err) = deadline.await else {
            panic!("deadline task should be aborted");
        };
        assert!(err.is_cancelled());
        let Err(err) = reminder.await else {
            panic!("reminder task should be aborted");
        };
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn disarmed_deadline_survives_cancel() {
        let mut timers = ScheduledTimers::default();
        let deadline = tokio::spawn(async { 7 });
        timers.set_deadline(deadline.abort_handle());
        timers.disarm_deadline();
        timers.cancel_all();
        assert_eq!(deadline.await.ok(), Some(7));
    }
}
