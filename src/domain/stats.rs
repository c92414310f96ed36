//! Per-participant lifetime statistics.
//!
//! [`StatsAggregator`] folds finished rounds into cumulative counters.
//! It is shared by every channel, so writes are serialized behind a
//! [`tokio::sync::RwLock`].

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::RwLock;

use super::{ParticipantId, Round};
use crate::error::GameError;

/// Cumulative counters for one participant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserStat {
    /// Finished rounds the participant answered in.
    pub games_played: u64,
    /// Rounds the participant won.
    pub games_won: u64,
    /// Answers that matched the product price exactly.
    pub exact_price_matches: u64,
    /// Smallest distance between any answer and the true price.
    pub minimum_offset: Option<Decimal>,
}

impl UserStat {
    fn record(&mut self, won: bool, exact: bool, offset: Decimal) {
        self.games_played = self.games_played.saturating_add(1);
        if won {
            self.games_won = self.games_won.saturating_add(1);
        }
        if exact {
            self.exact_price_matches = self.exact_price_matches.saturating_add(1);
        }
        self.minimum_offset = Some(match self.minimum_offset {
            Some(current) => current.min(offset),
            None => offset,
        });
    }
}

/// Shared store of [`UserStat`]s keyed by participant.
///
/// Entries are created lazily on a participant's first finished round and
/// never removed. The aggregator does not track which rounds it has seen:
/// folding the same round twice counts it twice.
#[derive(Debug, Default)]
pub struct StatsAggregator {
    stats: RwLock<HashMap<ParticipantId, UserStat>>,
}

impl StatsAggregator {
    /// Creates an empty aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds every answer of a finished round into the counters.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::RoundNotFinished`] if the round is still
    /// active; nothing is counted in that case.
    pub async fn add_game(&self, round: &Round) -> Result<(), GameError> {
        if round.is_active() {
            return Err(GameError::RoundNotFinished(round.channel_id().clone()));
        }

        let product_price = round.product().price;
        let winner = round.winner();

        let mut stats = self.stats.write().await;
        for (participant, price) in round.answers() {
            stats.entry(participant.clone()).or_default().record(
                winner == Some(participant),
                *price == product_price,
                price.distance(&product_price),
            );
        }
        Ok(())
    }

    /// Returns the counters for a participant, or `None` if they have
    /// never answered in a finished round.
    pub async fn get_user_stat(&self, participant: &ParticipantId) -> Option<UserStat> {
        self.stats.read().await.get(participant).cloned()
    }

    /// Returns the number of participants with statistics.
    pub async fn len(&self) -> usize {
        self.stats.read().await.len()
    }

    /// Returns `true` if no participant has statistics yet.
    pub async fn is_empty(&self) -> bool {
        self.stats.read().await.is_empty()
    }
}
