//! Per-channel round storage with per-round locking.
//!
//! [`RoundRegistry`] maps each channel to its current [`RoundEntry`],
//! each individually protected by a [`tokio::sync::Mutex`]. Guesses and
//! the deadline resolution of one round serialize on that mutex, while
//! rounds in different channels proceed independently.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use super::ChannelId;
use super::round_entry::{RoundEntry, RoundSummary};
use crate::error::GameError;

/// Shared handle to one channel's round.
pub type SharedRound = Arc<Mutex<RoundEntry>>;

/// Exclusive access to a round, independent of the registry's lifetime.
pub type RoundGuard = OwnedMutexGuard<RoundEntry>;

/// Central store of the current round of every channel.
///
/// A finished round stays in the registry until the next round for the
/// same channel supersedes it, so late messages can still be answered
/// with a "round is over" notice.
///
/// # Concurrency
///
/// - The outer map is behind a `RwLock`; lookups run concurrently.
/// - Each round is behind its own `Mutex`; mutations of one round are
///   serialized, different rounds are concurrent.
/// - The map lock is never requested while holding a round lock.
#[derive(Debug, Default)]
pub struct RoundRegistry {
    rounds: RwLock<HashMap<ChannelId, SharedRound>>,
}

impl RoundRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a new round for its channel, replacing a finished one.
    ///
    /// The round is locked before it becomes visible and the guard is
    /// returned, so the caller finishes setting it up before any guess or
    /// resolution can reach it.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::RoundInProgress`] if the channel already has an
    /// active round; the registry is left unchanged.
    pub async fn start(
        &self,
        entry: RoundEntry,
    ) -> Result<(SharedRound, RoundGuard), GameError> {
        let channel_id = entry.channel_id().clone();
        let mut map = self.rounds.write().await;
        if let Some(existing) = map.get(&channel_id)
            && existing.lock().await.round.is_active()
        {
            return Err(GameError::RoundInProgress(channel_id));
        }
        let shared = Arc::new(Mutex::new(entry));
        let guard = Arc::clone(&shared).lock_owned().await;
        map.insert(channel_id, Arc::clone(&shared));
        Ok((shared, guard))
    }

    /// Returns the channel's current round behind its lock.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::RoundNotFound`] if no round was ever started in
    /// the channel.
    pub async fn get(&self, channel_id: &ChannelId) -> Result<SharedRound, GameError> {
        let map = self.rounds.read().await;
        map.get(channel_id)
            .cloned()
            .ok_or_else(|| GameError::RoundNotFound(channel_id.clone()))
    }

    /// Returns `true` if the channel has a round still collecting answers.
    pub async fn is_active(&self, channel_id: &ChannelId) -> bool {
        let Ok(shared) = self.get(channel_id).await else {
            return false;
        };
        let entry = shared.lock().await;
        entry.round.is_active()
    }

    /// Removes the channel's round from the registry, returning it.
    ///
    /// Timers already scheduled for the round keep only a weak reference,
    /// so they stop mattering once every other handle is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::RoundNotFound`] if the channel has no round.
    pub async fn remove(&self, channel_id: &ChannelId) -> Result<SharedRound, GameError> {
        let mut map = self.rounds.write().await;
        map.remove(channel_id)
            .ok_or_else(|| GameError::RoundNotFound(channel_id.clone()))
    }

    /// Returns summaries of all rounds, sorted by channel.
    pub async fn list(&self) -> Vec<RoundSummary> {
        let map = self.rounds.read().await;
        let mut summaries = Vec::with_capacity(map.len());
        for entry_lock in map.values() {
            let entry = entry_lock.lock().await;
            summaries.push(RoundSummary::from(&*entry));
        }
        summaries.sort_by(|a, b| a.channel_id.cmp(&b.channel_id));
        summaries
    }

    /// Returns the number of channels with a round.
    pub async fn len(&self) -> usize {
        self.rounds.read().await.len()
    }

    /// Returns `true` if the registry contains no rounds.
    pub async fn is_empty(&self) -> bool {
        self.rounds.read().await.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::domain::{Price, Product, Round};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn make_entry(channel: &str) -> RoundEntry {
        let Ok(price) = Price::new(dec!(15)) else {
            panic!("valid price");
        };
        RoundEntry::new(Round::new(
            ChannelId::new(channel),
            Product::new("Umbrella", price),
            &GameConfig::for_tests(),
            Utc::now(),
        ))
    }

    #[tokio::test]
    async fn start_and_get() {
        let registry = RoundRegistry::new();
        let Ok((_, guard)) = registry.start(make_entry("C1")).await else {
            panic!("start failed");
        };
        drop(guard);

        let fetched = registry.get(&ChannelId::new("C1")).await;
        assert!(fetched.is_ok());
        assert!(registry.is_active(&ChannelId::new("C1")).await);
    }

    #[tokio::test]
    async fn new_round_is_locked_until_setup_finishes() {
        let registry = RoundRegistry::new();
        let Ok((shared, guard)) = registry.start(make_entry("C1")).await else {
            panic!("start failed");
        };
        let Ok(visible) = registry.get(&ChannelId::new("C1")).await else {
            panic!("round should be registered");
        };
        assert!(Arc::ptr_eq(&shared, &visible));
        assert!(visible.try_lock().is_err());

        drop(guard);
        assert!(visible.try_lock().is_ok());
    }

    #[tokio::test]
    async fn get_nonexistent_returns_error() {
        let registry = RoundRegistry::new();
        let result = registry.get(&ChannelId::new("nowhere")).await;
        assert!(matches!(result, Err(GameError::RoundNotFound(_))));
        assert!(!registry.is_active(&ChannelId::new("nowhere")).await);
    }

    #[tokio::test]
    async fn start_fails_while_active() {
        let registry = RoundRegistry::new();
        let _ = registry.start(make_entry("C1")).await;
        let second = registry.start(make_entry("C1")).await;
        assert!(matches!(second, Err(GameError::RoundInProgress(_))));
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn start_supersedes_finished_round() {
        let registry = RoundRegistry::new();
        let Ok((first, mut guard)) = registry.start(make_entry("C1")).await else {
            panic!("first start failed");
        };
        let _ = guard.round.resolve(Utc::now());
        drop(guard);

        let Ok((second, _)) = registry.start(make_entry("C1")).await else {
            panic!("second start failed");
        };
        assert!(!Arc::ptr_eq(&first, &second));
        let Ok(current) = registry.get(&ChannelId::new("C1")).await else {
            panic!("round missing");
        };
        assert!(Arc::ptr_eq(&current, &second));
    }

    #[tokio::test]
    async fn channels_are_independent() {
        let registry = RoundRegistry::new();
        assert!(registry.start(make_entry("C1")).await.is_ok());
        assert!(registry.start(make_entry("C2")).await.is_ok());
        assert_eq!(registry.len().await, 2);
    }

    #[tokio::test]
    async fn remove_returns_round() {
        let registry = RoundRegistry::new();
        let _ = registry.start(make_entry("C1")).await;
        let removed = registry.remove(&ChannelId::new("C1")).await;
        assert!(removed.is_ok());

        let result = registry.get(&ChannelId::new("C1")).await;
        assert!(result.is_err());
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn remove_nonexistent_returns_error() {
        let registry = RoundRegistry::new();
        let result = registry.remove(&ChannelId::new("C1")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn list_is_sorted_by_channel() {
        let registry = RoundRegistry::new();
        let _ = registry.start(make_entry("C2")).await;
        let _ = registry.start(make_entry("C1")).await;

        let list = registry.list().await;
        let channels: Vec<_> = list.iter().map(|s| s.channel_id.as_str()).collect();
        assert_eq!(channels, vec!["C1", "C2"]);
    }
}
