//! Per-connection subscription manager.
//!
//! Tracks which channels a WebSocket client follows and provides
//! server-side event filtering.

use std::collections::HashSet;

use crate::domain::ChannelId;

/// Wildcard entry that subscribes to every channel.
pub const WILDCARD: &str = "*";

/// Channel subscriptions of a single WebSocket connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Followed channels. Ignored while `subscribe_all` is set.
    channel_ids: HashSet<ChannelId>,
    subscribe_all: bool,
}

impl SubscriptionManager {
    /// Creates an empty subscription set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds channels to the set. [`WILDCARD`] follows every channel.
    /// Returns the channels that were named explicitly.
    pub fn subscribe(&mut self, raw_ids: &[String]) -> Vec<ChannelId> {
        let mut added = Vec::new();
        for raw in raw_ids {
            let raw = raw.trim();
            if raw == WILDCARD {
                self.subscribe_all = true;
            } else if !raw.is_empty() {
                let id = ChannelId::new(raw);
                self.channel_ids.insert(id.clone());
                added.push(id);
            }
        }
        added
    }

    /// Removes channels from the set. [`WILDCARD`] clears the wildcard.
    pub fn unsubscribe(&mut self, raw_ids: &[String]) -> Vec<ChannelId> {
        let mut removed = Vec::new();
        for raw in raw_ids {
            let raw = raw.trim();
            if raw == WILDCARD {
                self.subscribe_all = false;
            } else {
                let id = ChannelId::new(raw);
                if self.channel_ids.remove(&id) {
                    removed.push(id);
                }
            }
        }
        removed
    }

    /// Returns `true` if events of `channel_id` should be forwarded.
    #[must_use]
    pub fn matches(&self, channel_id: &ChannelId) -> bool {
        self.subscribe_all || self.channel_ids.contains(channel_id)
    }

    /// Number of explicitly followed channels.
    #[must_use]
    pub fn count(&self) -> usize {
        self.channel_ids.len()
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn empty_matches_nothing() {
        let mgr = SubscriptionManager::new();
        assert!(!mgr.matches(&ChannelId::new("C1")));
    }

    #[test]
    fn subscribe_specific_channel() {
        let mut mgr = SubscriptionManager::new();
        let added = mgr.subscribe(&ids(&["C1", " "]));
        assert_eq!(added, vec![ChannelId::new("C1")]);
        assert!(mgr.matches(&ChannelId::new("C1")));
        assert!(!mgr.matches(&ChannelId::new("C2")));
    }

    #[test]
    fn wildcard_matches_everything_until_removed() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&ids(&["*"]));
        assert!(mgr.is_subscribed_all());
        assert!(mgr.matches(&ChannelId::new("anything")));
        mgr.unsubscribe(&ids(&["*"]));
        assert!(!mgr.matches(&ChannelId::new("anything")));
    }

    #[test]
    fn unsubscribe_reports_only_known_channels() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&ids(&["C1", "C2"]));
        assert_eq!(mgr.count(), 2);
        let removed = mgr.unsubscribe(&ids(&["C1", "C9"]));
        assert_eq!(removed, vec![ChannelId::new("C1")]);
        assert_eq!(mgr.count(), 1);
        assert!(!mgr.matches(&ChannelId::new("C1")));
    }
}
