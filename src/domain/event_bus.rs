//! Fan-out of round events to WebSocket bridges.
//!
//! Round lifecycle changes and every outbound [`super::Notice`] travel as
//! [`RoundEvent`]s. A chat bridge attached to `/ws` is the only consumer
//! that turns notices into platform messages, so a bus with no receivers
//! simply discards them.

use tokio::sync::broadcast;

use super::RoundEvent;

/// Cloneable publishing handle over a `tokio::sync::broadcast` channel.
///
/// Capacity comes from `EVENT_BUS_CAPACITY` and is at least one. A
/// receiver that falls behind by more than the capacity loses the oldest
/// events and sees `RecvError::Lagged`; publishing never waits.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<RoundEvent>,
}

impl EventBus {
    /// Creates a bus buffering up to `capacity` events per receiver.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes an event and returns how many bridges will see it.
    pub fn publish(&self, event: RoundEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Attaches a bridge. It sees only events published afterwards.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<RoundEvent> {
        self.sender.subscribe()
    }

    /// Number of attached bridges, reported by `/health`.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{ChannelId, Notice, ParticipantId};

    fn tease(channel: &str) -> RoundEvent {
        RoundEvent::notice(ChannelId::new(channel), None, Notice::PriceTease)
    }

    #[test]
    fn notice_without_bridge_is_discarded() {
        let bus = EventBus::new(8);
        assert_eq!(bus.publish(tease("C1")), 0);
    }

    #[tokio::test]
    async fn late_bridge_misses_earlier_notices() {
        let bus = EventBus::new(8);
        bus.publish(tease("C1"));
        let mut rx = bus.subscribe();
        bus.publish(RoundEvent::notice(
            ChannelId::new("C2"),
            Some(ParticipantId::new("U1")),
            Notice::MalformedGuess,
        ));

        let Ok(event) = rx.recv().await else {
            panic!("expected the second notice");
        };
        assert_eq!(event.channel_id(), &ChannelId::new("C2"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn zero_capacity_is_clamped() {
        let bus = EventBus::new(0);
        let mut rx = bus.subscribe();
        assert_eq!(bus.publish(tease("C1")), 1);
        assert!(rx.recv().await.is_ok());
    }

    #[tokio::test]
    async fn lagging_bridge_skips_oldest() {
        let bus = EventBus::new(2);
        let mut rx = bus.subscribe();
        for channel in ["C1", "C2", "C3"] {
            bus.publish(tease(channel));
        }

        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(1))
        ));
        let Ok(event) = rx.recv().await else {
            panic!("expected event after lag");
        };
        assert_eq!(event.channel_id(), &ChannelId::new("C2"));
    }

    #[test]
    fn dropped_bridge_is_detached() {
        let bus = EventBus::new(8);
        let rx = bus.subscribe();
        assert_eq!(bus.receiver_count(), 1);
        drop(rx);
        assert_eq!(bus.receiver_count(), 0);
    }
}
