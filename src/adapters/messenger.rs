//! Outbound notices to chat channels and participants.

use std::fmt;

use crate::domain::{ChannelId, EventBus, Notice, ParticipantId, RoundEvent};

/// Fire-and-forget delivery of [`Notice`]s.
///
/// Implementations must not block: the game calls them while holding a
/// round's lock.
pub trait Messenger: Send + Sync + fmt::Debug {
    /// Sends a notice visible to the whole channel.
    fn notify(&self, channel_id: &ChannelId, notice: Notice);

    /// Sends a notice visible only to one participant of the channel.
    fn notify_participant(
        &self,
        channel_id: &ChannelId,
        participant_id: &ParticipantId,
        notice: Notice,
    );
}

/// [`Messenger`] that publishes every notice as a
/// [`RoundEvent::Notice`] on the [`EventBus`].
///
/// A chat bridge connected to the WebSocket endpoint relays these events
/// to the platform.
#[derive(Debug, Clone)]
pub struct BusMessenger {
    event_bus: EventBus,
}

impl BusMessenger {
    /// Creates a messenger publishing on the given bus.
    #[must_use]
    pub fn new(event_bus: EventBus) -> Self {
        Self { event_bus }
    }
}

impl Messenger for BusMessenger {
    fn notify(&self, channel_id: &ChannelId, notice: Notice) {
        tracing::debug!(%channel_id, kind = notice.kind(), "channel notice");
        let _ = self
            .event_bus
            .publish(RoundEvent::notice(channel_id.clone(), None, notice));
    }

    fn notify_participant(
        &self,
        channel_id: &ChannelId,
        participant_id: &ParticipantId,
        notice: Notice,
    ) {
        tracing::debug!(%channel_id, %participant_id, kind = notice.kind(), "participant notice");
        let _ = self.event_bus.publish(RoundEvent::notice(
            channel_id.clone(),
            Some(participant_id.clone()),
            notice,
        ));
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn channel_notice_has_no_recipient() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();
        let messenger = BusMessenger::new(bus);

        messenger.notify(&ChannelId::new("C1"), Notice::PriceTease);

        let Ok(RoundEvent::Notice {
            channel_id,
            participant_id,
            notice,
            ..
        }) = rx.recv().await
        else {
            panic!("expected notice event");
        };
        assert_eq!(channel_id.as_str(), "C1");
        assert!(participant_id.is_none());
        assert_eq!(notice, Notice::PriceTease);
    }

    #[tokio::test]
    async fn participant_notice_targets_recipient() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();
        let messenger = BusMessenger::new(bus);

        messenger.notify_participant(
            &ChannelId::new("C1"),
            &ParticipantId::new("U1"),
            Notice::MalformedGuess,
        );

        let Ok(RoundEvent::Notice { participant_id, .. }) = rx.recv().await else {
            panic!("expected notice event");
        };
        assert_eq!(participant_id, Some(ParticipantId::new("U1")));
    }
}
