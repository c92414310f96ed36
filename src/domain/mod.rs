//! Domain layer: round state machine, statistics, registry and events.
//!
//! This module contains the server-side domain model: chat identifiers,
//! prices and products, the [`Round`] lifecycle, the per-channel
//! [`RoundRegistry`], the [`StatsAggregator`], and the event bus used to
//! broadcast state changes and outbound notices.

pub mod channel_id;
pub mod event_bus;
pub mod notice;
pub mod price;
pub mod product;
pub mod round;
pub mod round_entry;
pub mod round_event;
pub mod round_registry;
pub mod stats;

pub use channel_id::{ChannelId, ParticipantId};
pub use event_bus::EventBus;
pub use notice::Notice;
pub use price::Price;
pub use product::{Product, Showcase};
pub use round::{AnswerRejection, Outcome, Phase, Round};
pub use round_entry::{RoundEntry, RoundSummary, ScheduledTimers};
pub use round_event::RoundEvent;
pub use round_registry::{RoundGuard, RoundRegistry, SharedRound};
pub use stats::{StatsAggregator, UserStat};
