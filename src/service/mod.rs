//! Service layer: round orchestration.
//!
//! [`GameService`] drives rounds through their lifecycle, schedules the
//! deadline and reminder timers, folds finished rounds into statistics,
//! and emits notices and events through the [`super::domain::EventBus`].

pub mod commands;
pub mod game_service;

pub use commands::MentionCommand;
pub use game_service::GameService;
