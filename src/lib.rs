//! # price-guess-bot
//!
//! Chat bot that runs timer-bounded price guessing rounds, one per
//! channel.
//!
//! A round presents a product, collects at most one numeric guess per
//! participant, rejects guesses that repeat a value already claimed, and
//! when its deadline passes declares the closest guess that does not
//! exceed the real price the winner. Finished rounds feed per-participant
//! statistics.
//!
//! ## Architecture
//!
//! ```text
//! Chat platform (event callbacks)   HTTP clients   WebSocket bridges
//!     │                                  │                │
//!     ├── /slack/events (api/)     ├── /api/v1 (api/)     ├── /ws (ws/)
//!     │
//!     ├── GameService (service/)  ── timers (deadline + reminders)
//!     │       │
//!     │       ├── RoundRegistry ── Round (domain/)
//!     │       ├── StatsAggregator (domain/)
//!     │       ├── ProductSource, Messenger (adapters/)
//!     │       └── EventBus (domain/)
//! ```

pub mod adapters;
pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod ws;
