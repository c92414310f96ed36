//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` streams round events (including every
//! outbound chat notice) to subscribed clients, and accepts guesses and
//! round queries from chat bridges.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
