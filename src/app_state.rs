//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::EventBus;
use crate::service::GameService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Game service for all business logic.
    pub game_service: Arc<GameService>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
    /// Token expected on chat event callbacks; `None` disables the check.
    pub verification_token: Option<Arc<str>>,
}
