//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! dispatching incoming commands and forwarding filtered events.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{WsCommand, WsMessage, WsMessageType};
use super::subscription::SubscriptionManager;
use crate::api::dto::GuessResponse;
use crate::domain::{ChannelId, ParticipantId, RoundEvent};
use crate::service::GameService;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads commands from the client and dispatches them.
/// - Forwards events of subscribed channels to the client.
pub async fn run_connection(
    socket: WebSocket,
    mut event_rx: broadcast::Receiver<RoundEvent>,
    game_service: Arc<GameService>,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subs = SubscriptionManager::new();

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply = handle_text_message(&text, &mut subs, &game_service).await;
                        if let Some(json) = reply
                            && ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            event = event_rx.recv() => {
                match event {
                    Ok(round_event) => {
                        if let Some(json) = render_event(&round_event, &subs)
                            && ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("ws connection closed");
}

/// Serializes an event for the client if its channel is subscribed.
fn render_event(event: &RoundEvent, subs: &SubscriptionManager) -> Option<String> {
    if !subs.matches(event.channel_id()) {
        return None;
    }
    let payload = serde_json::to_value(event).ok()?;
    let msg = WsMessage::new(uuid::Uuid::new_v4().to_string(), WsMessageType::Event, payload);
    serde_json::to_string(&msg).ok()
}

/// Handles a text message from the client, returning an optional JSON reply.
async fn handle_text_message(
    text: &str,
    subs: &mut SubscriptionManager,
    game_service: &GameService,
) -> Option<String> {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        return serde_json::to_string(&WsMessage::error("", 400, "malformed JSON")).ok();
    };
    if msg.msg_type != WsMessageType::Command {
        return serde_json::to_string(&WsMessage::error(msg.id, 400, "expected a command")).ok();
    }
    let Ok(command) = serde_json::from_value::<WsCommand>(msg.payload) else {
        return serde_json::to_string(&WsMessage::error(msg.id, 404, "unknown command")).ok();
    };

    let reply = match command {
        WsCommand::Subscribe { channel_ids } => {
            let added = subs.subscribe(&channel_ids);
            WsMessage::new(
                msg.id,
                WsMessageType::Response,
                serde_json::json!({
                    "subscribed": added,
                    "count": subs.count(),
                    "wildcard": subs.is_subscribed_all(),
                }),
            )
        }
        WsCommand::Unsubscribe { channel_ids } => {
            let removed = subs.unsubscribe(&channel_ids);
            WsMessage::new(
                msg.id,
                WsMessageType::Response,
                serde_json::json!({
                    "unsubscribed": removed,
                    "remaining_count": subs.count(),
                    "wildcard": subs.is_subscribed_all(),
                }),
            )
        }
        WsCommand::Guess {
            channel_id,
            participant_id,
            guess,
        } => {
            let result = game_service
                .submit_guess(
                    &ChannelId::from(channel_id),
                    &ParticipantId::from(participant_id),
                    &guess,
                )
                .await;
            match result {
                Ok(outcome) => WsMessage::new(
                    msg.id,
                    WsMessageType::Response,
                    serde_json::to_value(GuessResponse::from(outcome)).unwrap_or_default(),
                ),
                Err(e) => WsMessage::error(msg.id, e.status_code().as_u16(), e.to_string()),
            }
        }
        WsCommand::GetRound { channel_id } => {
            match game_service
                .round_summary(&ChannelId::from(channel_id))
                .await
            {
                Ok(summary) => WsMessage::new(
                    msg.id,
                    WsMessageType::Response,
                    serde_json::to_value(summary).unwrap_or_default(),
                ),
                Err(e) => WsMessage::error(msg.id, e.status_code().as_u16(), e.to_string()),
            }
        }
    };
    serde_json::to_string(&reply).ok()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::adapters::{BusMessenger, CatalogProductSource};
    use crate::config::GameConfig;
    use crate::domain::{EventBus, Notice, Price, Product, RoundRegistry, StatsAggregator};

    fn make_service() -> Arc<GameService> {
        let Ok(price) = Price::new(dec!(10)) else {
            panic!("valid price");
        };
        let bus = EventBus::new(64);
        Arc::new(GameService::new(
            Arc::new(RoundRegistry::new()),
            Arc::new(StatsAggregator::new()),
            Arc::new(CatalogProductSource::new(vec![Product::new("Lamp", price)])),
            Arc::new(BusMessenger::new(bus.clone())),
            bus,
            GameConfig::for_tests(),
        ))
    }

    async fn reply_json(
        text: &str,
        subs: &mut SubscriptionManager,
        service: &GameService,
    ) -> serde_json::Value {
        let Some(reply) = handle_text_message(text, subs, service).await else {
            panic!("expected a reply");
        };
        let Ok(value) = serde_json::from_str(&reply) else {
            panic!("reply is JSON");
        };
        value
    }

    #[tokio::test]
    async fn malformed_json_is_rejected() {
        let service = make_service();
        let mut subs = SubscriptionManager::new();
        let value = reply_json("not json", &mut subs, &service).await;
        assert_eq!(value["type"], "error");
        assert_eq!(value["payload"]["code"], 400);
    }

    #[tokio::test]
    async fn subscribe_then_unsubscribe() {
        let service = make_service();
        let mut subs = SubscriptionManager::new();
        let value = reply_json(
            r#"{"id":"1","type":"command","payload":{"command":"subscribe","channel_ids":["C1","C2"]}}"#,
            &mut subs,
            &service,
        )
        .await;
        assert_eq!(value["id"], "1");
        assert_eq!(value["payload"]["count"], 2);
        assert!(subs.matches(&ChannelId::new("C1")));

        let value = reply_json(
            r#"{"id":"2","type":"command","payload":{"command":"unsubscribe","channel_ids":["C1"]}}"#,
            &mut subs,
            &service,
        )
        .await;
        assert_eq!(value["payload"]["remaining_count"], 1);
        assert!(!subs.matches(&ChannelId::new("C1")));
    }

    #[tokio::test]
    async fn unknown_command_is_not_found() {
        let service = make_service();
        let mut subs = SubscriptionManager::new();
        let value = reply_json(
            r#"{"id":"3","type":"command","payload":{"command":"swap"}}"#,
            &mut subs,
            &service,
        )
        .await;
        assert_eq!(value["payload"]["code"], 404);
    }

    #[tokio::test(start_paused = true)]
    async fn guess_over_websocket() {
        let service = make_service();
        let mut subs = SubscriptionManager::new();

        let missing = reply_json(
            r#"{"id":"4","type":"command","payload":{"command":"guess","channel_id":"C1","participant_id":"U1","guess":"9"}}"#,
            &mut subs,
            &service,
        )
        .await;
        assert_eq!(missing["payload"]["code"], 404);

        let Ok(_) = service.start_round(&ChannelId::new("C1")).await else {
            panic!("round should start");
        };
        let accepted = reply_json(
            r#"{"id":"5","type":"command","payload":{"command":"guess","channel_id":"C1","participant_id":"U1","guess":"9"}}"#,
            &mut subs,
            &service,
        )
        .await;
        assert_eq!(accepted["type"], "response");
        assert_eq!(accepted["payload"]["accepted"], true);

        let round = reply_json(
            r#"{"id":"6","type":"command","payload":{"command":"get_round","channel_id":"C1"}}"#,
            &mut subs,
            &service,
        )
        .await;
        assert_eq!(round["payload"]["answer_count"], 1);
    }

    #[test]
    fn events_are_filtered_by_channel() {
        let mut subs = SubscriptionManager::new();
        let event = RoundEvent::notice(ChannelId::new("C1"), None, Notice::PriceTease);
        assert!(render_event(&event, &subs).is_none());

        subs.subscribe(&["C1".to_string()]);
        let Some(json) = render_event(&event, &subs) else {
            panic!("subscribed channel should render");
        };
        assert!(json.contains("\"type\":\"event\""));
    }
}
