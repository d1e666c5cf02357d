use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use prost::Message as ProstMessage;
use tokio::sync::mpsc;

use common::games::tictactoe::GameMode;
use common::id_generator::generate_connection_id;
use common::{ClientMessage, ConnectionId, ServerMessage, client_message};

use crate::hub::GameHub;
use crate::log;
use crate::notifier::Notifier;
use crate::web_server::WebServerState;

pub async fn handle_websocket(socket: WebSocket, state: WebServerState) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(state.outbound_queue_size);

    let connection = ConnectionId::from(generate_connection_id());

    let send_task = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            let buf = message.encode_to_vec();
            if ws_sender.send(Message::Binary(buf.into())).await.is_err() {
                break;
            }
        }
    });

    let hub = state.hub;
    let broadcaster = state.broadcaster;

    broadcaster.register(connection.clone(), tx).await;
    hub.on_connect(&connection).await;

    while let Some(result) = ws_receiver.next().await {
        match result {
            Ok(Message::Binary(data)) => handle_frame(&hub, &connection, &data).await,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                log!("[ws:{}] Receive error: {}", connection, e);
                break;
            }
        }
    }

    broadcaster.unregister(&connection).await;
    hub.on_disconnect(&connection).await;
    send_task.abort();
    log!("[ws:{}] Connection closed", connection);
}

/// Decodes one binary frame and routes it to the hub. Undecodable frames are logged and dropped.
pub async fn handle_frame<N: Notifier>(hub: &GameHub<N>, connection: &ConnectionId, data: &[u8]) {
    let client_message = match ClientMessage::decode(data) {
        Ok(m) => m,
        Err(e) => {
            log!("[ws:{}] Failed to decode ClientMessage: {}", connection, e);
            return;
        }
    };

    match client_message.message {
        Some(message) => handle_message(hub, connection, message).await,
        None => log!("[ws:{}] Empty ClientMessage ignored", connection),
    }
}

async fn handle_message<N: Notifier>(
    hub: &GameHub<N>,
    connection: &ConnectionId,
    message: client_message::Message,
) {
    match message {
        client_message::Message::Register(req) => {
            hub.register(connection, &req.player_name).await;
        }
        client_message::Message::NewGame(req) => match GameMode::from_code(req.mode) {
            Some(mode) => hub.new_game(connection, mode).await,
            None => log!("[ws:{}] Unknown game mode {}, ignoring", connection, req.mode),
        },
        client_message::Message::PlaceMarker(req) => {
            hub.place_marker(connection, i64::from(req.position)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hub::HubSettings;
    use crate::notifier::Notification;
    use crate::notifier::testing::RecordingNotifier;
    use crate::session_rng::MatchRng;
    use common::games::tictactoe::Symbol;
    use common::{NewGameRequest, PlaceMarkerRequest, RegisterRequest};

    fn new_hub() -> (GameHub<RecordingNotifier>, RecordingNotifier) {
        let notifier = RecordingNotifier::new();
        let hub = GameHub::with_rng(notifier.clone(), HubSettings::default(), MatchRng::new(1));
        (hub, notifier)
    }

    fn frame(message: client_message::Message) -> Vec<u8> {
        ClientMessage {
            message: Some(message),
        }
        .encode_to_vec()
    }

    fn register(name: &str) -> Vec<u8> {
        frame(client_message::Message::Register(RegisterRequest {
            player_name: name.to_string(),
        }))
    }

    fn new_game(mode: i32) -> Vec<u8> {
        frame(client_message::Message::NewGame(NewGameRequest { mode }))
    }

    fn place_marker(position: i32) -> Vec<u8> {
        frame(client_message::Message::PlaceMarker(PlaceMarkerRequest { position }))
    }

    #[tokio::test]
    async fn test_frames_drive_a_game_against_the_ai() {
        let (hub, notifier) = new_hub();
        let alice = ConnectionId::from("a");

        handle_frame(&hub, &alice, &register("Alice")).await;
        handle_frame(&hub, &alice, &new_game(1)).await;
        handle_frame(&hub, &alice, &place_marker(4)).await;

        let received = notifier.sent_to(&alice);
        assert_eq!(received.first(), Some(&Notification::RegistrationComplete));
        assert!(received.contains(&Notification::MarkerPlaced {
            opponent_name: "Alice".to_string(),
            position: 4,
            symbol: Symbol::X,
        }));
        assert!(received.iter().any(|n| matches!(
            n,
            Notification::MarkerPlaced { position: 0, symbol: Symbol::O, .. }
        )));
        assert_eq!(hub.status().await.active_session_count, 1);
    }

    #[tokio::test]
    async fn test_unknown_mode_is_ignored() {
        let (hub, notifier) = new_hub();
        let alice = ConnectionId::from("a");
        handle_frame(&hub, &alice, &register("Alice")).await;
        notifier.clear();

        handle_frame(&hub, &alice, &new_game(7)).await;
        handle_frame(&hub, &alice, &new_game(-1)).await;

        assert!(notifier.deliveries().is_empty());
        assert_eq!(hub.status().await.active_session_count, 0);
    }

    #[tokio::test]
    async fn test_out_of_range_positions_are_ignored() {
        let (hub, notifier) = new_hub();
        let alice = ConnectionId::from("a");
        handle_frame(&hub, &alice, &register("Alice")).await;
        handle_frame(&hub, &alice, &new_game(1)).await;
        notifier.clear();

        handle_frame(&hub, &alice, &place_marker(-1)).await;
        handle_frame(&hub, &alice, &place_marker(9)).await;
        handle_frame(&hub, &alice, &place_marker(i32::MIN)).await;

        assert!(notifier.deliveries().is_empty());
        assert_eq!(hub.status().await.active_session_count, 1);
    }

    #[tokio::test]
    async fn test_garbage_frame_leaves_state_unchanged() {
        let (hub, notifier) = new_hub();
        let alice = ConnectionId::from("a");
        handle_frame(&hub, &alice, &register("Alice")).await;
        let before = hub.status().await;
        notifier.clear();

        handle_frame(&hub, &alice, &[0xff, 0xff, 0xff]).await;
        handle_frame(&hub, &alice, &ClientMessage { message: None }.encode_to_vec()).await;

        assert!(notifier.deliveries().is_empty());
        assert_eq!(hub.status().await, before);
    }
}
