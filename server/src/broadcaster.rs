use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{Mutex, mpsc};

use common::{ConnectionId, ServerMessage};

use crate::log;
use crate::notifier::{Notification, Notifier, StatusUpdate};

pub type ClientSender = mpsc::Sender<ServerMessage>;

/// Outbound queues of every open WebSocket, keyed by connection handle.
#[derive(Clone)]
pub struct Broadcaster {
    clients: Arc<Mutex<HashMap<ConnectionId, ClientSender>>>,
}

impl std::fmt::Debug for Broadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broadcaster").finish()
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl Broadcaster {
    pub fn new() -> Self {
        Self {
            clients: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn register(&self, connection: ConnectionId, sender: ClientSender) {
        self.clients.lock().await.insert(connection, sender);
    }

    pub async fn unregister(&self, connection: &ConnectionId) {
        self.clients.lock().await.remove(connection);
    }

    pub async fn client_count(&self) -> usize {
        self.clients.lock().await.len()
    }

    /// Never waits on a client: a full queue drops the message so one stalled reader cannot hold
    /// up the request that triggered the push.
    pub async fn send_to_client(&self, connection: &ConnectionId, message: ServerMessage) {
        let sender = self.clients.lock().await.get(connection).cloned();
        match sender {
            Some(sender) => deliver(connection, &sender, message),
            None => log!("Dropping message for unknown client {}", connection),
        }
    }

    pub async fn broadcast_to_all(&self, message: ServerMessage) {
        let senders: Vec<(ConnectionId, ClientSender)> = self
            .clients
            .lock()
            .await
            .iter()
            .map(|(connection, sender)| (connection.clone(), sender.clone()))
            .collect();

        for (connection, sender) in senders {
            deliver(&connection, &sender, message.clone());
        }
    }
}

fn deliver(connection: &ConnectionId, sender: &ClientSender, message: ServerMessage) {
    match sender.try_send(message) {
        Ok(()) => {}
        Err(TrySendError::Full(_)) => {
            log!("Outbound queue full for client {}, message dropped", connection);
        }
        Err(TrySendError::Closed(_)) => {
            log!("Client {} channel closed, message dropped", connection);
        }
    }
}

impl Notifier for Broadcaster {
    async fn notify(&self, connection: &ConnectionId, notification: Notification) {
        self.send_to_client(connection, notification.to_proto()).await;
    }

    async fn broadcast_all(&self, status: StatusUpdate) {
        self.broadcast_to_all(status.to_proto()).await;
    }
}
