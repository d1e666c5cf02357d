use std::future::Future;

use common::games::tictactoe::Symbol;
use common::{ConnectionId, ServerMessage, server_message};

/// A push addressed to a single connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    RegistrationComplete,
    OpponentFound {
        opponent_name: String,
        symbol_image: String,
    },
    NoOpponentsAvailable,
    WaitingForOpponentMove {
        opponent_name: String,
    },
    YourTurn {
        opponent_name: String,
    },
    /// `opponent_name` is the name of whoever placed the marker.
    MarkerPlaced {
        opponent_name: String,
        position: usize,
        symbol: Symbol,
    },
    OpponentDisconnected {
        opponent_name: String,
    },
    /// Winner's name, or the draw message.
    GameOver {
        message: String,
    },
}

/// Snapshots are delivered outside the hub lock and may arrive out of order;
/// `sequence` lets clients keep only the newest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusUpdate {
    pub total_games_played: u64,
    pub active_session_count: usize,
    pub connected_player_count: usize,
    pub sequence: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    To(ConnectionId, Notification),
    All(StatusUpdate),
}

/// Push channel to connected clients, implemented by the transport.
pub trait Notifier: Send + Sync + Clone + 'static {
    fn notify(
        &self,
        connection: &ConnectionId,
        notification: Notification,
    ) -> impl Future<Output = ()> + Send;

    fn broadcast_all(&self, status: StatusUpdate) -> impl Future<Output = ()> + Send;
}

impl Notification {
    pub fn to_proto(&self) -> ServerMessage {
        let message = match self {
            Notification::RegistrationComplete => server_message::Message::RegistrationComplete(
                common::RegistrationCompleteNotification {},
            ),
            Notification::OpponentFound {
                opponent_name,
                symbol_image,
            } => server_message::Message::OpponentFound(common::OpponentFoundNotification {
                opponent_name: opponent_name.clone(),
                symbol_image: symbol_image.clone(),
            }),
            Notification::NoOpponentsAvailable => server_message::Message::NoOpponentsAvailable(
                common::NoOpponentsAvailableNotification {},
            ),
            Notification::WaitingForOpponentMove { opponent_name } => {
                server_message::Message::WaitingForOpponentMove(
                    common::WaitingForOpponentMoveNotification {
                        opponent_name: opponent_name.clone(),
                    },
                )
            }
            Notification::YourTurn { opponent_name } => {
                server_message::Message::YourTurn(common::YourTurnNotification {
                    opponent_name: opponent_name.clone(),
                })
            }
            Notification::MarkerPlaced {
                opponent_name,
                position,
                symbol,
            } => server_message::Message::MarkerPlaced(common::MarkerPlacedNotification {
                opponent_name: opponent_name.clone(),
                position: *position as u32,
                symbol: symbol.to_string(),
            }),
            Notification::OpponentDisconnected { opponent_name } => {
                server_message::Message::OpponentDisconnected(
                    common::OpponentDisconnectedNotification {
                        opponent_name: opponent_name.clone(),
                    },
                )
            }
            Notification::GameOver { message } => {
                server_message::Message::GameOver(common::GameOverNotification {
                    message: message.clone(),
                })
            }
        };
        ServerMessage {
            message: Some(message),
        }
    }
}

impl StatusUpdate {
    pub fn to_proto(&self) -> ServerMessage {
        ServerMessage {
            message: Some(server_message::Message::StatusUpdate(
                common::StatusUpdateNotification {
                    total_games_played: self.total_games_played,
                    active_session_count: self.active_session_count as u32,
                    connected_player_count: self.connected_player_count as u32,
                    sequence: self.sequence,
                },
            )),
        }
    }
}
