use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex;

use common::games::tictactoe::{GameMode, Grid, Mark, Placement, Position, Slot, Symbol, search};
use common::{ConnectionId, SessionId};

use crate::log;
use crate::notifier::{Delivery, Notification, Notifier, StatusUpdate};
use crate::registry::{Registry, Seat, TurnState};
use crate::server_config::ServerConfig;
use crate::session_rng::MatchRng;

/// Display settings the hub puts into notifications.
#[derive(Debug, Clone)]
pub struct HubSettings {
    pub ai_player_name: String,
    pub symbol_x_image: String,
    pub symbol_o_image: String,
    pub draw_message: String,
}

impl HubSettings {
    fn image_for(&self, symbol: Symbol) -> String {
        match symbol {
            Symbol::X => self.symbol_x_image.clone(),
            Symbol::O => self.symbol_o_image.clone(),
        }
    }
}

impl From<&ServerConfig> for HubSettings {
    fn from(config: &ServerConfig) -> Self {
        Self {
            ai_player_name: config.ai_player_name.clone(),
            symbol_x_image: config.symbol_x_image.clone(),
            symbol_o_image: config.symbol_o_image.clone(),
            draw_message: config.draw_message.clone(),
        }
    }
}

impl Default for HubSettings {
    fn default() -> Self {
        Self::from(&ServerConfig::default())
    }
}

/// Why a placement request was dropped. Only ever logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    NotInSession,
    GameOver,
    NotYourTurn,
    OutOfRange,
    CellTaken,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Rejection::NotInSession => "not in a session",
            Rejection::GameOver => "game is already over",
            Rejection::NotYourTurn => "not this player's turn",
            Rejection::OutOfRange => "position out of range",
            Rejection::CellTaken => "cell is already marked",
        };
        f.write_str(reason)
    }
}

/// Notifications collected while the registry lock is held and sent after it is released.
#[derive(Debug, Default)]
struct Outbox {
    deliveries: Vec<Delivery>,
}

impl Outbox {
    fn to(&mut self, connection: &ConnectionId, notification: Notification) {
        self.deliveries
            .push(Delivery::To(connection.clone(), notification));
    }

    /// Seats held by the AI receive nothing.
    fn to_seat(&mut self, seat: &Seat, notification: Notification) {
        if let Some(connection) = seat.occupant.connection() {
            self.to(connection, notification);
        }
    }

    fn status(&mut self, registry: &mut Registry) {
        self.deliveries.push(Delivery::All(registry.snapshot_status()));
    }
}

struct HubState {
    registry: Registry,
    rng: MatchRng,
}

/// Matchmaking and turn orchestration over the shared registry. Every request runs as one
/// transaction under a single lock; notifications go out after the lock is dropped.
pub struct GameHub<N: Notifier> {
    state: Arc<Mutex<HubState>>,
    notifier: N,
    settings: Arc<HubSettings>,
}

impl<N: Notifier> Clone for GameHub<N> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            notifier: self.notifier.clone(),
            settings: self.settings.clone(),
        }
    }
}

impl<N: Notifier> GameHub<N> {
    pub fn new(notifier: N, settings: HubSettings) -> Self {
        Self::with_rng(notifier, settings, MatchRng::from_random())
    }

    pub fn with_rng(notifier: N, settings: HubSettings, rng: MatchRng) -> Self {
        log!("Matchmaking RNG seed: {}", rng.seed());
        Self {
            state: Arc::new(Mutex::new(HubState {
                registry: Registry::new(),
                rng,
            })),
            notifier,
            settings: Arc::new(settings),
        }
    }

    pub async fn on_connect(&self, connection: &ConnectionId) {
        let outbox = {
            let mut state = self.state.lock().await;
            log!("[ws:{}] Connected", connection);
            let mut outbox = Outbox::default();
            outbox.status(&mut state.registry);
            outbox
        };
        self.dispatch(outbox).await;
    }

    pub async fn on_disconnect(&self, connection: &ConnectionId) {
        let outbox = {
            let mut state = self.state.lock().await;
            let Some(departure) = state.registry.unregister(connection) else {
                log!("[ws:{}] Disconnected before registering", connection);
                return;
            };

            let mut outbox = Outbox::default();
            if let Some(session) = &departure.abandoned_session {
                log!(
                    "[session:{}] {} left mid-game, session closed",
                    session.id,
                    departure.player.name
                );
                for seat in session.seats() {
                    if seat.occupant.connection() != Some(connection) {
                        outbox.to_seat(
                            seat,
                            Notification::OpponentDisconnected {
                                opponent_name: departure.player.name.clone(),
                            },
                        );
                    }
                }
            }
            log!("[ws:{}] Player {} removed", connection, departure.player.name);
            outbox.status(&mut state.registry);
            outbox
        };
        self.dispatch(outbox).await;
    }

    pub async fn register(&self, connection: &ConnectionId, player_name: &str) {
        let outbox = {
            let mut state = self.state.lock().await;
            let player = state.registry.register(connection, player_name);
            log!("[ws:{}] Registered as {}", connection, player.name);

            let mut outbox = Outbox::default();
            outbox.status(&mut state.registry);
            outbox.to(connection, Notification::RegistrationComplete);
            outbox
        };
        self.dispatch(outbox).await;
    }

    pub async fn new_game(&self, connection: &ConnectionId, mode: GameMode) {
        let outbox = {
            let mut guard = self.state.lock().await;
            let state = &mut *guard;
            let mut outbox = Outbox::default();

            let Some(player) = state.registry.find_by_connection(connection) else {
                log!("[ws:{}] New game requested before registering", connection);
                return;
            };
            if player.is_playing() {
                log!("[ws:{}] New game ignored, already playing", connection);
                return;
            }
            state.registry.set_looking_for_opponent(connection);

            match mode {
                GameMode::HumanVsHuman => self.pair_humans(state, connection, &mut outbox),
                GameMode::HumanVsAi | GameMode::AiVsHuman => {
                    if let Some(session_id) = self.pair_with_ai(state, connection, mode, &mut outbox) {
                        self.play_ai_turns(state, &session_id, &mut outbox).await;
                    }
                }
            }
            outbox
        };
        self.dispatch(outbox).await;
    }

    /// Applies a human placement and, when the AI moves next, its reply, as one transaction.
    pub async fn place_marker(&self, connection: &ConnectionId, position: i64) {
        let outbox = {
            let mut guard = self.state.lock().await;
            let state = &mut *guard;
            let mut outbox = Outbox::default();

            let target = state
                .registry
                .session_of(connection)
                .and_then(|session| Some((session.id.clone(), session.slot_of(connection)?)));
            let Some((session_id, slot)) = target else {
                log!("[ws:{}] Marker at {} ignored: {}", connection, position, Rejection::NotInSession);
                return;
            };

            if let Err(rejection) = self.apply_placement(state, &session_id, slot, position, &mut outbox) {
                log!("[session:{}] Marker at {} from {} ignored: {}", session_id, position, connection, rejection);
                return;
            }
            self.play_ai_turns(state, &session_id, &mut outbox).await;
            outbox
        };
        self.dispatch(outbox).await;
    }

    pub async fn status(&self) -> StatusUpdate {
        self.state.lock().await.registry.status()
    }

    fn pair_humans(&self, state: &mut HubState, connection: &ConnectionId, outbox: &mut Outbox) {
        let candidates = state.registry.opponent_candidates(connection);
        if candidates.is_empty() {
            log!("[ws:{}] No opponents available, waiting", connection);
            outbox.to(connection, Notification::NoOpponentsAvailable);
            return;
        }

        let opponent = candidates[state.rng.pick_index(candidates.len())].clone();
        let requester_moves_first = state.rng.coin_flip();

        let (Some(requester), Some(rival)) = (
            state.registry.find_by_connection(connection),
            state.registry.find_by_connection(&opponent),
        ) else {
            return;
        };

        let (requester_symbol, requester_turn) = if requester_moves_first {
            (Symbol::X, TurnState::MyTurn)
        } else {
            (Symbol::O, TurnState::Blocked)
        };
        let first = Seat::human(requester, requester_symbol, requester_turn);
        let second = Seat::human(rival, requester_symbol.other(), requester_turn.flipped());

        for (me, them) in [(&first, &second), (&second, &first)] {
            outbox.to_seat(
                me,
                Notification::OpponentFound {
                    opponent_name: them.name.clone(),
                    symbol_image: self.settings.image_for(me.symbol),
                },
            );
            let turn_notification = match me.turn {
                TurnState::MyTurn => Notification::YourTurn {
                    opponent_name: them.name.clone(),
                },
                TurnState::Blocked => Notification::WaitingForOpponentMove {
                    opponent_name: them.name.clone(),
                },
            };
            outbox.to_seat(me, turn_notification);
        }

        let session_id = state
            .registry
            .open_session(GameMode::HumanVsHuman, first, second);
        log!("[session:{}] Paired {} with {}", session_id, connection, opponent);
        outbox.status(&mut state.registry);
    }

    fn pair_with_ai(
        &self,
        state: &mut HubState,
        connection: &ConnectionId,
        mode: GameMode,
        outbox: &mut Outbox,
    ) -> Option<SessionId> {
        let ai_name = self.settings.ai_player_name.as_str();
        let (human_symbol, human_turn) = match mode {
            GameMode::AiVsHuman => (Symbol::O, TurnState::Blocked),
            _ => (Symbol::X, TurnState::MyTurn),
        };

        let human = Seat::human(
            state.registry.find_by_connection(connection)?,
            human_symbol,
            human_turn,
        );
        let ai = Seat::ai(ai_name, human_symbol.other(), human_turn.flipped());

        outbox.to(
            connection,
            Notification::OpponentFound {
                opponent_name: ai_name.to_string(),
                symbol_image: self.settings.image_for(human_symbol),
            },
        );
        let turn_notification = match human_turn {
            TurnState::MyTurn => Notification::YourTurn {
                opponent_name: ai_name.to_string(),
            },
            TurnState::Blocked => Notification::WaitingForOpponentMove {
                opponent_name: ai_name.to_string(),
            },
        };
        outbox.to(connection, turn_notification);

        let session_id = state.registry.open_session(mode, human, ai);
        log!("[session:{}] {} started {} against {}", session_id, connection, mode, ai_name);
        outbox.status(&mut state.registry);
        Some(session_id)
    }

    /// Lets the AI move for as long as the session says it is the AI's turn.
    async fn play_ai_turns(&self, state: &mut HubState, session_id: &SessionId, outbox: &mut Outbox) {
        loop {
            let Some((slot, grid)) = state.registry.session(session_id).and_then(|s| s.ai_to_move()) else {
                return;
            };

            let Some(position) = compute_ai_move(grid, slot.mark()).await else {
                log!("[session:{}] AI found no move", session_id);
                return;
            };

            if let Err(rejection) =
                self.apply_placement(state, session_id, slot, position.index() as i64, outbox)
            {
                log!("[session:{}] AI move at {} rejected: {}", session_id, position, rejection);
                return;
            }
        }
    }

    /// Validates and applies one placement, queues its notifications and, on a win or a
    /// draw, closes the session.
    fn apply_placement(
        &self,
        state: &mut HubState,
        session_id: &SessionId,
        slot: Slot,
        position: i64,
        outbox: &mut Outbox,
    ) -> Result<(), Rejection> {
        let session = state
            .registry
            .session_mut(session_id)
            .ok_or(Rejection::NotInSession)?;

        if session.board.is_game_over() {
            return Err(Rejection::GameOver);
        }
        if session.seat(slot).turn != TurnState::MyTurn {
            return Err(Rejection::NotYourTurn);
        }
        let cell = Position::new(position).ok_or(Rejection::OutOfRange)?;
        if session.board.grid()[cell.index()] != Mark::Empty {
            return Err(Rejection::CellTaken);
        }

        let placement = session.board.place_mark_check_winner(slot, position);
        if placement == Placement::Rejected {
            return Err(Rejection::CellTaken);
        }

        let mover = session.seat(slot).clone();
        let placed = Notification::MarkerPlaced {
            opponent_name: mover.name.clone(),
            position: cell.index(),
            symbol: mover.symbol,
        };
        for seat in session.seats() {
            outbox.to_seat(seat, placed.clone());
        }

        let game_over_message = match placement {
            Placement::Won => Some(mover.name.clone()),
            Placement::Draw => Some(self.settings.draw_message.clone()),
            Placement::Continue | Placement::Rejected => None,
        };

        match game_over_message {
            Some(message) => {
                for seat in session.seats() {
                    outbox.to_seat(
                        seat,
                        Notification::GameOver {
                            message: message.clone(),
                        },
                    );
                }
                state.registry.finish_session(session_id);
                log!("[session:{}] Finished: {}", session_id, message);
            }
            None => {
                session.flip_turns();
                outbox.to_seat(
                    session.seat(slot.other()),
                    Notification::YourTurn {
                        opponent_name: mover.name,
                    },
                );
            }
        }

        outbox.status(&mut state.registry);
        Ok(())
    }

    async fn dispatch(&self, outbox: Outbox) {
        for delivery in outbox.deliveries {
            match delivery {
                Delivery::To(connection, notification) => {
                    self.notifier.notify(&connection, notification).await;
                }
                Delivery::All(status) => self.notifier.broadcast_all(status).await,
            }
        }
    }
}

async fn compute_ai_move(grid: Grid, mark: Mark) -> Option<Position> {
    match tokio::task::spawn_blocking(move || search(&grid, mark)).await {
        Ok(result) => result.best_move,
        Err(e) => {
            log!("AI search task failed: {}", e);
            None
        }
    }
}
