use std::collections::HashMap;

use common::games::tictactoe::{Board, GameMode, Grid, Slot, Symbol};
use common::id_generator::generate_session_id;
use common::{ConnectionId, SessionId};

use crate::notifier::StatusUpdate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerStatus {
    Idle,
    LookingForOpponent,
    Playing(SessionId),
}

#[derive(Debug, Clone)]
pub struct Player {
    pub connection: ConnectionId,
    pub name: String,
    pub status: PlayerStatus,
}

impl Player {
    fn new(connection: ConnectionId, name: String) -> Self {
        Self {
            connection,
            name,
            status: PlayerStatus::Idle,
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.status, PlayerStatus::Playing(_))
    }

    pub fn is_looking_for_opponent(&self) -> bool {
        self.status == PlayerStatus::LookingForOpponent
    }

    pub fn session(&self) -> Option<&SessionId> {
        match &self.status {
            PlayerStatus::Playing(session_id) => Some(session_id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    MyTurn,
    Blocked,
}

impl TurnState {
    pub fn flipped(self) -> Self {
        match self {
            TurnState::MyTurn => TurnState::Blocked,
            TurnState::Blocked => TurnState::MyTurn,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Occupant {
    Human(ConnectionId),
    Ai,
}

impl Occupant {
    pub fn is_ai(&self) -> bool {
        matches!(self, Occupant::Ai)
    }

    pub fn connection(&self) -> Option<&ConnectionId> {
        match self {
            Occupant::Human(connection) => Some(connection),
            Occupant::Ai => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Seat {
    pub occupant: Occupant,
    pub name: String,
    pub symbol: Symbol,
    pub turn: TurnState,
}

impl Seat {
    pub fn human(player: &Player, symbol: Symbol, turn: TurnState) -> Self {
        Self {
            occupant: Occupant::Human(player.connection.clone()),
            name: player.name.clone(),
            symbol,
            turn,
        }
    }

    pub fn ai(name: &str, symbol: Symbol, turn: TurnState) -> Self {
        Self {
            occupant: Occupant::Ai,
            name: name.to_string(),
            symbol,
            turn,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub mode: GameMode,
    pub board: Board,
    seats: [Seat; 2],
}

impl Session {
    pub fn seat(&self, slot: Slot) -> &Seat {
        match slot {
            Slot::First => &self.seats[0],
            Slot::Second => &self.seats[1],
        }
    }

    pub fn seats(&self) -> impl Iterator<Item = &Seat> {
        self.seats.iter()
    }

    pub fn slot_of(&self, connection: &ConnectionId) -> Option<Slot> {
        [Slot::First, Slot::Second]
            .into_iter()
            .find(|&slot| self.seat(slot).occupant.connection() == Some(connection))
    }

    pub fn slot_to_move(&self) -> Option<Slot> {
        if self.board.is_game_over() {
            return None;
        }
        [Slot::First, Slot::Second]
            .into_iter()
            .find(|&slot| self.seat(slot).turn == TurnState::MyTurn)
    }

    /// The AI's slot and a snapshot of the grid when the built-in opponent has to move next.
    pub fn ai_to_move(&self) -> Option<(Slot, Grid)> {
        let slot = self.slot_to_move()?;
        self.seat(slot)
            .occupant
            .is_ai()
            .then(|| (slot, *self.board.grid()))
    }

    pub fn flip_turns(&mut self) {
        for seat in &mut self.seats {
            seat.turn = seat.turn.flipped();
        }
    }

    pub fn human_connections(&self) -> Vec<ConnectionId> {
        self.seats
            .iter()
            .filter_map(|seat| seat.occupant.connection().cloned())
            .collect()
    }
}

/// Result of removing a player: the record itself and the session it was torn out of.
#[derive(Debug)]
pub struct Departure {
    pub player: Player,
    pub abandoned_session: Option<Session>,
}

/// Owner of every connected player and active session. Sessions refer to players by
/// connection handle only; removing a player always removes its session in the same call.
#[derive(Debug, Default)]
pub struct Registry {
    players: HashMap<ConnectionId, Player>,
    sessions: HashMap<SessionId, Session>,
    completed_games: u64,
    next_session: u64,
    status_sequence: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the player, or resets an existing one that is looking for an opponent back to idle.
    /// A player in a running session keeps it; the name is never changed.
    pub fn register(&mut self, connection: &ConnectionId, name: &str) -> &Player {
        let player = self
            .players
            .entry(connection.clone())
            .or_insert_with(|| Player::new(connection.clone(), name.to_string()));
        if player.status == PlayerStatus::LookingForOpponent {
            player.status = PlayerStatus::Idle;
        }
        player
    }

    pub fn unregister(&mut self, connection: &ConnectionId) -> Option<Departure> {
        let player = self.players.remove(connection)?;

        let abandoned_session = player
            .session()
            .and_then(|session_id| self.sessions.remove(session_id));

        if let Some(session) = &abandoned_session {
            self.reset_to_idle(session);
        }

        Some(Departure {
            player,
            abandoned_session,
        })
    }

    pub fn find_by_connection(&self, connection: &ConnectionId) -> Option<&Player> {
        self.players.get(connection)
    }

    pub fn set_looking_for_opponent(&mut self, connection: &ConnectionId) {
        if let Some(player) = self.players.get_mut(connection)
            && !player.is_playing()
        {
            player.status = PlayerStatus::LookingForOpponent;
        }
    }

    /// Other players waiting for a match, ordered by handle.
    pub fn opponent_candidates(&self, requester: &ConnectionId) -> Vec<ConnectionId> {
        let mut candidates: Vec<ConnectionId> = self
            .players
            .values()
            .filter(|player| &player.connection != requester && player.is_looking_for_opponent())
            .map(|player| player.connection.clone())
            .collect();
        candidates.sort();
        candidates
    }

    pub fn session(&self, session_id: &SessionId) -> Option<&Session> {
        self.sessions.get(session_id)
    }

    pub fn session_mut(&mut self, session_id: &SessionId) -> Option<&mut Session> {
        self.sessions.get_mut(session_id)
    }

    pub fn session_of(&self, connection: &ConnectionId) -> Option<&Session> {
        self.players
            .get(connection)
            .and_then(Player::session)
            .and_then(|session_id| self.sessions.get(session_id))
    }

    /// Seats both participants in a new session and marks the humans as playing.
    pub fn open_session(&mut self, mode: GameMode, first: Seat, second: Seat) -> SessionId {
        self.next_session += 1;
        let session_id = SessionId::new(generate_session_id(self.next_session));

        let session = Session {
            id: session_id.clone(),
            mode,
            board: Board::new(),
            seats: [first, second],
        };

        for connection in session.human_connections() {
            if let Some(player) = self.players.get_mut(&connection) {
                player.status = PlayerStatus::Playing(session_id.clone());
            }
        }

        self.sessions.insert(session_id.clone(), session);
        session_id
    }

    /// Removes a session that ended in a win or a draw and counts it as played.
    pub fn finish_session(&mut self, session_id: &SessionId) -> Option<Session> {
        let session = self.sessions.remove(session_id)?;
        self.completed_games += 1;
        self.reset_to_idle(&session);
        Some(session)
    }

    fn reset_to_idle(&mut self, session: &Session) {
        for connection in session.human_connections() {
            if let Some(player) = self.players.get_mut(&connection)
                && player.session() == Some(&session.id)
            {
                player.status = PlayerStatus::Idle;
            }
        }
    }

    pub fn completed_games(&self) -> u64 {
        self.completed_games
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Current counters, stamped with the sequence of the last snapshot taken.
    pub fn status(&self) -> StatusUpdate {
        StatusUpdate {
            total_games_played: self.completed_games,
            active_session_count: self.sessions.len(),
            connected_player_count: self.players.len(),
            sequence: self.status_sequence,
        }
    }

    /// Status for broadcasting. Each call takes the next sequence number.
    pub fn snapshot_status(&mut self) -> StatusUpdate {
        self.status_sequence += 1;
        self.status()
    }
}
