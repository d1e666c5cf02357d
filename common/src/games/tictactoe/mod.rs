mod board;
mod search;
mod types;
mod win_detector;

pub use board::{Board, Placement, available_moves};
pub use search::{SearchResult, evaluate, search};
pub use types::{GRID_SIZE, GameMode, Grid, Mark, Position, Slot, Symbol};
pub use win_detector::{WINNING_LINES, check_winner};
