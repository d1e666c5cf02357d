use super::types::{GRID_SIZE, Grid, Mark, Position, Slot};
use super::win_detector::check_winner;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BoardStatus {
    InProgress,
    Won(Mark),
    Draw,
}

/// Result of `Board::place_mark_check_winner`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    Rejected,
    Continue,
    Won,
    Draw,
}

#[derive(Debug, Clone)]
pub struct Board {
    grid: Grid,
    moves_left: usize,
    status: BoardStatus,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            grid: [Mark::Empty; GRID_SIZE],
            moves_left: GRID_SIZE,
            status: BoardStatus::InProgress,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn moves_left(&self) -> usize {
        self.moves_left
    }

    pub fn is_game_over(&self) -> bool {
        self.status != BoardStatus::InProgress
    }

    pub fn is_draw(&self) -> bool {
        self.status == BoardStatus::Draw
    }

    pub fn winner(&self) -> Option<Mark> {
        match self.status {
            BoardStatus::Won(mark) => Some(mark),
            _ => None,
        }
    }

    /// Writes the slot's mark at `position`. Returns false, leaving the board untouched,
    /// when the game is over, the index is outside `0..9` or the cell is taken.
    /// Filling the last cell without completing a line flags a draw.
    pub fn place_mark(&mut self, slot: Slot, position: i64) -> bool {
        if self.is_game_over() {
            return false;
        }
        let Some(position) = Position::new(position) else {
            return false;
        };
        if self.grid[position.index()] != Mark::Empty {
            return false;
        }

        let mark = slot.mark();
        self.grid[position.index()] = mark;
        self.moves_left -= 1;

        if self.moves_left == 0 && !check_winner(&self.grid, mark) {
            self.status = BoardStatus::Draw;
        }
        true
    }

    /// Places a mark and checks whether the mover's own mark completed a line.
    pub fn place_mark_check_winner(&mut self, slot: Slot, position: i64) -> Placement {
        if !self.place_mark(slot, position) {
            return Placement::Rejected;
        }

        let mark = slot.mark();
        if check_winner(&self.grid, mark) {
            self.status = BoardStatus::Won(mark);
            return Placement::Won;
        }
        if self.is_draw() {
            return Placement::Draw;
        }
        Placement::Continue
    }
}

pub fn available_moves(grid: &Grid) -> Vec<Position> {
    Position::all()
        .filter(|position| grid[position.index()] == Mark::Empty)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_cells(board: &Board) -> usize {
        board.grid().iter().filter(|&&cell| cell != Mark::Empty).count()
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();

        assert_eq!(board.moves_left(), 9);
        assert_eq!(filled_cells(&board), 0);
        assert!(!board.is_game_over());
        assert_eq!(available_moves(board.grid()).len(), 9);
    }

    #[test]
    fn test_place_mark_writes_slot_mark() {
        let mut board = Board::new();

        assert!(board.place_mark(Slot::First, 4));
        assert!(board.place_mark(Slot::Second, 0));

        assert_eq!(board.grid()[4], Mark::A);
        assert_eq!(board.grid()[0], Mark::B);
        assert_eq!(board.moves_left(), 7);
    }

    #[test]
    fn test_occupied_cell_is_never_overwritten() {
        let mut board = Board::new();
        board.place_mark(Slot::First, 3);

        assert!(!board.place_mark(Slot::Second, 3));
        assert_eq!(board.grid()[3], Mark::A);
        assert_eq!(board.moves_left(), 8);
    }

    #[test]
    fn test_out_of_range_positions_are_rejected() {
        let mut board = Board::new();

        for position in [-1, -9, 9, 10, i64::MAX] {
            assert!(!board.place_mark(Slot::First, position));
        }
        assert_eq!(board.moves_left(), 9);
        assert_eq!(filled_cells(&board), 0);
    }

    #[test]
    fn test_filled_cells_match_accepted_placements() {
        let mut board = Board::new();
        let attempts = [
            (Slot::First, 0),
            (Slot::Second, 0),
            (Slot::Second, 8),
            (Slot::First, 12),
            (Slot::First, 2),
            (Slot::Second, -3),
            (Slot::Second, 8),
            (Slot::Second, 6),
        ];

        let mut accepted = 0;
        for (slot, position) in attempts {
            if board.place_mark(slot, position) {
                accepted += 1;
            }
            assert_eq!(filled_cells(&board), accepted);
            assert_eq!(9 - board.moves_left(), accepted);
        }
        assert_eq!(accepted, 4);
    }

    #[test]
    fn test_mover_completing_line_wins() {
        let mut board = Board::new();
        board.place_mark_check_winner(Slot::First, 0);
        board.place_mark_check_winner(Slot::Second, 3);
        board.place_mark_check_winner(Slot::First, 1);
        board.place_mark_check_winner(Slot::Second, 4);

        let placement = board.place_mark_check_winner(Slot::First, 2);

        assert_eq!(placement, Placement::Won);
        assert_eq!(board.winner(), Some(Mark::A));
        assert!(board.is_game_over());
        assert!(!board.is_draw());
    }

    #[test]
    fn test_no_placement_after_game_over() {
        let mut board = Board::new();
        for (slot, position) in [
            (Slot::Second, 6),
            (Slot::First, 0),
            (Slot::Second, 7),
            (Slot::First, 1),
            (Slot::Second, 8),
        ] {
            board.place_mark_check_winner(slot, position);
        }
        assert_eq!(board.winner(), Some(Mark::B));
        let before = *board.grid();

        assert_eq!(board.place_mark_check_winner(Slot::First, 2), Placement::Rejected);
        assert!(!board.place_mark(Slot::First, 4));
        assert_eq!(*board.grid(), before);
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        // A B A / A B B / B A A
        let mut board = Board::new();
        let moves = [
            (Slot::First, 0),
            (Slot::Second, 1),
            (Slot::First, 2),
            (Slot::Second, 4),
            (Slot::First, 3),
            (Slot::Second, 5),
            (Slot::First, 7),
            (Slot::Second, 6),
        ];
        for (slot, position) in moves {
            assert_eq!(board.place_mark_check_winner(slot, position), Placement::Continue);
        }

        assert_eq!(board.place_mark_check_winner(Slot::First, 8), Placement::Draw);
        assert!(board.is_draw());
        assert!(board.is_game_over());
        assert_eq!(board.winner(), None);
        assert_eq!(board.moves_left(), 0);
    }

    #[test]
    fn test_win_on_last_cell_is_not_a_draw() {
        // B B A / A B A / B A _  then A plays 8 completing the right column
        let mut board = Board::new();
        let moves = [
            (Slot::First, 2),
            (Slot::Second, 0),
            (Slot::First, 3),
            (Slot::Second, 1),
            (Slot::First, 5),
            (Slot::Second, 4),
            (Slot::First, 7),
            (Slot::Second, 6),
        ];
        for (slot, position) in moves {
            assert_eq!(board.place_mark_check_winner(slot, position), Placement::Continue);
        }

        assert_eq!(board.place_mark_check_winner(Slot::First, 8), Placement::Won);
        assert!(!board.is_draw());
        assert_eq!(board.winner(), Some(Mark::A));
    }
}
