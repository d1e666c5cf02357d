use super::board::available_moves;
use super::types::{Grid, Mark, Position};
use super::win_detector::check_winner;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchResult {
    /// Score from `Mark::A`'s point of view: +1 A wins, -1 B wins, 0 draw.
    pub score: i32,
    pub best_move: Option<Position>,
}

pub fn evaluate(grid: &Grid) -> i32 {
    if check_winner(grid, Mark::A) {
        1
    } else if check_winner(grid, Mark::B) {
        -1
    } else {
        0
    }
}

/// Exhaustive negamax over the remaining cells. `Mark::A` maximizes the score and
/// `Mark::B` minimizes it; ties keep the lowest cell index, so the result is deterministic.
pub fn search(grid: &Grid, to_move: Mark) -> SearchResult {
    let mut scratch = *grid;
    let (score, best_move) = negamax(&mut scratch, to_move);
    SearchResult { score, best_move }
}

fn negamax(grid: &mut Grid, to_move: Mark) -> (i32, Option<Position>) {
    let score = evaluate(grid);
    let Some(opponent) = to_move.opponent() else {
        return (score, None);
    };
    if score != 0 || grid.iter().all(|&cell| cell != Mark::Empty) {
        return (score, None);
    }

    let sign = side_sign(to_move);
    let mut best: Option<(i32, Position)> = None;

    for position in available_moves(grid) {
        grid[position.index()] = to_move;
        let (child_score, _) = negamax(grid, opponent);
        grid[position.index()] = Mark::Empty;

        let relative = sign * child_score;
        if best.is_none_or(|(best_relative, _)| relative > best_relative) {
            best = Some((relative, position));
        }
    }

    match best {
        Some((relative, position)) => (sign * relative, Some(position)),
        None => (score, None),
    }
}

fn side_sign(mark: Mark) -> i32 {
    match mark {
        Mark::B => -1,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_from(a_cells: &[usize], b_cells: &[usize]) -> Grid {
        let mut grid = [Mark::Empty; 9];
        for &cell in a_cells {
            grid[cell] = Mark::A;
        }
        for &cell in b_cells {
            grid[cell] = Mark::B;
        }
        grid
    }

    #[test]
    fn test_evaluate() {
        assert_eq!(evaluate(&grid_from(&[], &[])), 0);
        assert_eq!(evaluate(&grid_from(&[0, 4, 8], &[1, 2])), 1);
        assert_eq!(evaluate(&grid_from(&[0, 1], &[2, 4, 6])), -1);
    }

    #[test]
    fn test_empty_grid_is_a_draw_and_deterministic() {
        let grid = grid_from(&[], &[]);

        let first = search(&grid, Mark::A);
        let second = search(&grid, Mark::A);

        assert_eq!(first.score, 0);
        assert!(first.best_move.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn test_terminal_grid_returns_no_move() {
        let won = grid_from(&[0, 1, 2], &[3, 4]);
        assert_eq!(search(&won, Mark::B), SearchResult { score: 1, best_move: None });

        let full = grid_from(&[0, 2, 3, 7, 8], &[1, 4, 5, 6]);
        assert_eq!(search(&full, Mark::B), SearchResult { score: 0, best_move: None });
    }

    #[test]
    fn test_takes_immediate_win_for_a() {
        // A A _ / B B _ / _ _ _
        let grid = grid_from(&[0, 1], &[3, 4]);

        let result = search(&grid, Mark::A);

        assert_eq!(result.score, 1);
        assert_eq!(result.best_move, Position::new(2));
    }

    #[test]
    fn test_takes_immediate_win_for_b() {
        // B B _ / A A _ / _ _ A
        let grid = grid_from(&[3, 4, 8], &[0, 1]);

        let result = search(&grid, Mark::B);

        assert_eq!(result.score, -1);
        assert_eq!(result.best_move, Position::new(2));
    }

    #[test]
    fn test_blocks_open_line() {
        // A A _ / _ B _ / _ _ _
        let grid = grid_from(&[0, 1], &[4]);

        let result = search(&grid, Mark::B);

        assert_eq!(result.best_move, Position::new(2));
        assert!(result.score <= 0);
    }

    #[test]
    fn test_answers_center_with_corner() {
        let grid = grid_from(&[4], &[]);

        let result = search(&grid, Mark::B);

        assert_eq!(result.score, 0);
        assert_eq!(result.best_move, Position::new(0));
    }

    #[test]
    fn test_does_not_mutate_input() {
        let grid = grid_from(&[4], &[0]);
        let copy = grid;

        let _ = search(&grid, Mark::A);

        assert_eq!(grid, copy);
    }
}
