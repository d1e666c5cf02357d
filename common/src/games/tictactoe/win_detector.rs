use super::types::{Grid, Mark};

pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// True iff some row, column or diagonal is entirely `mark`. Always false for `Mark::Empty`.
pub fn check_winner(grid: &Grid, mark: Mark) -> bool {
    if mark == Mark::Empty {
        return false;
    }
    WINNING_LINES
        .iter()
        .any(|line| line.iter().all(|&cell| grid[cell] == mark))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with(cells: &[usize], mark: Mark) -> Grid {
        let mut grid = [Mark::Empty; 9];
        for &cell in cells {
            grid[cell] = mark;
        }
        grid
    }

    #[test]
    fn test_every_line_wins_for_both_marks() {
        for mark in [Mark::A, Mark::B] {
            for line in WINNING_LINES {
                let grid = grid_with(&line, mark);

                assert!(check_winner(&grid, mark), "{:?} should win on {:?}", mark, line);
                assert!(!check_winner(&grid, mark.opponent().unwrap()));
            }
        }
    }

    #[test]
    fn test_partial_lines_do_not_win() {
        for mark in [Mark::A, Mark::B] {
            for line in WINNING_LINES {
                for skipped in 0..3 {
                    let cells: Vec<usize> = line
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| *i != skipped)
                        .map(|(_, &c)| c)
                        .collect();
                    let grid = grid_with(&cells, mark);

                    assert!(!check_winner(&grid, mark));
                }
            }
        }
    }

    #[test]
    fn test_mixed_lines_do_not_win() {
        for line in WINNING_LINES {
            let mut grid = grid_with(&line, Mark::A);
            grid[line[1]] = Mark::B;

            assert!(!check_winner(&grid, Mark::A));
            assert!(!check_winner(&grid, Mark::B));
        }
    }

    #[test]
    fn test_empty_grid_has_no_winner() {
        let grid = [Mark::Empty; 9];

        assert!(!check_winner(&grid, Mark::Empty));
        assert!(!check_winner(&grid, Mark::A));
        assert!(!check_winner(&grid, Mark::B));
    }
}
