use std::fmt;

use serde::Serialize;

use crate::board::{BOARD_LEN, Board, CENTER, Mark, WIN_LINES, index_to_coord};

/// Strategy tip shown next to the board. One variant per advisory rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Tip {
    RoundOver,
    Opening,
    TakeCenter,
    Block { opponent: Mark, index: usize },
    Win { index: usize },
    Fork { index: usize },
    General,
}

impl Tip {
    pub fn message(&self) -> String {
        match self {
            Self::RoundOver => {
                "Round ended. Start new round or continue learning from the move history."
                    .to_string()
            }
            Self::Opening => "Opening tip: Take the center (B2) to maximize control.".to_string(),
            Self::TakeCenter => {
                "Good chance: Take center (B2) if available. It gives the most winning lines."
                    .to_string()
            }
            Self::Block { opponent, index } => format!(
                "Urgent: Opponent ({opponent}) has a winning threat. Block at {}.",
                index_to_coord(*index)
            ),
            Self::Win { index } => format!(
                "You can win now! Play at {} to finish the game.",
                index_to_coord(*index)
            ),
            Self::Fork { index } => format!(
                "Fork opportunity: Play at {} to create two threats.",
                index_to_coord(*index)
            ),
            Self::General => {
                "No immediate threats. Prefer corners (A1, A3, C1, C3) if free, then edges."
                    .to_string()
            }
        }
    }
}

impl fmt::Display for Tip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Empty cell of the first line holding exactly two `player` marks and one
/// empty cell, scanning lines in canonical order.
pub fn find_immediate_threat(board: &Board, player: Mark) -> Option<usize> {
    WIN_LINES
        .iter()
        .find_map(|line| open_cell_of_two(board, line, player))
}

/// First empty cell (ascending) where placing `player` yields at least two
/// lines with two `player` marks and one empty cell.
///
/// One-ply lookahead: it ignores whether the opponent can answer both lines
/// or win first, so it can over- and under-report real forks.
pub fn find_fork_opportunity(board: &Board, player: Mark) -> Option<usize> {
    (0..BOARD_LEN)
        .filter(|&idx| board.get(idx) == Mark::Empty)
        .find(|&idx| {
            let mut trial = *board;
            trial.set(idx, player);
            let threats = WIN_LINES
                .iter()
                .filter(|line| open_cell_of_two(&trial, line, player).is_some())
                .count();
            threats >= 2
        })
}

/// Picks the tip for `to_move`. Only the first matching rule applies.
pub fn advise(board: &Board, to_move: Mark, round_active: bool) -> Tip {
    if !round_active {
        return Tip::RoundOver;
    }
    if board.filled_count() == 0 {
        return Tip::Opening;
    }
    if board.get(CENTER) == Mark::Empty {
        return Tip::TakeCenter;
    }

    let opponent = to_move.opponent();
    if let Some(index) = find_immediate_threat(board, opponent) {
        return Tip::Block { opponent, index };
    }
    if let Some(index) = find_immediate_threat(board, to_move) {
        return Tip::Win { index };
    }
    if let Some(index) = find_fork_opportunity(board, to_move) {
        return Tip::Fork { index };
    }

    Tip::General
}

fn open_cell_of_two(board: &Board, line: &[usize; 3], player: Mark) -> Option<usize> {
    let owned = line.iter().filter(|&&idx| board.get(idx) == player).count();
    let empty = line.iter().filter(|&&idx| board.get(idx) == Mark::Empty).count();
    if owned == 2 && empty == 1 {
        line.iter().copied().find(|&idx| board.get(idx) == Mark::Empty)
    } else {
        None
    }
}
