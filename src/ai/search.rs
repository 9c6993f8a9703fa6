use once_cell::sync::Lazy;
use tracing::debug;
use web_time::Instant;

use crate::board::{BOARD_LEN, Board, Mark};

/// Score of a position won by O (the computer). X wins score the negation.
pub const WIN_SCORE: i32 = 10;
pub const DRAW_SCORE: i32 = 0;

/// The computer always plays O and maximizes.
pub const COMPUTER_MARK: Mark = Mark::O;

static EMPTY_BOARD_RESULT: Lazy<SearchResult> =
    Lazy::new(|| Minimax::new().search(&mut Board::new(), COMPUTER_MARK));

/// Chosen cell and minimax value of the position.
/// `index` is `None` when the searched board was already terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub index: Option<usize>,
    pub score: i32,
}

impl SearchResult {
    fn terminal(score: i32) -> Self {
        Self { index: None, score }
    }
}

/// Exhaustive minimax without pruning.
#[derive(Debug, Default)]
pub struct Minimax {
    nodes: u64,
    leaves: u64,
}

impl Minimax {
    pub fn new() -> Self {
        Self::default()
    }

    /// Searches `board` with `player` to move.
    ///
    /// The board is borrowed mutably for the whole call: every candidate is
    /// placed, searched and cleared again, so it is unchanged on return.
    /// Caller contract: when a move is needed the board must not be terminal.
    pub fn search(&mut self, board: &mut Board, player: Mark) -> SearchResult {
        self.nodes = 0;
        self.leaves = 0;
        let start = Instant::now();

        let result = self.minimax(board, player);

        debug!(
            nodes = self.nodes,
            leaves = self.leaves,
            elapsed_us = start.elapsed().as_micros() as u64,
            index = ?result.index,
            score = result.score,
            "minimax search finished"
        );
        result
    }

    /// Nodes visited by the last search, root included.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Terminal positions reached by the last search.
    pub fn leaves(&self) -> u64 {
        self.leaves
    }

    fn minimax(&mut self, board: &mut Board, player: Mark) -> SearchResult {
        self.nodes += 1;

        // Fixed order: X win, O win, full board.
        if board.is_win(Mark::X) {
            self.leaves += 1;
            return SearchResult::terminal(-WIN_SCORE);
        }
        if board.is_win(Mark::O) {
            self.leaves += 1;
            return SearchResult::terminal(WIN_SCORE);
        }
        if board.is_full() {
            self.leaves += 1;
            return SearchResult::terminal(DRAW_SCORE);
        }

        let maximizing = player == Mark::O;
        let mut best: Option<(usize, i32)> = None;

        for idx in 0..BOARD_LEN {
            if board.get(idx) != Mark::Empty {
                continue;
            }

            board.set(idx, player);
            let reply = self.minimax(board, player.opponent());
            board.set(idx, Mark::Empty);

            if is_better(reply.score, best, maximizing) {
                best = Some((idx, reply.score));
            }
        }

        match best {
            Some((index, score)) => SearchResult {
                index: Some(index),
                score,
            },
            None => SearchResult::terminal(DRAW_SCORE),
        }
    }
}

// Strict comparison keeps the lowest index among equal scores.
fn is_better(score: i32, best: Option<(usize, i32)>, maximizing: bool) -> bool {
    match best {
        None => true,
        Some((_, best_score)) if maximizing => score > best_score,
        Some((_, best_score)) => score < best_score,
    }
}

/// Optimal move and value for `player` on `board`.
pub fn best_move(board: &mut Board, player: Mark) -> SearchResult {
    Minimax::new().search(board, player)
}

/// Advisory evaluation of `board`, searched with the computer's mark to move
/// regardless of whose turn it is. The index is discarded.
pub fn evaluate(board: &Board) -> i32 {
    if board.filled_count() == 0 {
        return EMPTY_BOARD_RESULT.score;
    }
    let mut scratch = *board;
    best_move(&mut scratch, COMPUTER_MARK).score
}
