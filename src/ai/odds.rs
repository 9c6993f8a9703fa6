use serde::Serialize;

use crate::ai::search::{DRAW_SCORE, WIN_SCORE, evaluate};
use crate::board::{Board, CENTER, Mark};

const CENTER_BONUS: i32 = 8;
const CENTER_PENALTY: i32 = 4;

/// Rough outcome percentages for the pie chart. Always sums to 100.
///
/// These are coarse buckets keyed on the minimax score, not calibrated
/// probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WinOdds {
    pub x: u8,
    pub o: u8,
    pub draw: u8,
}

impl WinOdds {
    pub fn for_board(board: &Board) -> Self {
        Self::from_score(evaluate(board), board.get(CENTER))
    }

    /// Maps a score (O's view) and the centre cell to percentages.
    pub fn from_score(score: i32, center: Mark) -> Self {
        let (mut x, mut o, mut draw) = match score {
            WIN_SCORE => (10, 85, 5),
            DRAW_SCORE => (35, 35, 30),
            s if s == -WIN_SCORE => (85, 10, 5),
            _ => (33, 33, 34),
        };

        if score == DRAW_SCORE {
            match center {
                Mark::X => {
                    x += CENTER_BONUS;
                    o -= CENTER_PENALTY;
                    draw -= CENTER_PENALTY;
                }
                Mark::O => {
                    o += CENTER_BONUS;
                    x -= CENTER_PENALTY;
                    draw -= CENTER_PENALTY;
                }
                Mark::Empty => {}
            }
        }

        let total = f64::from(x + o + draw);
        let o = (f64::from(o) / total * 100.0).round() as i32;
        let x = (f64::from(x) / total * 100.0).round() as i32;
        let draw = 100 - o - x;

        Self {
            x: x as u8,
            o: o as u8,
            draw: draw as u8,
        }
    }
}
