use std::fmt;

use serde::{Deserialize, Serialize};

pub const BOARD_WIDTH: usize = 3;
pub const BOARD_LEN: usize = BOARD_WIDTH * BOARD_WIDTH;
pub const CENTER: usize = 4;

/// The 8 winning lines: rows, then columns, then diagonals.
pub const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

const COLUMNS: [char; BOARD_WIDTH] = ['A', 'B', 'C'];

/// Content of one cell. Serialized as the strings the page renders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    #[default]
    #[serde(rename = "")]
    Empty,
    X,
    O,
}

impl Mark {
    pub fn opponent(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
            Self::Empty => Self::Empty,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "",
            Self::X => "X",
            Self::O => "O",
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 3x3 board, indexed 0..=8 in row-major order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Mark; BOARD_LEN],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: [Mark; BOARD_LEN]) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Mark; BOARD_LEN] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Mark {
        self.cells[index]
    }

    pub fn set(&mut self, index: usize, mark: Mark) {
        self.cells[index] = mark;
    }

    /// Returns true iff `player` owns all three cells of some line.
    pub fn is_win(&self, player: Mark) -> bool {
        WIN_LINES
            .iter()
            .any(|line| line.iter().all(|&idx| self.cells[idx] == player))
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&cell| cell != Mark::Empty)
    }

    /// Empty cell indices in ascending order.
    pub fn empty_cells(&self) -> Vec<usize> {
        (0..BOARD_LEN)
            .filter(|&idx| self.cells[idx] == Mark::Empty)
            .collect()
    }

    pub fn filled_count(&self) -> usize {
        BOARD_LEN - self.empty_cells().len()
    }

    /// First completed line in canonical order, with its owner.
    pub fn winning_line(&self) -> Option<(Mark, [usize; 3])> {
        WIN_LINES.iter().find_map(|&[a, b, c]| {
            let mark = self.cells[a];
            (mark != Mark::Empty && mark == self.cells[b] && mark == self.cells[c])
                .then_some((mark, [a, b, c]))
        })
    }
}

/// Converts a cell index to its `A1`..`C3` coordinate (column letter, row digit).
pub fn index_to_coord(index: usize) -> String {
    let row = index / BOARD_WIDTH + 1;
    format!("{}{}", COLUMNS[index % BOARD_WIDTH], row)
}

/// Builds a board from a 9-character pattern of `X`, `O` and `.`.
#[cfg(test)]
pub(crate) fn board_from(pattern: &str) -> Board {
    let mut cells = [Mark::Empty; BOARD_LEN];
    let marks = pattern.chars().filter(|c| !c.is_whitespace());
    for (cell, ch) in cells.iter_mut().zip(marks) {
        *cell = match ch {
            'X' => Mark::X,
            'O' => Mark::O,
            _ => Mark::Empty,
        };
    }
    Board::from_cells(cells)
}
