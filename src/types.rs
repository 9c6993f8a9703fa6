use serde::Serialize;

use crate::ai::advisor::Tip;
use crate::ai::odds::WinOdds;
use crate::board::Mark;
use crate::config::GameMode;

/// One entry of the move history list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveEntry {
    pub player: Mark,
    pub index: usize,
    pub coord: String,
    /// e.g. `3. X → B2`
    pub label: String,
}

/// Rounds won per side plus draws, across the whole match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Scoreboard {
    pub x: u32,
    pub o: u32,
    pub draws: u32,
}

/// How a finished round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RoundOutcome {
    Win { winner: Mark, line: [usize; 3] },
    Draw,
}

/// Public game state returned from WASM APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub board: Vec<Mark>,
    pub current_player: Mark,
    pub mode: GameMode,
    pub is_active: bool,
    pub status: String,
    pub moves: Vec<MoveEntry>,
    pub scores: Scoreboard,
    /// Contract:
    /// - `None` while the round is in progress.
    /// - Set once the round ends, until the next round starts.
    pub outcome: Option<RoundOutcome>,
}

/// Advisory panel content: outcome odds and the strategy tip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    pub odds: WinOdds,
    pub tip: Tip,
    pub message: String,
}
