use thiserror::Error;
use tracing::{debug, info};

use crate::ai::advisor::advise;
use crate::ai::odds::WinOdds;
use crate::ai::search::{COMPUTER_MARK, best_move};
use crate::board::{BOARD_LEN, Board, Mark, index_to_coord};
use crate::config::{ConfigError, GameMode, MatchConfig};
use crate::types::{Analysis, GameState, MoveEntry, RoundOutcome, Scoreboard};

const FIRST_PLAYER: Mark = Mark::X;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatchError {
    #[error("round is not active")]
    RoundInactive,
    #[error("cell {0} is out of range")]
    CellOutOfRange(usize),
    #[error("cell {0} is already taken")]
    CellOccupied(usize),
    #[error("it is the computer's turn")]
    ComputerToMove,
    #[error("it is not the computer's turn")]
    NotComputerTurn,
    #[error("computer could not select a move")]
    NoComputerMove,
    #[error("computer selected illegal cell {0}")]
    IllegalComputerMove(usize),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub trait MoveSelector: Send + Sync {
    fn select_move(&self, board: &Board, mark: Mark) -> Option<usize>;
}

/// Perfect play through the exhaustive search.
#[derive(Debug, Default, Clone, Copy)]
pub struct MinimaxSelector;

impl MoveSelector for MinimaxSelector {
    fn select_move(&self, board: &Board, mark: Mark) -> Option<usize> {
        let mut scratch = *board;
        best_move(&mut scratch, mark).index
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub player: Mark,
    pub index: usize,
}

/// Result of a single placed mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Continue { next: Mark },
    Finished(RoundOutcome),
}

/// State of one match: the running round plus scores across rounds.
pub struct MatchSession {
    config: MatchConfig,
    board: Board,
    current_player: Mark,
    is_active: bool,
    moves: Vec<MoveRecord>,
    scores: Scoreboard,
    outcome: Option<RoundOutcome>,
    selector: Box<dyn MoveSelector>,
}

impl MatchSession {
    /// Creates a match with its first round already started.
    pub fn new(config: MatchConfig, selector: Box<dyn MoveSelector>) -> Result<Self, MatchError> {
        config.validate()?;
        let mut session = Self {
            config,
            board: Board::new(),
            current_player: FIRST_PLAYER,
            is_active: false,
            moves: Vec::new(),
            scores: Scoreboard::default(),
            outcome: None,
            selector,
        };
        session.start_next_round();
        Ok(session)
    }

    pub fn with_default_selector(config: MatchConfig) -> Result<Self, MatchError> {
        Self::new(config, Box::new(MinimaxSelector))
    }

    pub fn mode(&self) -> GameMode {
        self.config.mode
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn moves(&self) -> &[MoveRecord] {
        &self.moves
    }

    pub fn scores(&self) -> Scoreboard {
        self.scores
    }

    pub fn current_player(&self) -> Mark {
        self.current_player
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Switches mode and starts a fresh round. Scores carry over.
    pub fn start_game(&mut self, mode: GameMode) {
        self.config.mode = mode;
        self.start_next_round();
    }

    pub fn start_next_round(&mut self) {
        self.board = Board::new();
        self.moves.clear();
        self.current_player = FIRST_PLAYER;
        self.is_active = true;
        self.outcome = None;
        debug!(mode = ?self.config.mode, "round started");
    }

    pub fn reset_match(&mut self) {
        self.scores = Scoreboard::default();
        self.start_next_round();
    }

    pub fn is_computer_turn(&self) -> bool {
        self.config.mode == GameMode::VsComputer
            && self.is_active
            && self.current_player == COMPUTER_MARK
    }

    /// Places the mark of the player to move at `index`.
    pub fn play(&mut self, index: usize) -> Result<TurnOutcome, MatchError> {
        if !self.is_active {
            return Err(MatchError::RoundInactive);
        }
        if self.is_computer_turn() {
            return Err(MatchError::ComputerToMove);
        }
        self.apply_move(index)
    }

    /// Lets the computer answer. Returns the chosen cell and the turn outcome.
    pub fn play_computer(&mut self) -> Result<(usize, TurnOutcome), MatchError> {
        if !self.is_computer_turn() {
            return Err(MatchError::NotComputerTurn);
        }

        let selected = self
            .selector
            .select_move(&self.board, COMPUTER_MARK)
            .ok_or(MatchError::NoComputerMove)?;
        if selected >= BOARD_LEN || self.board.get(selected) != Mark::Empty {
            return Err(MatchError::IllegalComputerMove(selected));
        }

        let outcome = self.apply_move(selected)?;
        Ok((selected, outcome))
    }

    pub fn analysis(&self) -> Analysis {
        let tip = advise(&self.board, self.current_player, self.is_active);
        Analysis {
            odds: WinOdds::for_board(&self.board),
            message: tip.message(),
            tip,
        }
    }

    pub fn to_game_state(&self) -> GameState {
        GameState {
            board: self.board.cells().to_vec(),
            current_player: self.current_player,
            mode: self.config.mode,
            is_active: self.is_active,
            status: self.status_line(),
            moves: self
                .moves
                .iter()
                .enumerate()
                .map(|(i, record)| {
                    let coord = index_to_coord(record.index);
                    MoveEntry {
                        player: record.player,
                        index: record.index,
                        label: format!("{}. {} → {}", i + 1, record.player, coord),
                        coord,
                    }
                })
                .collect(),
            scores: self.scores,
            outcome: self.outcome,
        }
    }

    fn status_line(&self) -> String {
        match self.outcome {
            Some(RoundOutcome::Win { winner, .. }) => format!("Player {winner} wins!"),
            Some(RoundOutcome::Draw) => "It's a draw!".to_string(),
            None => format!("Player {}'s turn", self.current_player),
        }
    }

    fn apply_move(&mut self, index: usize) -> Result<TurnOutcome, MatchError> {
        if index >= BOARD_LEN {
            return Err(MatchError::CellOutOfRange(index));
        }
        if self.board.get(index) != Mark::Empty {
            return Err(MatchError::CellOccupied(index));
        }

        let player = self.current_player;
        self.board.set(index, player);
        self.moves.push(MoveRecord { player, index });
        debug!(%player, cell = %index_to_coord(index), "move played");

        if let Some((winner, line)) = self.board.winning_line() {
            return Ok(self.end_round(RoundOutcome::Win { winner, line }));
        }
        if self.board.is_full() {
            return Ok(self.end_round(RoundOutcome::Draw));
        }

        self.current_player = player.opponent();
        Ok(TurnOutcome::Continue {
            next: self.current_player,
        })
    }

    fn end_round(&mut self, outcome: RoundOutcome) -> TurnOutcome {
        self.is_active = false;
        match outcome {
            RoundOutcome::Win { winner: Mark::X, .. } => self.scores.x += 1,
            RoundOutcome::Win { winner: Mark::O, .. } => self.scores.o += 1,
            RoundOutcome::Win { winner: Mark::Empty, .. } => {
                unreachable!("empty cells cannot complete a line")
            }
            RoundOutcome::Draw => self.scores.draws += 1,
        }
        self.outcome = Some(outcome);
        info!(?outcome, scores = ?self.scores, "round finished");
        TurnOutcome::Finished(outcome)
    }

    #[cfg(test)]
    fn set_board_for_test(&mut self, board: Board, current_player: Mark) {
        self.board = board;
        self.current_player = current_player;
        self.is_active = true;
        self.outcome = None;
        self.moves.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::advisor::Tip;
    use crate::board::board_from;

    struct FixedMoveSelector {
        mv: usize,
    }

    impl MoveSelector for FixedMoveSelector {
        fn select_move(&self, _board: &Board, _mark: Mark) -> Option<usize> {
            Some(self.mv)
        }
    }

    fn pvp() -> MatchSession {
        MatchSession::with_default_selector(MatchConfig::default()).unwrap()
    }

    fn vs_computer() -> MatchSession {
        let config = MatchConfig {
            mode: GameMode::VsComputer,
            ..MatchConfig::default()
        };
        MatchSession::with_default_selector(config).unwrap()
    }

    #[test]
    fn new_match_starts_active_round_with_x() {
        let session = pvp();
        let state = session.to_game_state();

        assert!(state.is_active);
        assert_eq!(state.current_player, Mark::X);
        assert_eq!(state.status, "Player X's turn");
        assert!(state.board.iter().all(|&cell| cell == Mark::Empty));
        assert!(state.moves.is_empty());
        assert_eq!(state.scores, Scoreboard::default());
        assert_eq!(state.outcome, None);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = MatchConfig {
            computer_reply_delay_ms: 60_000,
            ..MatchConfig::default()
        };

        let err = MatchSession::with_default_selector(config).err();

        assert_eq!(
            err,
            Some(MatchError::Config(ConfigError::ReplyDelayTooLong(60_000)))
        );
    }

    #[test]
    fn moves_alternate_and_are_recorded() {
        let mut session = pvp();

        assert_eq!(session.play(4), Ok(TurnOutcome::Continue { next: Mark::O }));
        assert_eq!(session.play(0), Ok(TurnOutcome::Continue { next: Mark::X }));

        let state = session.to_game_state();
        assert_eq!(state.board[4], Mark::X);
        assert_eq!(state.board[0], Mark::O);
        assert_eq!(state.moves[0].label, "1. X → B2");
        assert_eq!(state.moves[1].label, "2. O → A1");
        assert_eq!(state.moves[1].coord, "A1");
        assert_eq!(
            session.moves(),
            &[
                MoveRecord {
                    player: Mark::X,
                    index: 4
                },
                MoveRecord {
                    player: Mark::O,
                    index: 0
                },
            ]
        );
    }

    #[test]
    fn occupied_and_out_of_range_cells_are_rejected() {
        let mut session = pvp();
        session.play(4).unwrap();

        assert_eq!(session.play(4), Err(MatchError::CellOccupied(4)));
        assert_eq!(session.play(9), Err(MatchError::CellOutOfRange(9)));
        assert_eq!(session.current_player(), Mark::O);
        assert_eq!(session.moves().len(), 1);
    }

    #[test]
    fn completed_line_ends_round_and_scores_winner() {
        let mut session = pvp();
        for idx in [0, 3, 1, 4] {
            session.play(idx).unwrap();
        }

        let outcome = session.play(2).unwrap();

        assert_eq!(
            outcome,
            TurnOutcome::Finished(RoundOutcome::Win {
                winner: Mark::X,
                line: [0, 1, 2]
            })
        );
        assert!(!session.is_active());
        assert_eq!(
            session.scores(),
            Scoreboard {
                x: 1,
                o: 0,
                draws: 0
            }
        );
        assert_eq!(session.to_game_state().status, "Player X wins!");
        assert_eq!(session.play(5), Err(MatchError::RoundInactive));
    }

    #[test]
    fn full_board_without_line_is_a_draw() {
        let mut session = pvp();
        // X O X / X O O / O X X
        for idx in [0, 1, 2, 4, 3, 5, 7, 6, 8] {
            session.play(idx).unwrap();
        }

        assert_eq!(session.to_game_state().outcome, Some(RoundOutcome::Draw));
        assert_eq!(
            session.scores(),
            Scoreboard {
                x: 0,
                o: 0,
                draws: 1
            }
        );
        assert_eq!(session.to_game_state().status, "It's a draw!");
    }

    #[test]
    fn next_round_keeps_scores_and_reset_clears_them() {
        let mut session = pvp();
        for idx in [0, 3, 1, 4, 2] {
            session.play(idx).unwrap();
        }

        session.start_next_round();
        assert!(session.is_active());
        assert!(session.moves().is_empty());
        assert_eq!(session.scores().x, 1);

        session.reset_match();
        assert_eq!(session.scores(), Scoreboard::default());
        assert!(session.is_active());
    }

    #[test]
    fn start_game_switches_mode_and_keeps_scores() {
        let mut session = pvp();
        for idx in [0, 3, 1, 4, 2] {
            session.play(idx).unwrap();
        }
        assert_eq!(session.scores().x, 1);

        session.start_game(GameMode::VsComputer);

        assert_eq!(session.mode(), GameMode::VsComputer);
        assert_eq!(*session.board(), Board::new());
        assert!(session.is_active());
        assert_eq!(session.current_player(), Mark::X);
        assert_eq!(session.to_game_state().outcome, None);
        assert_eq!(
            session.scores(),
            Scoreboard {
                x: 1,
                o: 0,
                draws: 0
            }
        );
    }

    #[test]
    fn computer_replies_only_on_its_turn() {
        let mut session = vs_computer();

        assert_eq!(session.play_computer(), Err(MatchError::NotComputerTurn));
        session.play(4).unwrap();
        assert!(session.is_computer_turn());
        assert_eq!(session.play(0), Err(MatchError::ComputerToMove));

        let (cell, outcome) = session.play_computer().unwrap();

        assert_eq!(cell, 0);
        assert_eq!(outcome, TurnOutcome::Continue { next: Mark::X });
        assert_eq!(session.board().get(0), Mark::O);
    }

    #[test]
    fn pvp_mode_never_hands_turn_to_computer() {
        let mut session = pvp();
        session.play(4).unwrap();

        assert!(!session.is_computer_turn());
        assert_eq!(session.play_computer(), Err(MatchError::NotComputerTurn));
    }

    #[test]
    fn computer_blocks_and_never_loses() {
        let mut session = vs_computer();
        // X tries the top row; the computer must stop it every time.
        for idx in [0, 1, 2, 3, 5, 6, 7, 8] {
            if !session.is_active() {
                break;
            }
            if session.board().get(idx) != Mark::Empty {
                continue;
            }
            session.play(idx).unwrap();
            if session.is_computer_turn() {
                session.play_computer().unwrap();
            }
        }

        assert_eq!(session.scores().x, 0);
    }

    #[test]
    fn illegal_selector_move_is_rejected() {
        let config = MatchConfig {
            mode: GameMode::VsComputer,
            ..MatchConfig::default()
        };
        let mut session = MatchSession::new(config, Box::new(FixedMoveSelector { mv: 4 })).unwrap();
        session.play(4).unwrap();

        assert_eq!(session.play_computer(), Err(MatchError::IllegalComputerMove(4)));
    }

    #[test]
    fn computer_move_can_finish_round() {
        let config = MatchConfig {
            mode: GameMode::VsComputer,
            ..MatchConfig::default()
        };
        let mut session = MatchSession::new(config, Box::new(FixedMoveSelector { mv: 5 })).unwrap();
        session.set_board_for_test(board_from("XX. OO. X.."), Mark::O);

        let (cell, outcome) = session.play_computer().unwrap();

        assert_eq!(cell, 5);
        assert_eq!(
            outcome,
            TurnOutcome::Finished(RoundOutcome::Win {
                winner: Mark::O,
                line: [3, 4, 5]
            })
        );
        assert_eq!(session.scores().o, 1);
    }

    #[test]
    fn analysis_tracks_board_and_turn() {
        let mut session = pvp();
        let opening = session.analysis();
        assert_eq!(opening.tip, Tip::Opening);
        assert_eq!(
            opening.odds,
            WinOdds {
                x: 35,
                o: 35,
                draw: 30
            }
        );

        session.play(4).unwrap();
        let after_center = session.analysis();
        assert_eq!(after_center.tip, Tip::General);
        assert_eq!(
            after_center.odds,
            WinOdds {
                x: 43,
                o: 31,
                draw: 26
            }
        );

        session.set_board_for_test(board_from("XX. .OX .O."), Mark::O);
        let analysis = session.analysis();
        assert_eq!(
            analysis.tip,
            Tip::Block {
                opponent: Mark::X,
                index: 2
            }
        );
        assert_eq!(analysis.message, analysis.tip.message());
    }

    #[test]
    fn analysis_after_round_end_reports_round_over() {
        let mut session = pvp();
        for idx in [0, 3, 1, 4, 2] {
            session.play(idx).unwrap();
        }

        let analysis = session.analysis();

        assert_eq!(analysis.tip, Tip::RoundOver);
        assert_eq!(
            analysis.odds,
            WinOdds {
                x: 85,
                o: 10,
                draw: 5
            }
        );
    }

    #[test]
    fn analysis_scores_from_computer_side_on_x_turn() {
        // X to move would win at 2, but the odds search with O to move.
        let mut session = pvp();
        session.set_board_for_test(board_from("XX. OO. ..."), Mark::X);

        let analysis = session.analysis();

        assert_eq!(
            analysis.odds,
            WinOdds {
                x: 10,
                o: 85,
                draw: 5
            }
        );
        assert_eq!(
            analysis.tip,
            Tip::Block {
                opponent: Mark::O,
                index: 5
            }
        );
        assert_eq!(session.current_player(), Mark::X);
    }
}
