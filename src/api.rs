use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::{GameMode, MatchConfig};
use crate::game::MatchSession;

/// Browser handle for one match. The page owns it and drives it from
/// click handlers; every mutating call returns the fresh game state.
#[wasm_bindgen]
pub struct TicTacToe {
    session: MatchSession,
}

#[wasm_bindgen]
impl TicTacToe {
    /// `config` may be `undefined`/`null` or a partial `MatchConfig` object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<TicTacToe, JsError> {
        let config: MatchConfig = if config.is_undefined() || config.is_null() {
            MatchConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(|e| JsError::new(&e.to_string()))?
        };
        let session = MatchSession::with_default_selector(config)?;
        Ok(Self { session })
    }

    #[wasm_bindgen(js_name = startGame)]
    pub fn start_game(&mut self, vs_computer: bool) -> Result<JsValue, JsError> {
        let mode = if vs_computer {
            GameMode::VsComputer
        } else {
            GameMode::PlayerVsPlayer
        };
        self.session.start_game(mode);
        self.state()
    }

    #[wasm_bindgen(js_name = nextRound)]
    pub fn next_round(&mut self) -> Result<JsValue, JsError> {
        self.session.start_next_round();
        self.state()
    }

    #[wasm_bindgen(js_name = resetMatch)]
    pub fn reset_match(&mut self) -> Result<JsValue, JsError> {
        self.session.reset_match();
        self.state()
    }

    pub fn play(&mut self, index: usize) -> Result<JsValue, JsError> {
        self.session.play(index)?;
        self.state()
    }

    #[wasm_bindgen(js_name = isComputerTurn)]
    pub fn is_computer_turn(&self) -> bool {
        self.session.is_computer_turn()
    }

    #[wasm_bindgen(js_name = computerMove)]
    pub fn computer_move(&mut self) -> Result<JsValue, JsError> {
        self.session.play_computer()?;
        self.state()
    }

    #[wasm_bindgen(js_name = computerReplyDelayMs)]
    pub fn computer_reply_delay_ms(&self) -> u32 {
        self.session.config().computer_reply_delay_ms
    }

    pub fn state(&self) -> Result<JsValue, JsError> {
        to_js(&self.session.to_game_state())
    }

    pub fn analysis(&self) -> Result<JsValue, JsError> {
        to_js(&self.session.analysis())
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsError::new(&e.to_string()))
}
