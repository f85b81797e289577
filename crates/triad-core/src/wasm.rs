//! WebAssembly bindings for the Triad Arena engine.
//!
//! Exposes the engine to JavaScript through wasm-bindgen so a browser client
//! can run the same rules the host runs.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use crate::actions::{GameEvent, Move};
#[cfg(feature = "wasm")]
use crate::board::{Position, Seat};
#[cfg(feature = "wasm")]
use crate::bot::{Bot, BotDifficulty};
#[cfg(feature = "wasm")]
use crate::config::MatchConfig;
#[cfg(feature = "wasm")]
use crate::game::{GameState, GameStateJson, Transition};

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// What a move hands back to JavaScript
#[cfg(feature = "wasm")]
#[derive(serde::Serialize)]
struct MoveResult<'a> {
    captures: &'a [Position],
    events: &'a [GameEvent],
}

/// WASM-exposed game wrapper
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub struct WasmGame {
    state: GameState,
}

#[cfg(feature = "wasm")]
impl WasmGame {
    fn seat(&self, player: &str) -> Result<Seat, JsValue> {
        self.state
            .seat_of(player)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown player: {}", player)))
    }

    fn commit(&mut self, transitions: Vec<Transition>) -> String {
        let captures: Vec<Position> = transitions.iter().flat_map(|t| t.captures.clone()).collect();
        let events: Vec<GameEvent> = transitions.iter().flat_map(|t| t.events.clone()).collect();
        if let Some(last) = transitions.into_iter().last() {
            self.state = last.state;
        }
        let result = MoveResult {
            captures: &captures,
            events: &events,
        };
        serde_json::to_string(&result).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
impl WasmGame {
    /// Create a new match. A seed of 0 picks one at random.
    #[wasm_bindgen(constructor)]
    pub fn new(player1: &str, player2: &str, seed: u32) -> WasmGame {
        let config = MatchConfig {
            seed: (seed != 0).then_some(u64::from(seed)),
            ..MatchConfig::default()
        };
        WasmGame {
            state: GameState::new(player1, player2, &config),
        }
    }

    /// Restore a match from a state previously returned by `getState`
    #[wasm_bindgen(js_name = fromState)]
    pub fn from_state(state_json: &str) -> Result<WasmGame, JsValue> {
        let state: GameState = serde_json::from_str(state_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid state JSON: {}", e)))?;
        Ok(WasmGame { state })
    }

    /// Get the current game state as JSON
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        serde_json::to_string(&GameStateJson::from(&self.state))
            .unwrap_or_else(|_| "{}".to_string())
    }

    /// Name of the player whose turn it is
    #[wasm_bindgen(js_name = getCurrentPlayer)]
    pub fn get_current_player(&self) -> String {
        self.state.player(self.state.current_turn).name.clone()
    }

    /// Get valid moves for a player as JSON array
    #[wasm_bindgen(js_name = getValidMoves)]
    pub fn get_valid_moves(&self, player: &str) -> Result<String, JsValue> {
        let seat = self.seat(player)?;
        let moves = self.state.valid_moves(seat);
        Ok(serde_json::to_string(&moves).unwrap_or_else(|_| "[]".to_string()))
    }

    /// Apply a move from JSON, returns captures and events JSON or error
    #[wasm_bindgen(js_name = applyMove)]
    pub fn apply_move(&mut self, player: &str, move_json: &str) -> Result<String, JsValue> {
        let seat = self.seat(player)?;
        let mv: Move = serde_json::from_str(move_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid move JSON: {}", e)))?;

        let transition = self
            .state
            .apply_move(seat, mv)
            .map_err(|e| JsValue::from_str(&format!("Move failed: {}", e)))?;
        Ok(self.commit(vec![transition]))
    }

    /// Let the Computer play its turn.
    /// difficulty: "Easy", "Medium", or "Hard"
    #[wasm_bindgen(js_name = computerTurn)]
    pub fn computer_turn(&mut self, difficulty: &str) -> Result<String, JsValue> {
        let difficulty = difficulty.parse().unwrap_or(BotDifficulty::Medium);
        let mut bot = Bot::new(difficulty);
        let transitions = self
            .state
            .computer_turn(&mut bot)
            .map_err(|e| JsValue::from_str(&format!("Computer turn failed: {}", e)))?;
        Ok(self.commit(transitions))
    }

    /// Check if the game is finished
    #[wasm_bindgen(js_name = isFinished)]
    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Get the winner's name (if the game is finished and not tied)
    #[wasm_bindgen(js_name = getWinner)]
    pub fn get_winner(&self) -> Option<String> {
        self.state
            .winner()
            .map(|seat| self.state.player(seat).name.clone())
    }

    /// Owned character counts, final once the game is over
    #[wasm_bindgen(js_name = getScores)]
    pub fn get_scores(&self) -> String {
        let scores = self.state.final_scores.unwrap_or_else(|| self.state.current_scores());
        serde_json::to_string(&scores).unwrap_or_else(|_| "{}".to_string())
    }
}

