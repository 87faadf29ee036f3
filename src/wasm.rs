//! Browser bindings. The page owns one [`NeutronGame`] and drives it from
//! click handlers; every call returns plain JS values built with
//! `serde-wasm-bindgen`.

use wasm_bindgen::prelude::*;
use web_time::{SystemTime, UNIX_EPOCH};

use crate::game::GameInstance;
use crate::types::Coord;

#[wasm_bindgen]
pub struct NeutronGame {
    inner: GameInstance,
}

#[wasm_bindgen]
impl NeutronGame {
    #[wasm_bindgen(constructor)]
    pub fn new(width: u8, height: u8) -> Result<NeutronGame, JsError> {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_millis() as u32);
        Self::with_seed(width, height, seed)
    }

    /// Reproducible AI tie-breaks.
    pub fn with_seed(width: u8, height: u8, seed: u32) -> Result<NeutronGame, JsError> {
        Ok(Self {
            inner: GameInstance::with_seed(width, height, u64::from(seed))?,
        })
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.to_game_state())
    }

    pub fn result(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.to_game_result())
    }

    /// Destinations of the piece at `(x, y)` as `[{x, y}, ...]`.
    pub fn legal_destinations(&self, x: u8, y: u8) -> Result<JsValue, JsValue> {
        let destinations = self.inner.legal_destinations(x, y).map_err(js_error)?;
        to_js(&destinations)
    }

    pub fn legal_moves(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.legal_moves())
    }

    /// Selects a piece and returns its highlighted destinations.
    pub fn select(&mut self, x: u8, y: u8) -> Result<JsValue, JsValue> {
        let highlighted = self.inner.select(x, y).map_err(js_error)?;
        to_js(&highlighted)
    }

    pub fn play_selected(&mut self, x: u8, y: u8) -> Result<(), JsError> {
        self.inner.play_selected(x, y)?;
        Ok(())
    }

    pub fn play(&mut self, from_x: u8, from_y: u8, to_x: u8, to_y: u8) -> Result<(), JsError> {
        self.inner
            .play_sub_move(Coord::new(from_x, from_y), Coord::new(to_x, to_y))?;
        Ok(())
    }

    pub fn advance_turn(&mut self) {
        self.inner.advance_turn();
    }

    /// Level 1, 3 or 5. Returns `false` when the value was ignored.
    pub fn set_difficulty(&mut self, level: u8) -> bool {
        self.inner.set_difficulty(level)
    }

    pub fn cycle_difficulty(&mut self) -> u8 {
        self.inner.cycle_difficulty().level()
    }

    pub fn difficulty_label(&self) -> String {
        self.inner.difficulty().label().to_string()
    }

    pub fn set_ai_enabled(&mut self, enabled: bool) -> bool {
        self.inner.set_ai_enabled(enabled)
    }

    /// Runs the AI and returns the move it played, or `undefined` when it had
    /// none and the game ended.
    pub fn ai_move(&mut self) -> Result<JsValue, JsValue> {
        let mv = self.inner.ai_move().map_err(js_error)?;
        to_js(&mv)
    }

    pub fn is_game_over(&self) -> bool {
        self.inner.is_game_over()
    }
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
}

fn js_error(err: crate::error::GameError) -> JsValue {
    JsError::new(&err.to_string()).into()
}
