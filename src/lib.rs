use wasm_bindgen::prelude::*;

pub mod ai;
pub mod board;
pub mod error;
pub mod game;
pub mod level;
pub mod movegen;
pub mod turn;
pub mod types;
pub mod wasm;

pub use board::Board;
pub use error::GameError;
pub use game::{GameInstance, MoveSelector};
pub use level::Difficulty;
pub use turn::{Phase, TurnState};
pub use types::{Color, Coord, Move, Occupant, SubMove};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
