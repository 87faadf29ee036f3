use serde::Serialize;

use crate::types::Color;

/// Which half of a colour's turn is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Phase {
    NeutralMove,
    PieceMove,
}

/// Active colour plus pending phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TurnState {
    pub active_color: Color,
    pub phase: Phase,
}

impl TurnState {
    /// Opening position: White skips the neutral move on the first turn.
    pub fn new() -> Self {
        Self {
            active_color: Color::White,
            phase: Phase::PieceMove,
        }
    }

    pub fn start_of_turn(color: Color) -> Self {
        Self {
            active_color: color,
            phase: Phase::NeutralMove,
        }
    }

    /// NeutralMove -> PieceMove for the same colour, PieceMove -> NeutralMove for the opponent.
    pub fn advance(&mut self) {
        match self.phase {
            Phase::NeutralMove => self.phase = Phase::PieceMove,
            Phase::PieceMove => {
                self.phase = Phase::NeutralMove;
                self.active_color = self.active_color.opponent();
            }
        }
    }
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_turn_is_white_piece_move() {
        let turn = TurnState::new();

        assert_eq!(turn.active_color, Color::White);
        assert_eq!(turn.phase, Phase::PieceMove);
    }

    #[test]
    fn advance_cycles_through_all_four_stages() {
        let mut turn = TurnState::start_of_turn(Color::White);

        turn.advance();
        assert_eq!(turn, TurnState { active_color: Color::White, phase: Phase::PieceMove });
        turn.advance();
        assert_eq!(turn, TurnState { active_color: Color::Black, phase: Phase::NeutralMove });
        turn.advance();
        assert_eq!(turn, TurnState { active_color: Color::Black, phase: Phase::PieceMove });
        turn.advance();
        assert_eq!(turn, TurnState::start_of_turn(Color::White));
    }

    #[test]
    fn opening_piece_move_hands_over_to_black_neutral() {
        let mut turn = TurnState::new();
        turn.advance();

        assert_eq!(turn, TurnState::start_of_turn(Color::Black));
    }
}
