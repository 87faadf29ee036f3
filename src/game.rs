use log::{info, trace};
use web_time::Instant;

use crate::ai::eval::evaluation;
use crate::ai::search::Searcher;
use crate::board::Board;
use crate::error::GameError;
use crate::level::Difficulty;
use crate::movegen::{has_piece_move, legal_full_moves};
use crate::turn::{Phase, TurnState};
use crate::types::{Color, Coord, GameResult, GameState, Move, Occupant, SubMove};

/// Chooses the AI's full move.
pub trait MoveSelector: Send {
    fn select_move(
        &mut self,
        board: &Board,
        color: Color,
        difficulty: Difficulty,
    ) -> Option<Move>;
}

impl MoveSelector for Searcher {
    fn select_move(
        &mut self,
        board: &Board,
        color: Color,
        difficulty: Difficulty,
    ) -> Option<Move> {
        self.set_max_depth(difficulty.depth());
        self.choose_move(board, color)
    }
}

/// One game session: live board, turn state, settings and the AI.
pub struct GameInstance {
    board: Board,
    turn: TurnState,
    difficulty: Difficulty,
    ai_enabled: bool,
    ai_color: Color,
    started: bool,
    selected: Option<Coord>,
    winner: Option<Color>,
    selector: Box<dyn MoveSelector>,
}

impl GameInstance {
    pub fn new(width: u8, height: u8, selector: Box<dyn MoveSelector>) -> Result<Self, GameError> {
        Ok(Self {
            board: Board::new(width, height)?,
            turn: TurnState::new(),
            difficulty: Difficulty::default(),
            ai_enabled: false,
            ai_color: Color::Black,
            started: false,
            selected: None,
            winner: None,
            selector,
        })
    }

    pub fn new_with_default_selector(width: u8, height: u8) -> Result<Self, GameError> {
        Self::new(
            width,
            height,
            Box::new(Searcher::for_difficulty(Difficulty::default())),
        )
    }

    /// Session whose AI tie-breaks are reproducible.
    pub fn with_seed(width: u8, height: u8, seed: u64) -> Result<Self, GameError> {
        let depth = Difficulty::default().depth();
        Self::new(width, height, Box::new(Searcher::with_seed(depth, seed)))
    }

    /// Back to the opening position. Settings are kept.
    pub fn reset(&mut self) {
        self.board = Board::new(self.board.width(), self.board.height())
            .unwrap_or_else(|_| unreachable!("dimensions were validated at construction"));
        self.turn = TurnState::new();
        self.started = false;
        self.selected = None;
        self.winner = None;
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> TurnState {
        self.turn
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn ai_enabled(&self) -> bool {
        self.ai_enabled
    }

    pub fn ai_color(&self) -> Color {
        self.ai_color
    }

    pub fn selected(&self) -> Option<Coord> {
        self.selected
    }

    pub fn is_game_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    /// Accepts 1, 3 or 5 before the first move; anything else keeps the
    /// current difficulty.
    pub fn set_difficulty(&mut self, level: u8) -> bool {
        match Difficulty::from_level(level) {
            Some(difficulty) if !self.started => {
                self.difficulty = difficulty;
                true
            }
            _ => false,
        }
    }

    pub fn cycle_difficulty(&mut self) -> Difficulty {
        self.set_difficulty(self.difficulty.next().level());
        self.difficulty
    }

    /// Only honoured before the first move.
    pub fn set_ai_enabled(&mut self, enabled: bool) -> bool {
        if self.started {
            return false;
        }
        self.ai_enabled = enabled;
        true
    }

    /// Destinations of the piece at `(x, y)`, in direction order.
    pub fn legal_destinations(&self, x: u8, y: u8) -> Result<Vec<Coord>, GameError> {
        let from = self.coord(x, y)?;
        match self.board.occupant(from) {
            Some(Occupant::Empty) | None => Ok(Vec::new()),
            Some(_) => Ok(self.board.reachable(from)),
        }
    }

    /// Full moves for the active colour; empty outside a neutral phase or
    /// after the game ended.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_game_over() || self.turn.phase != Phase::NeutralMove {
            return Vec::new();
        }
        legal_full_moves(&self.board, self.turn.active_color)
    }

    /// Selects the piece the current phase must move and highlights its
    /// destinations.
    pub fn select(&mut self, x: u8, y: u8) -> Result<Vec<Coord>, GameError> {
        if self.is_game_over() {
            return Err(GameError::GameOver);
        }
        let from = self.coord(x, y)?;
        self.ensure_movable(from)?;

        self.selected = Some(from);
        self.board.highlight_reachable(from);
        Ok(self.board.highlighted_cells())
    }

    /// Moves the selected piece to `(x, y)`. The selection is dropped either way.
    pub fn play_selected(&mut self, x: u8, y: u8) -> Result<(), GameError> {
        let from = self.selected.take().ok_or(GameError::NothingSelected)?;
        self.board.clear_highlights();
        let to = self.coord(x, y)?;
        self.play_sub_move(from, to)
    }

    /// Validates and applies one sub-move for the active phase, then advances
    /// the turn and checks for the end of the game.
    pub fn play_sub_move(&mut self, from: Coord, to: Coord) -> Result<(), GameError> {
        if self.is_game_over() {
            return Err(GameError::GameOver);
        }
        self.coord(from.x, from.y)?;
        self.coord(to.x, to.y)?;
        self.ensure_movable(from)?;

        if !self.board.apply_move(from, to, true) {
            return Err(GameError::IllegalMove);
        }
        trace!(
            "{:?} {:?}: {from} -> {to}",
            self.turn.active_color, self.turn.phase
        );

        self.selected = None;
        self.board.clear_highlights();
        self.started = true;
        self.turn.advance();
        self.check_game_over();
        Ok(())
    }

    /// Plays a full move for the active colour, starting at its neutral phase.
    pub fn play_move(&mut self, mv: Move) -> Result<(), GameError> {
        if self.is_game_over() {
            return Err(GameError::GameOver);
        }
        if !self.legal_moves().contains(&mv) {
            return Err(GameError::IllegalMove);
        }
        self.apply_turn(mv)
    }

    pub fn advance_turn(&mut self) {
        self.turn.advance();
    }

    /// Lets the AI play its full move.
    ///
    /// Returns `Ok(None)` when the AI has no complete move; the game then ends
    /// with the opponent as winner.
    pub fn ai_move(&mut self) -> Result<Option<Move>, GameError> {
        if self.is_game_over() {
            return Err(GameError::GameOver);
        }
        if !self.ai_enabled
            || self.turn.active_color != self.ai_color
            || self.turn.phase != Phase::NeutralMove
        {
            return Err(GameError::NotAiTurn);
        }

        let legal = self.legal_moves();
        if legal.is_empty() {
            info!("AI {:?} has no legal move", self.ai_color);
            self.declare_winner(self.ai_color.opponent());
            return Ok(None);
        }

        let start = Instant::now();
        let selected = self
            .selector
            .select_move(&self.board, self.ai_color, self.difficulty)
            .ok_or(GameError::NoLegalMoves)?;
        if !legal.contains(&selected) {
            return Err(GameError::AiIllegalMove);
        }
        info!(
            "AI {:?} plays {selected} after {} ms",
            self.ai_color,
            start.elapsed().as_millis()
        );

        self.apply_turn(selected)?;
        Ok(Some(selected))
    }

    /// Terminal status; the score is the static evaluation for the active colour.
    pub fn to_game_result(&self) -> GameResult {
        GameResult {
            finished: self.is_game_over(),
            winner: self.winner,
            score: evaluation(&self.board, self.turn.active_color).score,
        }
    }

    pub fn to_game_state(&self) -> GameState {
        GameState {
            width: self.board.width(),
            height: self.board.height(),
            cells: self.board.to_codes(),
            highlighted: self.board.highlighted_cells(),
            selected: self.selected,
            active_color: self.turn.active_color,
            phase: self.turn.phase,
            difficulty: self.difficulty.level(),
            ai_enabled: self.ai_enabled,
            is_game_over: self.is_game_over(),
            winner: self.winner,
        }
    }

    fn apply_turn(&mut self, mv: Move) -> Result<(), GameError> {
        for SubMove { from, to } in [mv.neutral, mv.piece] {
            self.play_sub_move(from, to)?;
            if self.is_game_over() {
                break;
            }
        }
        Ok(())
    }

    /// Neutral on a home row wins for that row's attacker. A colour that must
    /// move an immobile neutral, or has no piece move left, loses.
    fn check_game_over(&mut self) -> Option<Color> {
        if self.winner.is_some() {
            return self.winner;
        }

        let neutral = self.board.neutral();
        let active = self.turn.active_color;
        let winner = if neutral.y == self.board.target_row(Color::Black) {
            Some(Color::Black)
        } else if neutral.y == self.board.target_row(Color::White) {
            Some(Color::White)
        } else {
            match self.turn.phase {
                Phase::NeutralMove if !self.board.neutral_is_mobile() => Some(active.opponent()),
                Phase::PieceMove if !has_piece_move(&self.board, active) => {
                    Some(active.opponent())
                }
                _ => None,
            }
        };

        if let Some(color) = winner {
            self.declare_winner(color);
        }
        winner
    }

    fn declare_winner(&mut self, color: Color) {
        self.winner = Some(color);
        self.board.mark_finished();
        info!("{color:?} wins\n{}", self.board);
    }

    fn ensure_movable(&self, from: Coord) -> Result<(), GameError> {
        let expected = match self.turn.phase {
            Phase::NeutralMove => Occupant::Neutral,
            Phase::PieceMove => Occupant::from(self.turn.active_color),
        };
        if self.board.occupant(from) == Some(expected) {
            Ok(())
        } else {
            Err(GameError::WrongPiece {
                x: from.x,
                y: from.y,
            })
        }
    }

    fn coord(&self, x: u8, y: u8) -> Result<Coord, GameError> {
        let coord = Coord::new(x, y);
        if self.board.contains(coord) {
            Ok(coord)
        } else {
            Err(GameError::OutOfBounds { x, y })
        }
    }

    #[cfg(test)]
    pub(crate) fn set_board_for_test(&mut self, board: Board, turn: TurnState) {
        self.board = board;
        self.board.clear_finished();
        self.turn = turn;
        self.started = false;
        self.selected = None;
        self.winner = None;
    }
}
