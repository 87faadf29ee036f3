//! Static evaluation of Neutron positions.
//!
//! Scores are absolute: positive favours Black, negative favours White,
//! whichever colour is asking. Terminal positions score `±WIN_SCORE`.
//!
//! Weights are calibrated for the 5x5 board. Other heights map each row
//! linearly onto the five-entry row table.

use crate::board::{Board, Direction};
use crate::movegen::has_piece_move;
use crate::types::{Color, Coord, Occupant, SubMove};

pub const WIN_SCORE: f32 = 1000.0;
/// Applied when the opponent can drop the neutral on a home row next turn.
pub const THREAT_SCORE: f32 = -500.0;
pub const CLEAR_FILE_BONUS: f32 = 300.0;
/// Indexed by row, row 0 first; multiplied by [`Color::sign`] of the piece owner.
pub const ROW_WEIGHTS: [f32; 5] = [-5.0, -3.0, 1.0, 3.0, 5.0];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub score: f32,
    pub terminal: bool,
}

impl Evaluation {
    fn terminal(score: f32) -> Self {
        Self {
            score,
            terminal: true,
        }
    }

    fn ongoing(score: f32) -> Self {
        Self {
            score,
            terminal: false,
        }
    }

    /// Winning colour of a terminal evaluation.
    pub fn winner(&self) -> Option<Color> {
        if !self.terminal {
            None
        } else if self.score > 0.0 {
            Some(Color::Black)
        } else {
            Some(Color::White)
        }
    }
}

/// Evaluates `board` for the side about to move and marks it finished when
/// the position is terminal.
pub fn evaluate(board: &mut Board, perspective: Color) -> Evaluation {
    let evaluation = evaluation(board, perspective);
    if evaluation.terminal {
        board.mark_finished();
    }
    evaluation
}

/// Same as [`evaluate`] without recording the terminal flag.
pub fn evaluation(board: &Board, perspective: Color) -> Evaluation {
    let neutral = board.neutral();

    if neutral.y == board.target_row(Color::White) {
        return Evaluation::terminal(-WIN_SCORE);
    }
    if neutral.y == board.target_row(Color::Black) {
        return Evaluation::terminal(WIN_SCORE);
    }

    // The side that must move an immobile neutral loses.
    if !board.neutral_is_mobile() {
        return Evaluation::terminal(-perspective.sign() * WIN_SCORE);
    }

    if can_reach_home_row_next(board, perspective.opponent()) {
        return Evaluation::ongoing(THREAT_SCORE);
    }

    // Open diagonals around the neutral carry no weight.
    let score = piece_rows_score(board) + clear_file_score(board, neutral);
    Evaluation::ongoing(if score.is_finite() { score } else { 0.0 })
}

/// Whether `color` has a full move that puts the neutral on either home row.
fn can_reach_home_row_next(board: &Board, color: Color) -> bool {
    let neutral = board.neutral();
    board
        .reachable(neutral)
        .into_iter()
        .filter(|to| board.is_home_row(to.y))
        .any(|to| {
            let mut after = board.clone();
            after.apply_sub_move(SubMove::new(neutral, to));
            has_piece_move(&after, color)
        })
}

fn row_weight(y: u8, height: u8) -> f32 {
    let last = (ROW_WEIGHTS.len() - 1) as u32;
    let span = (height - 1) as u32;
    let index = (y as u32 * last + span / 2) / span;
    ROW_WEIGHTS[index as usize]
}

fn piece_rows_score(board: &Board) -> f32 {
    [Color::White, Color::Black]
        .into_iter()
        .flat_map(|color| {
            board
                .pieces_of(Occupant::from(color))
                .into_iter()
                .map(move |piece| color.sign() * row_weight(piece.y, board.height()))
        })
        .sum()
}

/// Bonus when the neutral's column is empty all the way to a home row.
fn clear_file_score(board: &Board, neutral: Coord) -> f32 {
    let mut score = 0.0;
    let files = [
        (Direction::South, Color::White),
        (Direction::North, Color::Black),
    ];
    for (direction, color) in files {
        if board
            .slide_destination(neutral, direction)
            .is_some_and(|to| to.y == board.target_row(color))
        {
            score += color.sign() * CLEAR_FILE_BONUS;
        }
    }
    score
}
