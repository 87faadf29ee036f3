use std::fmt;

use serde::Serialize;

/// A player colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Sign applied to heuristic terms: negative favours White, positive favours Black.
    pub fn sign(self) -> f32 {
        match self {
            Self::White => -1.0,
            Self::Black => 1.0,
        }
    }
}

/// What sits on a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Occupant {
    #[default]
    Empty,
    White,
    Black,
    Neutral,
}

impl Occupant {
    pub fn is_empty(self) -> bool {
        self == Self::Empty
    }

    /// Wire code used by the browser front end: 0=empty, 1=white, 2=black, 3=neutral.
    pub fn code(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::White => 1,
            Self::Black => 2,
            Self::Neutral => 3,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Self::Empty => '.',
            Self::White => 'W',
            Self::Black => 'B',
            Self::Neutral => 'N',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '.' => Some(Self::Empty),
            'W' => Some(Self::White),
            'B' => Some(Self::Black),
            'N' => Some(Self::Neutral),
            _ => None,
        }
    }
}

impl From<Color> for Occupant {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Self::White,
            Color::Black => Self::Black,
        }
    }
}

/// A board coordinate. `x` is the column, `y` the row; row 0 is Black's home row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Coord {
    pub x: u8,
    pub y: u8,
}

impl Coord {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// One half of a turn: a single piece sliding from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SubMove {
    pub from: Coord,
    pub to: Coord,
}

impl SubMove {
    pub const fn new(from: Coord, to: Coord) -> Self {
        Self { from, to }
    }

    pub fn reversed(self) -> Self {
        Self {
            from: self.to,
            to: self.from,
        }
    }
}

/// A full turn: the neutral piece moves first, then one of the mover's own pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Move {
    pub neutral: SubMove,
    pub piece: SubMove,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "N{}->{} P{}->{}",
            self.neutral.from, self.neutral.to, self.piece.from, self.piece.to
        )
    }
}

/// Public game state returned to the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    pub width: u8,
    pub height: u8,
    /// Row-major cell codes, see [`Occupant::code`].
    pub cells: Vec<u8>,
    pub highlighted: Vec<Coord>,
    pub selected: Option<Coord>,
    pub active_color: Color,
    pub phase: crate::turn::Phase,
    pub difficulty: u8,
    pub ai_enabled: bool,
    pub is_game_over: bool,
    pub winner: Option<Color>,
}

/// Terminal status read back after any state-mutating call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GameResult {
    pub finished: bool,
    pub winner: Option<Color>,
    /// Static evaluation from the active colour's perspective.
    /// Positive favours Black, negative favours White.
    pub score: f32,
}
