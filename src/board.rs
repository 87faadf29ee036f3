use std::fmt;

use crate::error::GameError;
use crate::types::{Color, Coord, Move, Occupant, SubMove};

pub const STANDARD_SIZE: u8 = 5;
const PIECES_PER_SIDE: u8 = 5;
const MIN_HEIGHT: u8 = 3;
const MAX_DIMENSION: u8 = 32;

/// Sliding directions. `North` points towards row 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthWest,
    NorthEast,
    SouthEast,
    SouthWest,
}

impl Direction {
    /// Enumeration order used everywhere a piece's destinations are listed.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::NorthWest,
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    /// `(dx, dy)` step.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
            Direction::NorthEast => (1, -1),
            Direction::SouthEast => (1, 1),
            Direction::SouthWest => (-1, 1),
        }
    }
}

/// One grid cell. `highlighted` is scratch state for the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    pub occupant: Occupant,
    pub highlighted: bool,
}

/// Neutron board.
///
/// Row 0 is Black's home row, row `height - 1` is White's. Cells are stored
/// row-major but every scan that feeds move enumeration walks column-major
/// (x outer, y inner) so that enumeration order is stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: u8,
    height: u8,
    cells: Vec<Cell>,
    finished: bool,
}

impl Board {
    /// Creates the initial layout: Black on row 0, White on the last row,
    /// neutral in the centre.
    pub fn new(width: u8, height: u8) -> Result<Self, GameError> {
        Ok(Self::empty(width, height)?.with_initial_layout())
    }

    /// The 5x5 starting position.
    pub fn standard() -> Self {
        Self {
            width: STANDARD_SIZE,
            height: STANDARD_SIZE,
            cells: vec![Cell::default(); STANDARD_SIZE as usize * STANDARD_SIZE as usize],
            finished: false,
        }
        .with_initial_layout()
    }

    fn with_initial_layout(mut self) -> Self {
        let (width, height) = (self.width, self.height);
        for x in 0..PIECES_PER_SIDE {
            self.set_occupant(Coord::new(x, 0), Occupant::Black);
            self.set_occupant(Coord::new(x, height - 1), Occupant::White);
        }
        self.set_occupant(Coord::new(width / 2, height / 2), Occupant::Neutral);
        self
    }

    /// A board with no pieces on it.
    pub fn empty(width: u8, height: u8) -> Result<Self, GameError> {
        if !(PIECES_PER_SIDE..=MAX_DIMENSION).contains(&width)
            || !(MIN_HEIGHT..=MAX_DIMENSION).contains(&height)
        {
            return Err(GameError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
            finished: false,
        })
    }

    /// Parses the [`fmt::Display`] format: one line per row starting at row 0,
    /// `W`, `B`, `N` or `.` per cell, whitespace ignored. Exactly one `N` is
    /// required.
    pub fn from_rows(rows: &[&str]) -> Result<Self, GameError> {
        let parsed = rows
            .iter()
            .map(|row| {
                row.chars()
                    .filter(|c| !c.is_whitespace())
                    .map(|c| Occupant::from_symbol(c).ok_or(GameError::InvalidSymbol(c)))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let neutrals = parsed
            .iter()
            .flatten()
            .filter(|&&occupant| occupant == Occupant::Neutral)
            .count();
        if neutrals != 1 {
            return Err(GameError::NeutralCount(neutrals));
        }

        let height = u8::try_from(parsed.len()).unwrap_or(u8::MAX);
        let width = parsed
            .first()
            .map_or(0, |row| u8::try_from(row.len()).unwrap_or(u8::MAX));
        if parsed.iter().any(|row| row.len() != width as usize) {
            return Err(GameError::InvalidDimensions { width, height });
        }

        let mut board = Self::empty(width, height)?;
        for (y, row) in parsed.iter().enumerate() {
            for (x, &occupant) in row.iter().enumerate() {
                board.set_occupant(Coord::new(x as u8, y as u8), occupant);
            }
        }
        Ok(board)
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Set once an evaluation found a terminal position.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub(crate) fn mark_finished(&mut self) {
        self.finished = true;
    }

    pub(crate) fn clear_finished(&mut self) {
        self.finished = false;
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        (0..self.width as i32).contains(&x) && (0..self.height as i32).contains(&y)
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// Occupant at `coord`, `None` when off the board.
    pub fn occupant(&self, coord: Coord) -> Option<Occupant> {
        self.contains(coord)
            .then(|| self.cells[self.index(coord)].occupant)
    }

    pub fn cell(&self, coord: Coord) -> Option<&Cell> {
        self.contains(coord).then(|| &self.cells[self.index(coord)])
    }

    /// Places `occupant` at `coord`. Off-board coordinates are ignored.
    pub fn set_occupant(&mut self, coord: Coord, occupant: Occupant) {
        if self.contains(coord) {
            let idx = self.index(coord);
            self.cells[idx].occupant = occupant;
        }
    }

    /// Row the neutral must reach for `color` to win.
    pub fn target_row(&self, color: Color) -> u8 {
        match color {
            Color::Black => 0,
            Color::White => self.height - 1,
        }
    }

    pub fn is_home_row(&self, y: u8) -> bool {
        y == 0 || y == self.height - 1
    }

    /// All cells holding `occupant`, column-major.
    pub fn pieces_of(&self, occupant: Occupant) -> Vec<Coord> {
        let mut out = Vec::new();
        for x in 0..self.width {
            for y in 0..self.height {
                let coord = Coord::new(x, y);
                if self.cells[self.index(coord)].occupant == occupant {
                    out.push(coord);
                }
            }
        }
        out
    }

    /// Position of the neutral piece.
    pub fn neutral(&self) -> Coord {
        self.pieces_of(Occupant::Neutral)
            .first()
            .copied()
            .unwrap_or_else(|| unreachable!("board has no neutral piece"))
    }

    /// Farthest empty cell reachable by sliding from `from` in `direction`.
    /// `None` when the first step is blocked or off the board.
    pub fn slide_destination(&self, from: Coord, direction: Direction) -> Option<Coord> {
        if !self.contains(from) {
            return None;
        }

        let (dx, dy) = direction.delta();
        let mut x = from.x as i32 + dx;
        let mut y = from.y as i32 + dy;
        let mut last = None;

        while self.in_bounds(x, y) {
            let coord = Coord::new(x as u8, y as u8);
            if !self.cells[self.index(coord)].occupant.is_empty() {
                break;
            }
            last = Some(coord);
            x += dx;
            y += dy;
        }

        last
    }

    /// Destinations of the piece at `from`, in [`Direction::ALL`] order.
    pub fn reachable(&self, from: Coord) -> Vec<Coord> {
        Direction::ALL
            .iter()
            .filter_map(|&direction| self.slide_destination(from, direction))
            .collect()
    }

    /// Clears all highlights, then marks every destination of the piece at `from`.
    pub fn highlight_reachable(&mut self, from: Coord) {
        self.clear_highlights();
        for coord in self.reachable(from) {
            let idx = self.index(coord);
            self.cells[idx].highlighted = true;
        }
    }

    /// Highlighted cells, column-major.
    pub fn highlighted_cells(&self) -> Vec<Coord> {
        let mut out = Vec::new();
        for x in 0..self.width {
            for y in 0..self.height {
                let coord = Coord::new(x, y);
                if self.cells[self.index(coord)].highlighted {
                    out.push(coord);
                }
            }
        }
        out
    }

    pub fn clear_highlights(&mut self) {
        for cell in &mut self.cells {
            cell.highlighted = false;
        }
    }

    pub fn is_legal_move(&self, from: Coord, to: Coord) -> bool {
        match self.occupant(from) {
            Some(occupant) if !occupant.is_empty() => self.reachable(from).contains(&to),
            _ => false,
        }
    }

    /// Moves the occupant of `from` to `to` and empties `from`.
    ///
    /// With `validate` the move must be legal; an illegal move returns `false`
    /// and leaves the board unchanged. Without it only bounds are checked.
    pub fn apply_move(&mut self, from: Coord, to: Coord, validate: bool) -> bool {
        if !self.contains(from) || !self.contains(to) {
            return false;
        }
        if validate && !self.is_legal_move(from, to) {
            return false;
        }

        let from_idx = self.index(from);
        let to_idx = self.index(to);
        self.cells[to_idx].occupant = self.cells[from_idx].occupant;
        self.cells[from_idx].occupant = Occupant::Empty;
        true
    }

    /// Applies a sub-move that is legal by construction.
    pub fn apply_sub_move(&mut self, sub_move: SubMove) {
        self.apply_move(sub_move.from, sub_move.to, false);
    }

    /// Applies both halves of a generated move without validation.
    pub fn apply_full_move(&mut self, mv: &Move) {
        self.apply_sub_move(mv.neutral);
        self.apply_sub_move(mv.piece);
    }

    /// Undoes [`Board::apply_full_move`].
    pub fn revert_full_move(&mut self, mv: &Move) {
        self.apply_sub_move(mv.piece.reversed());
        self.apply_sub_move(mv.neutral.reversed());
    }

    /// Whether the neutral can still move. A neutral on either home row never can.
    pub fn neutral_is_mobile(&self) -> bool {
        let neutral = self.neutral();
        if self.is_home_row(neutral.y) {
            return false;
        }

        let blocked = Direction::ALL
            .iter()
            .filter(|direction| {
                let (dx, dy) = direction.delta();
                let x = neutral.x as i32 + dx;
                let y = neutral.y as i32 + dy;
                !self.in_bounds(x, y)
                    || !self.cells[self.index(Coord::new(x as u8, y as u8))]
                        .occupant
                        .is_empty()
            })
            .count();

        blocked < Direction::ALL.len()
    }

    /// Row-major occupant codes, see [`Occupant::code`].
    pub fn to_codes(&self) -> Vec<u8> {
        self.cells.iter().map(|cell| cell.occupant.code()).collect()
    }

    fn index(&self, coord: Coord) -> usize {
        coord.y as usize * self.width as usize + coord.x as usize
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                if x > 0 {
                    write!(f, " ")?;
                }
                let occupant = self.cells[self.index(Coord::new(x, y))].occupant;
                write!(f, "{}", occupant.symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
