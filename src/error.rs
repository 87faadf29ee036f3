/// Failures reported by the game session and by board construction.
///
/// Move application and search signal failure through plain values
/// (`bool`, empty move lists, `None`).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GameError {
    #[error("game is already over")]
    GameOver,

    #[error("board dimensions {width}x{height} are not supported")]
    InvalidDimensions { width: u8, height: u8 },

    #[error("unknown cell symbol {0:?}")]
    InvalidSymbol(char),

    /// A board needs exactly one neutral piece.
    #[error("board has {0} neutral pieces")]
    NeutralCount(usize),

    #[error("position out of bounds: ({x},{y})")]
    OutOfBounds { x: u8, y: u8 },

    /// The cell does not hold the piece the current phase must move.
    #[error("piece at ({x},{y}) cannot be moved in this phase")]
    WrongPiece { x: u8, y: u8 },

    #[error("no piece selected")]
    NothingSelected,

    #[error("illegal move")]
    IllegalMove,

    #[error("it is not AI's turn")]
    NotAiTurn,

    #[error("no legal moves")]
    NoLegalMoves,

    #[error("AI selected an illegal move")]
    AiIllegalMove,
}
