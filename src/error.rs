use thiserror::Error;

/// Reasons a move could not be produced or applied.
#[derive(Error, Debug)]
pub(crate) enum MoveError {
    #[error("{value} is out of range (expected 0-{max})")]
    OutOfRange { value: i64, max: i64 },

    #[error("cell {0} is already occupied")]
    CellOccupied(usize),

    #[error("no moves available")]
    NoMovesAvailable,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("input stream closed")]
    EndOfInput,
}

impl MoveError {
    /// Whether the same player can simply be asked again.
    pub(crate) fn is_recoverable(&self) -> bool {
        !matches!(self, MoveError::Io(_) | MoveError::EndOfInput)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub(crate) enum ParseBoardError {
    #[error("expected 9 cells, found {0}")]
    WrongCellCount(usize),

    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),

    #[error("{x} X marks and {o} O marks cannot occur in a real game")]
    Unreachable { x: usize, o: usize },
}
