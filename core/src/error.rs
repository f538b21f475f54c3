use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board dimensions must be positive")]
    InvalidSize,
    #[error("Board is too small for this game")]
    BoardTooSmall,
    #[error("Board needs an even number of cells")]
    OddCellCount,
    #[error("Winning run length must be positive")]
    InvalidTarget,
    #[error("Cell is already occupied")]
    CellOccupied,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("It is not this side's turn")]
    WrongTurn,
    #[error("Tiles are not adjacent")]
    NotAdjacent,
    #[error("Swap does not create a match")]
    NoMatch,
    #[error("Cell is empty")]
    EmptyCell,
    #[error("Card is already face up")]
    AlreadyFlipped,
    #[error("Card pair is already matched")]
    AlreadyMatched,
    #[error("Two cards are already face up")]
    TooManyFlipped,
    #[error("Cannot reverse into the snake's own body")]
    ReversedDirection,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Saved game could not be decoded")]
    InvalidSave,
}

pub type Result<T> = core::result::Result<T, GameError>;
