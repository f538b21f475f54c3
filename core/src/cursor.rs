use serde::{Deserialize, Serialize};

use crate::*;

/// Keyboard-driven selection cursor, kept next to a game state but not part of its rules.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardPosition {
    pub row: Coord,
    pub col: Coord,
}

impl KeyboardPosition {
    pub const fn new((row, col): Coord2) -> Self {
        Self { row, col }
    }

    pub const fn coords(self) -> Coord2 {
        (self.row, self.col)
    }

    /// One step in `direction`, staying put at the board edge.
    pub fn moved(self, direction: Direction, size: BoardSize) -> Self {
        apply_delta(self.coords(), direction.delta(), size.bounds())
            .map(Self::new)
            .unwrap_or(self)
    }

    /// Pulls a cursor restored from storage back onto a possibly smaller board.
    pub fn clamped(self, size: BoardSize) -> Self {
        Self {
            row: self.row.min(size.height.saturating_sub(1)),
            col: self.col.min(size.width.saturating_sub(1)),
        }
    }
}
