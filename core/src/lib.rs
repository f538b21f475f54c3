#![no_std]

extern crate alloc;

use rand::SeedableRng;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use caro::*;
pub use cursor::*;
pub use error::*;
pub use match3::*;
pub use memory::*;
pub use saved::*;
pub use snake::*;
pub use tictactoe::*;
pub use types::*;

mod board;
mod caro;
mod cursor;
mod error;
mod match3;
mod memory;
mod saved;
mod snake;
mod tictactoe;
mod types;

/// Random source used when callers don't bring their own.
pub type GameRng = rand_chacha::ChaCha8Rng;

/// Reproducible random source, same seed gives the same boards and AI tie-breaks.
pub fn seeded_rng(seed: u64) -> GameRng {
    GameRng::seed_from_u64(seed)
}

/// Board extents shared by every engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSize {
    pub width: Coord,
    pub height: Coord,
}

impl BoardSize {
    pub const fn new_unchecked(width: Coord, height: Coord) -> Self {
        Self { width, height }
    }

    pub fn new(width: Coord, height: Coord) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(GameError::InvalidSize);
        }
        Ok(Self::new_unchecked(width, height))
    }

    pub fn of_board<T>(board: &ndarray::Array2<T>) -> Result<Self> {
        let (rows, cols) = board_bounds(board);
        if usize::from(rows) != board.nrows() || usize::from(cols) != board.ncols() {
            return Err(GameError::InvalidBoardShape);
        }
        Self::new(cols, rows)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.width, self.height)
    }

    /// Bounds in `(rows, cols)` order.
    pub const fn bounds(&self) -> Coord2 {
        (self.height, self.width)
    }

    pub const fn contains(&self, (row, col): Coord2) -> bool {
        row < self.height && col < self.width
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.contains(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    /// Row-major iteration over every cell.
    pub fn cells(&self) -> impl Iterator<Item = Coord2> + use<> {
        let (rows, cols) = self.bounds();
        (0..rows).flat_map(move |row| (0..cols).map(move |col| (row, col)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;
    use rand::Rng;

    #[test]
    fn board_size_rejects_empty_dimensions() {
        assert_eq!(BoardSize::new(0, 4), Err(GameError::InvalidSize));
        assert_eq!(BoardSize::new(4, 0), Err(GameError::InvalidSize));
        assert_eq!(BoardSize::new(5, 4).unwrap().total_cells(), 20);
    }

    #[test]
    fn board_size_validates_coords_as_row_col() {
        let size = BoardSize::new(5, 2).unwrap();

        assert_eq!(size.validate_coords((1, 4)), Ok((1, 4)));
        assert_eq!(size.validate_coords((2, 0)), Err(GameError::InvalidCoords));
        assert_eq!(size.validate_coords((0, 5)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn cells_are_row_major() {
        let size = BoardSize::new(2, 2).unwrap();
        let cells: Vec<_> = size.cells().collect();

        assert_eq!(cells, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let mut a = seeded_rng(7);
        let mut b = seeded_rng(7);

        for _ in 0..16 {
            assert_eq!(a.gen_range(0..1000u32), b.gen_range(0..1000u32));
        }
    }
}
