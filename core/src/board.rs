use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Grid of player marks used by the N-in-a-row games.
pub type MarkBoard<P> = Array2<Option<P>>;

/// Most recent placement on a mark board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastMove<P> {
    pub row: Coord,
    pub col: Coord,
    pub player: P,
}

impl<P> LastMove<P> {
    pub const fn new((row, col): Coord2, player: P) -> Self {
        Self { row, col, player }
    }

    pub const fn coords(&self) -> Coord2 {
        (self.row, self.col)
    }
}

/// In bounds and not yet taken.
pub fn is_valid_move<P>(board: &MarkBoard<P>, coords: Coord2) -> bool {
    let (rows, cols) = board_bounds(board);
    coords.0 < rows && coords.1 < cols && board[coords.to_nd_index()].is_none()
}

pub(crate) fn empty_cells<P>(board: &MarkBoard<P>) -> impl Iterator<Item = Coord2> + '_ {
    board
        .indexed_iter()
        .filter(|(_, cell)| cell.is_none())
        .map(|((row, col), _)| (row as Coord, col as Coord))
}

pub(crate) fn is_full<P>(board: &MarkBoard<P>) -> bool {
    board.iter().all(Option::is_some)
}

pub(crate) fn occupied_count<P>(board: &MarkBoard<P>) -> usize {
    board.iter().filter(|cell| cell.is_some()).count()
}
