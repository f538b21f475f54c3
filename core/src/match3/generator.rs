use ndarray::Array2;
use rand::Rng;

use crate::*;

/// Draws per cell before accepting a color that completes a run.
pub const MAX_COLOR_ATTEMPTS: usize = 10;

/// Whole-board regenerations before falling back to re-rolling matched tiles.
pub const MAX_BOARD_ATTEMPTS: usize = 100;

/// Random board with no run of three, best effort.
///
/// Each cell avoids completing a run with the two cells before it in its row and column. Boards
/// that still contain a run are regenerated; after `MAX_BOARD_ATTEMPTS` the tiles of the remaining
/// runs are re-rolled once, which is not re-checked, so a run can survive in that rare case.
pub fn generate_board<R: Rng + ?Sized>(size: BoardSize, rng: &mut R) -> TileBoard {
    let mut board = fill_board(size, rng);

    for attempt in 1..MAX_BOARD_ATTEMPTS {
        if !has_matches(&board) {
            return board;
        }
        log::trace!("Generated board has matches, retrying (attempt {})", attempt);
        board = fill_board(size, rng);
    }

    let runs = find_matches(&board);
    if !runs.is_empty() {
        log::warn!(
            "Board still had {} runs after {} attempts, re-rolling matched tiles",
            runs.len(),
            MAX_BOARD_ATTEMPTS
        );
        for run in runs {
            for coords in run.cells() {
                board[coords.to_nd_index()] = Some(TileColor::random(rng));
            }
        }
    }

    board
}

fn fill_board<R: Rng + ?Sized>(size: BoardSize, rng: &mut R) -> TileBoard {
    let mut board: TileBoard = Array2::default(size.bounds().to_nd_index());

    for coords in size.cells() {
        let mut color = TileColor::random(rng);
        for _ in 1..MAX_COLOR_ATTEMPTS {
            if !completes_run(&board, coords, color) {
                break;
            }
            color = TileColor::random(rng);
        }
        board[coords.to_nd_index()] = Some(color);
    }

    board
}

/// Whether `color` at `coords` would match the two cells to its left or the two above it.
fn completes_run(board: &TileBoard, (row, col): Coord2, color: TileColor) -> bool {
    let same = |r: Coord, c: Coord| board[(r, c).to_nd_index()] == Some(color);

    let in_row = col >= 2 && same(row, col - 1) && same(row, col - 2);
    let in_col = row >= 2 && same(row - 1, col) && same(row - 2, col);
    in_row || in_col
}
