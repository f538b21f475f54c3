use crate::*;

/// Horizontal, vertical, and both diagonals. The opposite half of each axis is walked by negation.
const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Length of the run through `coords` along `axis`, treating `coords` itself as `player`'s mark.
///
/// Only walks outward until the first foreign or empty cell, so the cost is the run length rather
/// than the board size.
pub fn run_length<P: Copy + PartialEq>(
    board: &MarkBoard<P>,
    coords: Coord2,
    player: P,
    axis: (isize, isize),
) -> usize {
    let bounds = board_bounds(board);
    let walk = |delta: (isize, isize)| {
        let mut count = 0;
        let mut cursor = coords;
        while let Some(next) = apply_delta(cursor, delta, bounds) {
            if board[next.to_nd_index()] != Some(player) {
                break;
            }
            count += 1;
            cursor = next;
        }
        count
    };

    1 + walk(axis) + walk((-axis.0, -axis.1))
}

/// Longest run through `coords` over all four axes.
pub fn longest_run_through<P: Copy + PartialEq>(
    board: &MarkBoard<P>,
    coords: Coord2,
    player: P,
) -> usize {
    AXES.iter()
        .map(|&axis| run_length(board, coords, player, axis))
        .max()
        .unwrap_or(1)
}

/// Whether a mark by `player` at `coords` makes a run of at least `target`.
pub fn is_winning_move<P: Copy + PartialEq>(
    board: &MarkBoard<P>,
    coords: Coord2,
    player: P,
    target: u8,
) -> bool {
    longest_run_through(board, coords, player) >= usize::from(target)
}
