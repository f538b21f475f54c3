use alloc::vec::Vec;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::*;

/// Tactical value of a candidate cell for the computer, strongest last.
///
/// The ladder is strict: blocking an immediate player win always beats building a three, and so on
/// down. Only the single move is looked at, there is no search beyond it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MovePriority {
    Fallback,
    BlockPair,
    MakePair,
    BlockThree,
    MakeThree,
    BlockWin,
    Win,
}

impl MovePriority {
    pub const fn score(self) -> u16 {
        match self {
            Self::Fallback => 100,
            Self::BlockPair => 500,
            Self::MakePair => 600,
            Self::BlockThree => 700,
            Self::MakeThree => 800,
            Self::BlockWin => 900,
            Self::Win => 1000,
        }
    }
}

/// Rates an empty cell by the runs either side would get by playing there.
pub fn score_move(board: &MarkBoard<CaroPlayer>, coords: Coord2) -> MovePriority {
    use MovePriority::*;

    let own = longest_run_through(board, coords, CaroPlayer::Computer);
    let theirs = longest_run_through(board, coords, CaroPlayer::Player);

    if own >= 4 {
        Win
    } else if theirs >= 4 {
        BlockWin
    } else if own >= 3 {
        MakeThree
    } else if theirs >= 3 {
        BlockThree
    } else if own >= 2 {
        MakePair
    } else if theirs >= 2 {
        BlockPair
    } else {
        Fallback
    }
}

/// Picks the computer's move, breaking ties uniformly at random. `None` only when the board is full.
pub fn select_move<R: Rng + ?Sized>(
    board: &MarkBoard<CaroPlayer>,
    rng: &mut R,
) -> Option<Coord2> {
    let mut best = Vec::new();
    let mut best_priority = MovePriority::Fallback;

    for coords in empty_cells(board) {
        let priority = score_move(board, coords);
        if best.is_empty() || priority > best_priority {
            best.clear();
            best_priority = priority;
            best.push(coords);
        } else if priority == best_priority {
            best.push(coords);
        }
    }

    let choice = best.choose(rng).copied();
    log::trace!(
        "AI picked {:?} with score {} among {} candidates",
        choice,
        best_priority.score(),
        best.len()
    );
    choice
}
