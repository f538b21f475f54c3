use alloc::vec::Vec;
use ndarray::{Array2, Axis};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Flat bonus per cascade level, level 0 (the swap itself) gets none.
pub const CASCADE_BONUS: u32 = 5;

/// Shortest run that clears.
pub const MIN_RUN: usize = 3;

pub type TileBoard = Array2<Option<TileColor>>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TileColor {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
}

impl TileColor {
    pub const ALL: [TileColor; 6] = [
        Self::Red,
        Self::Blue,
        Self::Green,
        Self::Yellow,
        Self::Purple,
        Self::Orange,
    ];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunAxis {
    Horizontal,
    Vertical,
}

/// Maximal same-colored run of at least `MIN_RUN` tiles.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRun {
    pub start: Coord2,
    pub length: Coord,
    pub axis: RunAxis,
    pub color: TileColor,
}

impl MatchRun {
    pub fn cells(&self) -> impl Iterator<Item = Coord2> + use<> {
        let (row, col) = self.start;
        let axis = self.axis;
        (0..self.length).map(move |offset| match axis {
            RunAxis::Horizontal => (row, col + offset),
            RunAxis::Vertical => (row + offset, col),
        })
    }

    pub fn score(&self) -> u32 {
        run_score(usize::from(self.length))
    }
}

/// 3 -> 10, 4 -> 20, 5 -> 30, then 10 more for each tile past five.
pub const fn run_score(length: usize) -> u32 {
    match length {
        0..=2 => 0,
        3 => 10,
        4 => 20,
        n => 30 + 10 * (n as u32 - 5),
    }
}

/// Score breakdown of one iteration of the cascade loop.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeLevel {
    pub level: u32,
    pub runs: Vec<MatchRun>,
    pub score: u32,
}

/// Every maximal run in every row and column. A tile can belong to one run of each axis.
pub fn find_matches(board: &TileBoard) -> Vec<MatchRun> {
    let mut runs = Vec::new();

    for (row, line) in board.axis_iter(Axis(0)).enumerate() {
        let horizontal = |offset: usize, length: usize, color| MatchRun {
            start: (row as Coord, offset as Coord),
            length: length as Coord,
            axis: RunAxis::Horizontal,
            color,
        };
        collect_runs(line.iter().copied(), horizontal, &mut runs);
    }

    for (col, line) in board.axis_iter(Axis(1)).enumerate() {
        let vertical = |offset: usize, length: usize, color| MatchRun {
            start: (offset as Coord, col as Coord),
            length: length as Coord,
            axis: RunAxis::Vertical,
            color,
        };
        collect_runs(line.iter().copied(), vertical, &mut runs);
    }

    runs
}

fn collect_runs(
    line: impl Iterator<Item = Option<TileColor>>,
    make_run: impl Fn(usize, usize, TileColor) -> MatchRun,
    runs: &mut Vec<MatchRun>,
) {
    let mut current: Option<(usize, usize, TileColor)> = None;

    for (index, tile) in line.enumerate() {
        current = match (current, tile) {
            (Some((start, length, color)), Some(tile)) if tile == color => {
                Some((start, length + 1, color))
            }
            (previous, tile) => {
                if let Some((start, length, color)) = previous {
                    if length >= MIN_RUN {
                        runs.push(make_run(start, length, color));
                    }
                }
                tile.map(|color| (index, 1, color))
            }
        };
    }

    if let Some((start, length, color)) = current {
        if length >= MIN_RUN {
            runs.push(make_run(start, length, color));
        }
    }
}

pub fn has_matches(board: &TileBoard) -> bool {
    !find_matches(board).is_empty()
}

/// Compacts each column downward keeping order, holes rise to the top.
pub fn apply_gravity(board: &mut TileBoard) {
    for mut column in board.axis_iter_mut(Axis(1)) {
        let tiles: Vec<TileColor> = column.iter().flatten().copied().collect();
        let holes = column.len() - tiles.len();
        for (index, cell) in column.iter_mut().enumerate() {
            *cell = index.checked_sub(holes).map(|tile| tiles[tile]);
        }
    }
}

/// Fills every hole with a fresh random tile.
pub fn refill<R: Rng + ?Sized>(board: &mut TileBoard, rng: &mut R) {
    refill_with(board, || TileColor::random(rng));
}

/// Fills holes in row-major order with tiles drawn from `next_tile`.
pub fn refill_with(board: &mut TileBoard, mut next_tile: impl FnMut() -> TileColor) {
    for cell in board.iter_mut().filter(|cell| cell.is_none()) {
        *cell = Some(next_tile());
    }
}

/// Clears, drops, and refills until the board settles. Returns one entry per level that matched.
pub fn resolve_cascade<R: Rng + ?Sized>(board: &mut TileBoard, rng: &mut R) -> Vec<CascadeLevel> {
    resolve_cascade_with(board, || TileColor::random(rng))
}

/// Cascade loop with refill tiles drawn from `next_tile`.
pub fn resolve_cascade_with(
    board: &mut TileBoard,
    mut next_tile: impl FnMut() -> TileColor,
) -> Vec<CascadeLevel> {
    let mut levels = Vec::new();

    loop {
        let runs = find_matches(board);
        if runs.is_empty() {
            break;
        }

        let level = levels.len() as u32;
        let score = runs.iter().map(MatchRun::score).sum::<u32>() + CASCADE_BONUS * level;

        for run in &runs {
            for coords in run.cells() {
                board[coords.to_nd_index()] = None;
            }
        }
        apply_gravity(board);
        refill_with(board, &mut next_tile);

        log::trace!("Cascade level {} cleared {} runs for {}", level, runs.len(), score);
        levels.push(CascadeLevel { level, runs, score });
    }

    levels
}
