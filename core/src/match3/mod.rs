use alloc::vec::Vec;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;
pub use cascade::*;
pub use generator::*;

mod cascade;
mod generator;

/// Valid transitions:
/// - Playing -> TimeUp (timer reached zero)
/// - Playing -> NoMoves (no swap left after a cascade)
/// - Playing -> GameOver (caller ended the game)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Match3Status {
    Playing,
    TimeUp,
    NoMoves,
    GameOver,
}

impl Match3Status {
    pub const fn is_finished(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

impl Default for Match3Status {
    fn default() -> Self {
        Self::Playing
    }
}

/// Whether swapping two tiles would line up three or more anywhere on the board.
pub fn is_valid_swap(board: &TileBoard, a: Coord2, b: Coord2) -> bool {
    let (rows, cols) = board_bounds(board);
    let in_bounds = |(row, col): Coord2| row < rows && col < cols;
    if !in_bounds(a) || !in_bounds(b) || !is_orthogonally_adjacent(a, b) {
        return false;
    }

    let mut swapped = board.clone();
    swap_cells(&mut swapped, a, b);
    has_matches(&swapped)
}

/// First valid swap in row-major order, looking right and down from each tile.
pub fn find_hint(board: &TileBoard) -> Option<(Coord2, Coord2)> {
    let (rows, cols) = board_bounds(board);
    BoardSize::new_unchecked(cols, rows).cells().find_map(|coords| {
        board
            .iter_orthogonal(coords)
            .filter(|&other| other > coords)
            .find(|&other| is_valid_swap(board, coords, other))
            .map(|other| (coords, other))
    })
}

pub fn has_valid_moves(board: &TileBoard) -> bool {
    find_hint(board).is_some()
}

fn swap_cells(board: &mut TileBoard, a: Coord2, b: Coord2) {
    board.swap(a.to_nd_index(), b.to_nd_index());
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match3Game {
    board: TileBoard,
    score: u32,
    move_count: u32,
    time_remaining: u32,
    status: Match3Status,
    selected_tile: Option<Coord2>,
}

impl Match3Game {
    /// Fresh board without runs and a countdown of `time_limit` seconds.
    pub fn new<R: Rng + ?Sized>(
        width: Coord,
        height: Coord,
        time_limit: u32,
        rng: &mut R,
    ) -> Result<Self> {
        let size = BoardSize::new(width, height)?;
        let board = generate_board(size, rng);
        log::debug!("New match-3 board {}x{}, {}s", width, height, time_limit);
        Self::from_board(board, time_limit)
    }

    /// Starts from a given board as is, matches included.
    pub fn from_board(board: TileBoard, time_limit: u32) -> Result<Self> {
        BoardSize::of_board(&board)?;
        if board.iter().any(Option::is_none) {
            return Err(GameError::EmptyCell);
        }
        Ok(Self {
            board,
            score: 0,
            move_count: 0,
            time_remaining: time_limit,
            status: Default::default(),
            selected_tile: None,
        })
    }

    pub fn reset<R: Rng + ?Sized>(&self, time_limit: u32, rng: &mut R) -> Result<Self> {
        let size = self.size();
        Self::new(size.width, size.height, time_limit, rng)
    }

    pub fn board(&self) -> &TileBoard {
        &self.board
    }

    pub fn size(&self) -> BoardSize {
        let (rows, cols) = board_bounds(&self.board);
        BoardSize::new_unchecked(cols, rows)
    }

    pub fn tile_at(&self, coords: Coord2) -> Option<TileColor> {
        self.board.get(coords.to_nd_index()).copied().flatten()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn status(&self) -> Match3Status {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn selected_tile(&self) -> Option<Coord2> {
        self.selected_tile
    }

    pub fn is_valid_swap(&self, a: Coord2, b: Coord2) -> bool {
        is_valid_swap(&self.board, a, b)
    }

    pub fn find_hint(&self) -> Option<(Coord2, Coord2)> {
        find_hint(&self.board)
    }

    pub fn swap_tiles<R: Rng + ?Sized>(&self, a: Coord2, b: Coord2, rng: &mut R) -> Result<Self> {
        self.swap_tiles_with_report(a, b, rng).map(|(next, _)| next)
    }

    /// Swaps and resolves the whole cascade, also returning what each level scored.
    pub fn swap_tiles_with_report<R: Rng + ?Sized>(
        &self,
        a: Coord2,
        b: Coord2,
        rng: &mut R,
    ) -> Result<(Self, Vec<CascadeLevel>)> {
        self.check_playing()?;
        let size = self.size();
        let a = size.validate_coords(a)?;
        let b = size.validate_coords(b)?;
        if !is_orthogonally_adjacent(a, b) {
            return Err(GameError::NotAdjacent);
        }

        let mut board = self.board.clone();
        swap_cells(&mut board, a, b);
        if !has_matches(&board) {
            return Err(GameError::NoMatch);
        }

        let levels = resolve_cascade(&mut board, rng);
        let gained: u32 = levels.iter().map(|level| level.score).sum();
        log::debug!(
            "Swap {:?} <-> {:?} scored {} over {} cascade levels",
            a,
            b,
            gained,
            levels.len()
        );

        let mut next = Self {
            board,
            score: self.score + gained,
            move_count: self.move_count + 1,
            selected_tile: None,
            ..self.clone()
        };
        if !has_valid_moves(&next.board) {
            log::debug!("No valid swaps left");
            next.status = Match3Status::NoMoves;
        }

        Ok((next, levels))
    }

    /// Two-step selection: the first tile is remembered, an adjacent second one swaps with it.
    ///
    /// Picking the selected tile again clears the selection, a non-adjacent tile becomes the new
    /// selection, and an adjacent pair that makes no match just drops the selection.
    pub fn select_tile<R: Rng + ?Sized>(&self, coords: Coord2, rng: &mut R) -> Result<Self> {
        self.check_playing()?;
        let coords = self.size().validate_coords(coords)?;

        let with_selection = |selected_tile| Self {
            selected_tile,
            ..self.clone()
        };

        Ok(match self.selected_tile {
            None => with_selection(Some(coords)),
            Some(selected) if selected == coords => with_selection(None),
            Some(selected) if is_orthogonally_adjacent(selected, coords) => {
                match self.swap_tiles(selected, coords, rng) {
                    Ok(next) => next,
                    Err(GameError::NoMatch) => with_selection(None),
                    Err(err) => return Err(err),
                }
            }
            Some(_) => with_selection(Some(coords)),
        })
    }

    /// One second of countdown.
    pub fn tick_timer(&self) -> Self {
        if self.is_finished() {
            return self.clone();
        }

        let time_remaining = self.time_remaining.saturating_sub(1);
        let status = if time_remaining == 0 {
            log::debug!("Match-3 time is up, final score {}", self.score);
            Match3Status::TimeUp
        } else {
            self.status
        };
        Self {
            time_remaining,
            status,
            ..self.clone()
        }
    }

    /// Ends a running game on the caller's request.
    pub fn finish(&self) -> Self {
        if self.is_finished() {
            return self.clone();
        }
        Self {
            status: Match3Status::GameOver,
            selected_tile: None,
            ..self.clone()
        }
    }

    pub fn validate(&self) -> Result<()> {
        let size = BoardSize::of_board(&self.board)?;
        if self.board.iter().any(Option::is_none) {
            return Err(GameError::EmptyCell);
        }
        match self.selected_tile {
            Some(coords) if !size.contains(coords) => Err(GameError::InvalidCoords),
            _ => Ok(()),
        }
    }

    fn check_playing(&self) -> Result<()> {
        if self.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}
