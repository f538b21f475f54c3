use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;
use ndarray::Array2;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::*;

/// Score added for each matched pair.
pub const MATCH_REWARD: u32 = 10;

/// Face-up unmatched cards allowed at once.
pub const MAX_FLIPPED: usize = 2;

pub type CardValue = CellCount;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MemoryStatus {
    Playing,
    Completed,
    TimeUp,
}

impl MemoryStatus {
    pub const fn is_finished(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

impl Default for MemoryStatus {
    fn default() -> Self {
        Self::Playing
    }
}

/// Result of comparing the two face-up cards.
#[derive(Clone, Debug, PartialEq)]
pub struct PairCheck {
    pub game: MemoryGame,
    /// The cards differ; the caller should show them briefly then call `flip_cards_back`.
    pub should_flip_back: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryGame {
    board: Array2<Option<CardValue>>,
    flipped_cards: Vec<Coord2>,
    matched_pairs: Vec<CardValue>,
    score: u32,
    move_count: u32,
    time_remaining: u32,
    status: MemoryStatus,
}

impl MemoryGame {
    /// Shuffled board holding every value exactly twice.
    pub fn new<R: Rng + ?Sized>(
        width: Coord,
        height: Coord,
        time_limit: u32,
        rng: &mut R,
    ) -> Result<Self> {
        let size = BoardSize::new(width, height)?;
        let total_cells = size.total_cells();
        if total_cells % 2 != 0 {
            return Err(GameError::OddCellCount);
        }

        let mut cards: Vec<Option<CardValue>> = (0..total_cells / 2)
            .flat_map(|value| [Some(value), Some(value)])
            .collect();
        cards.shuffle(rng);

        let board = Array2::from_shape_vec(size.bounds().to_nd_index(), cards)
            .map_err(|_| GameError::InvalidBoardShape)?;
        log::debug!(
            "New memory board {}x{} with {} pairs",
            width,
            height,
            total_cells / 2
        );

        Ok(Self {
            board,
            flipped_cards: Vec::new(),
            matched_pairs: Vec::new(),
            score: 0,
            move_count: 0,
            time_remaining: time_limit,
            status: Default::default(),
        })
    }

    pub fn reset<R: Rng + ?Sized>(&self, time_limit: u32, rng: &mut R) -> Result<Self> {
        let size = self.size();
        Self::new(size.width, size.height, time_limit, rng)
    }

    pub fn board(&self) -> &Array2<Option<CardValue>> {
        &self.board
    }

    pub fn size(&self) -> BoardSize {
        let (rows, cols) = board_bounds(&self.board);
        BoardSize::new_unchecked(cols, rows)
    }

    pub fn card_at(&self, coords: Coord2) -> Option<CardValue> {
        self.board.get(coords.to_nd_index()).copied().flatten()
    }

    pub fn flipped_cards(&self) -> &[Coord2] {
        &self.flipped_cards
    }

    pub fn matched_pairs(&self) -> &[CardValue] {
        &self.matched_pairs
    }

    pub fn total_pairs(&self) -> usize {
        self.board.iter().flatten().count() / 2
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

    pub fn status(&self) -> MemoryStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    /// Face up either because it is flipped right now or because its pair was found.
    pub fn is_face_up(&self, coords: Coord2) -> bool {
        self.flipped_cards.contains(&coords)
            || self
                .card_at(coords)
                .is_some_and(|value| self.matched_pairs.contains(&value))
    }

    pub fn flip_card(&self, coords: Coord2) -> Result<Self> {
        if self.is_finished() {
            return Err(GameError::AlreadyEnded);
        }
        let coords = self.size().validate_coords(coords)?;
        let value = self.card_at(coords).ok_or(GameError::EmptyCell)?;
        if self.matched_pairs.contains(&value) {
            return Err(GameError::AlreadyMatched);
        }
        if self.flipped_cards.contains(&coords) {
            return Err(GameError::AlreadyFlipped);
        }
        if self.flipped_cards.len() >= MAX_FLIPPED {
            return Err(GameError::TooManyFlipped);
        }

        let mut next = self.clone();
        next.flipped_cards.push(coords);
        log::trace!("Flipped {:?} showing {}", coords, value);
        Ok(next)
    }

    /// Compares the two face-up cards, a no-op unless exactly two are up.
    pub fn process_flipped_cards(&self) -> PairCheck {
        let unchanged = || PairCheck {
            game: self.clone(),
            should_flip_back: false,
        };
        if self.is_finished() {
            return unchanged();
        }
        let &[first, second] = self.flipped_cards.as_slice() else {
            return unchanged();
        };
        let (Some(first_value), Some(second_value)) = (self.card_at(first), self.card_at(second))
        else {
            return unchanged();
        };

        let mut next = self.clone();
        next.move_count += 1;

        if first_value != second_value {
            log::trace!("No match between {:?} and {:?}", first, second);
            return PairCheck {
                game: next,
                should_flip_back: true,
            };
        }

        next.matched_pairs.push(first_value);
        next.flipped_cards.clear();
        next.score += MATCH_REWARD;
        log::debug!(
            "Matched pair {} ({}/{})",
            first_value,
            next.matched_pairs.len(),
            next.total_pairs()
        );
        if next.matched_pairs.len() == next.total_pairs() {
            log::debug!("Memory board completed in {} moves", next.move_count);
            next.status = MemoryStatus::Completed;
        }

        PairCheck {
            game: next,
            should_flip_back: false,
        }
    }

    /// Turns unmatched face-up cards back down.
    pub fn flip_cards_back(&self) -> Self {
        Self {
            flipped_cards: Vec::new(),
            ..self.clone()
        }
    }

    /// One second of countdown.
    pub fn tick_timer(&self) -> Self {
        if self.is_finished() {
            return self.clone();
        }

        let time_remaining = self.time_remaining.saturating_sub(1);
        let status = if time_remaining == 0 {
            log::debug!("Memory time is up with {} pairs found", self.matched_pairs.len());
            MemoryStatus::TimeUp
        } else {
            self.status
        };
        Self {
            time_remaining,
            status,
            ..self.clone()
        }
    }

    pub fn validate(&self) -> Result<()> {
        let size = BoardSize::of_board(&self.board)?;
        if self.flipped_cards.len() > MAX_FLIPPED {
            return Err(GameError::TooManyFlipped);
        }
        if self.flipped_cards.iter().any(|&coords| !size.contains(coords)) {
            return Err(GameError::InvalidCoords);
        }
        if let [first, second] = self.flipped_cards.as_slice() {
            if first == second {
                return Err(GameError::InvalidCoords);
            }
        }

        let mut copies: BTreeMap<CardValue, usize> = BTreeMap::new();
        for &value in self.board.iter().flatten() {
            *copies.entry(value).or_default() += 1;
        }
        if copies.values().any(|&count| count != 2) {
            return Err(GameError::InvalidBoardShape);
        }

        let mut matched = BTreeSet::new();
        for &value in &self.matched_pairs {
            if !copies.contains_key(&value) || !matched.insert(value) {
                return Err(GameError::InvalidBoardShape);
            }
        }
        if self
            .flipped_cards
            .iter()
            .any(|&coords| self.card_at(coords).is_none_or(|value| matched.contains(&value)))
        {
            return Err(GameError::InvalidCoords);
        }
        Ok(())
    }
}
