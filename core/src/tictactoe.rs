use ndarray::Array2;
use rand::Rng;
use rand::seq::IteratorRandom;
use serde::{Deserialize, Serialize};

use crate::*;

/// Width and height of the fixed board.
pub const BOARD_SIDE: Coord = 3;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    X,
    O,
}

impl Symbol {
    pub const fn opponent(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TicTacToeStatus {
    Playing,
    XWon,
    OWon,
    Draw,
}

impl TicTacToeStatus {
    pub const fn won_by(symbol: Symbol) -> Self {
        match symbol {
            Symbol::X => Self::XWon,
            Symbol::O => Self::OWon,
        }
    }

    pub const fn is_finished(self) -> bool {
        !matches!(self, Self::Playing)
    }

    pub const fn winner(self) -> Option<Symbol> {
        match self {
            Self::XWon => Some(Symbol::X),
            Self::OWon => Some(Symbol::O),
            Self::Playing | Self::Draw => None,
        }
    }
}

impl Default for TicTacToeStatus {
    fn default() -> Self {
        Self::Playing
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicTacToeGame {
    board: MarkBoard<Symbol>,
    current_player: Symbol,
    status: TicTacToeStatus,
    move_count: u8,
    last_move: Option<LastMove<Symbol>>,
}

impl Default for TicTacToeGame {
    fn default() -> Self {
        Self::new()
    }
}

impl TicTacToeGame {
    pub fn new() -> Self {
        Self {
            board: Array2::default((BOARD_SIDE, BOARD_SIDE).to_nd_index()),
            current_player: Symbol::X,
            status: Default::default(),
            move_count: 0,
            last_move: None,
        }
    }

    pub fn reset(&self) -> Self {
        Self::new()
    }

    pub fn board(&self) -> &MarkBoard<Symbol> {
        &self.board
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<Symbol> {
        self.board.get(coords.to_nd_index()).copied().flatten()
    }

    pub fn current_player(&self) -> Symbol {
        self.current_player
    }

    pub fn status(&self) -> TicTacToeStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn winner(&self) -> Option<Symbol> {
        self.status.winner()
    }

    pub fn move_count(&self) -> u8 {
        self.move_count
    }

    pub fn last_move(&self) -> Option<LastMove<Symbol>> {
        self.last_move
    }

    pub fn is_valid_move(&self, coords: Coord2) -> bool {
        is_valid_move(&self.board, coords)
    }

    pub fn make_move(&self, coords: Coord2) -> Result<Self> {
        if self.status.is_finished() {
            return Err(GameError::AlreadyEnded);
        }
        let coords = BoardSize::new_unchecked(BOARD_SIDE, BOARD_SIDE).validate_coords(coords)?;
        if self.board[coords.to_nd_index()].is_some() {
            return Err(GameError::CellOccupied);
        }

        let symbol = self.current_player;
        let mut next = self.clone();
        next.board[coords.to_nd_index()] = Some(symbol);
        next.move_count += 1;
        next.last_move = Some(LastMove::new(coords, symbol));

        if next.completes_line(coords, symbol) {
            next.status = TicTacToeStatus::won_by(symbol);
            log::debug!("{:?} wins with {:?}", symbol, coords);
        } else if is_full(&next.board) {
            next.status = TicTacToeStatus::Draw;
            log::debug!("Tic-tac-toe draw");
        } else {
            next.current_player = symbol.opponent();
        }

        Ok(next)
    }

    /// Uniformly random empty cell, for callers that want a trivial opponent.
    pub fn random_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Coord2> {
        if self.status.is_finished() {
            return None;
        }
        empty_cells(&self.board).choose(rng)
    }

    pub fn validate(&self) -> Result<()> {
        if self.board.dim() != (usize::from(BOARD_SIDE), usize::from(BOARD_SIDE)) {
            return Err(GameError::InvalidBoardShape);
        }
        if occupied_count(&self.board) != usize::from(self.move_count) {
            return Err(GameError::InvalidBoardShape);
        }
        Ok(())
    }

    /// Full row, full column, and the diagonals that pass through `coords`.
    fn completes_line(&self, (row, col): Coord2, symbol: Symbol) -> bool {
        let side = BOARD_SIDE;
        let owns = |r: Coord, c: Coord| self.board[(r, c).to_nd_index()] == Some(symbol);

        let full_row = (0..side).all(|c| owns(row, c));
        let full_col = (0..side).all(|r| owns(r, col));
        let diagonal = row == col && (0..side).all(|i| owns(i, i));
        let anti_diagonal = row + col == side - 1 && (0..side).all(|i| owns(i, side - 1 - i));

        full_row || full_col || diagonal || anti_diagonal
    }
}
