use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;
pub use ai::*;
pub use win::*;

mod ai;
mod win;

/// Run length that wins unless the caller asks for another one.
pub const DEFAULT_TARGET_IN_ROW: u8 = 4;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaroPlayer {
    Player,
    Computer,
}

impl CaroPlayer {
    pub const fn opponent(self) -> Self {
        match self {
            Self::Player => Self::Computer,
            Self::Computer => Self::Player,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaroStatus {
    Playing,
    PlayerWon,
    ComputerWon,
    Draw,
}

impl CaroStatus {
    pub const fn won_by(player: CaroPlayer) -> Self {
        match player {
            CaroPlayer::Player => Self::PlayerWon,
            CaroPlayer::Computer => Self::ComputerWon,
        }
    }

    pub const fn is_finished(self) -> bool {
        !matches!(self, Self::Playing)
    }

    pub const fn winner(self) -> Option<CaroPlayer> {
        match self {
            Self::PlayerWon => Some(CaroPlayer::Player),
            Self::ComputerWon => Some(CaroPlayer::Computer),
            Self::Playing | Self::Draw => None,
        }
    }
}

impl Default for CaroStatus {
    fn default() -> Self {
        Self::Playing
    }
}

/// Caro (gomoku-style) game between the human player and the computer.
///
/// Every move returns a new value, the receiver is never modified.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaroGame {
    board: MarkBoard<CaroPlayer>,
    current_player: CaroPlayer,
    status: CaroStatus,
    move_count: CellCount,
    last_move: Option<LastMove<CaroPlayer>>,
}

impl CaroGame {
    pub fn new(width: Coord, height: Coord) -> Result<Self> {
        let size = BoardSize::new(width, height)?;
        log::debug!("New caro board {}x{}", size.width, size.height);
        Ok(Self {
            board: Array2::default(size.bounds().to_nd_index()),
            current_player: CaroPlayer::Player,
            status: Default::default(),
            move_count: 0,
            last_move: None,
        })
    }

    /// Fresh game on a board of the same size.
    pub fn reset(&self) -> Self {
        let size = self.size();
        Self {
            board: Array2::default(size.bounds().to_nd_index()),
            current_player: CaroPlayer::Player,
            status: Default::default(),
            move_count: 0,
            last_move: None,
        }
    }

    pub fn board(&self) -> &MarkBoard<CaroPlayer> {
        &self.board
    }

    pub fn size(&self) -> BoardSize {
        let (rows, cols) = board_bounds(&self.board);
        BoardSize::new_unchecked(cols, rows)
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<CaroPlayer> {
        self.board.get(coords.to_nd_index()).copied().flatten()
    }

    pub fn current_player(&self) -> CaroPlayer {
        self.current_player
    }

    pub fn status(&self) -> CaroStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn winner(&self) -> Option<CaroPlayer> {
        self.status.winner()
    }

    pub fn move_count(&self) -> CellCount {
        self.move_count
    }

    pub fn last_move(&self) -> Option<LastMove<CaroPlayer>> {
        self.last_move
    }

    pub fn is_valid_move(&self, coords: Coord2) -> bool {
        is_valid_move(&self.board, coords)
    }

    pub fn make_move(&self, coords: Coord2) -> Result<Self> {
        self.make_move_with_target(coords, DEFAULT_TARGET_IN_ROW)
    }

    pub fn make_move_with_target(&self, coords: Coord2, target_in_row: u8) -> Result<Self> {
        if target_in_row == 0 {
            return Err(GameError::InvalidTarget);
        }
        self.check_playing()?;
        let coords = self.size().validate_coords(coords)?;
        if self.board[coords.to_nd_index()].is_some() {
            return Err(GameError::CellOccupied);
        }

        let player = self.current_player;
        let mut next = self.clone();
        next.board[coords.to_nd_index()] = Some(player);
        next.move_count += 1;
        next.last_move = Some(LastMove::new(coords, player));
        log::debug!("{:?} plays {:?}, move {}", player, coords, next.move_count);

        if is_winning_move(&next.board, coords, player, target_in_row) {
            next.status = CaroStatus::won_by(player);
            log::debug!("{:?} completed {} in a row", player, target_in_row);
        } else if is_full(&next.board) {
            next.status = CaroStatus::Draw;
            log::debug!("Caro board full, draw");
        } else {
            next.current_player = player.opponent();
        }

        Ok(next)
    }

    /// Lets the AI pick and play the computer's move.
    pub fn play_computer_turn<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> Result<Self> {
        self.check_playing()?;
        if self.current_player != CaroPlayer::Computer {
            return Err(GameError::WrongTurn);
        }
        let coords = select_move(&self.board, rng).ok_or(GameError::CellOccupied)?;
        self.make_move(coords)
    }

    /// Checks a state restored from storage before resuming it.
    pub fn validate(&self) -> Result<()> {
        BoardSize::of_board(&self.board)?;
        if occupied_count(&self.board) != usize::from(self.move_count) {
            return Err(GameError::InvalidBoardShape);
        }
        if let Some(last) = self.last_move {
            if self.board.get(last.coords().to_nd_index()) != Some(&Some(last.player)) {
                return Err(GameError::InvalidBoardShape);
            }
        }
        Ok(())
    }

    fn check_playing(&self) -> Result<()> {
        if self.status.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}
