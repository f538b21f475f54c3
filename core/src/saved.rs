use alloc::string::String;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameKind {
    Caro,
    TicTacToe,
    Snake,
    Match3,
    Memory,
}

/// State of any one of the games, tagged so a stored blob says what it holds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "game", content = "state", rename_all = "kebab-case")]
pub enum GameSnapshot {
    Caro(CaroGame),
    TicTacToe(TicTacToeGame),
    Snake(SnakeGame),
    Match3(Match3Game),
    Memory(MemoryGame),
}

impl GameSnapshot {
    pub const fn kind(&self) -> GameKind {
        match self {
            Self::Caro(_) => GameKind::Caro,
            Self::TicTacToe(_) => GameKind::TicTacToe,
            Self::Snake(_) => GameKind::Snake,
            Self::Match3(_) => GameKind::Match3,
            Self::Memory(_) => GameKind::Memory,
        }
    }

    /// Terminal states are the caller's cue to submit the score and drop the save.
    pub fn is_finished(&self) -> bool {
        match self {
            Self::Caro(game) => game.is_finished(),
            Self::TicTacToe(game) => game.is_finished(),
            Self::Snake(game) => game.is_finished(),
            Self::Match3(game) => game.is_finished(),
            Self::Memory(game) => game.is_finished(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Caro(game) => game.validate(),
            Self::TicTacToe(game) => game.validate(),
            Self::Snake(game) => game.validate(),
            Self::Match3(game) => game.validate(),
            Self::Memory(game) => game.validate(),
        }
    }

    pub fn size(&self) -> BoardSize {
        match self {
            Self::Caro(game) => game.size(),
            Self::TicTacToe(_) => BoardSize::new_unchecked(BOARD_SIDE, BOARD_SIDE),
            Self::Snake(game) => game.size(),
            Self::Match3(game) => game.size(),
            Self::Memory(game) => game.size(),
        }
    }
}

impl From<CaroGame> for GameSnapshot {
    fn from(game: CaroGame) -> Self {
        Self::Caro(game)
    }
}

impl From<TicTacToeGame> for GameSnapshot {
    fn from(game: TicTacToeGame) -> Self {
        Self::TicTacToe(game)
    }
}

impl From<SnakeGame> for GameSnapshot {
    fn from(game: SnakeGame) -> Self {
        Self::Snake(game)
    }
}

impl From<Match3Game> for GameSnapshot {
    fn from(game: Match3Game) -> Self {
        Self::Match3(game)
    }
}

impl From<MemoryGame> for GameSnapshot {
    fn from(game: MemoryGame) -> Self {
        Self::Memory(game)
    }
}

/// What gets written to storage for "continue game".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedGame {
    pub snapshot: GameSnapshot,
    #[serde(default)]
    pub cursor: Option<KeyboardPosition>,
}

impl SavedGame {
    pub fn new(snapshot: impl Into<GameSnapshot>) -> Self {
        Self {
            snapshot: snapshot.into(),
            cursor: None,
        }
    }

    pub fn with_cursor(self, cursor: KeyboardPosition) -> Self {
        Self {
            cursor: Some(cursor),
            ..self
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|err| {
            log::warn!("Failed to encode saved game: {}", err);
            GameError::InvalidSave
        })
    }

    /// Decodes and checks a save, the cursor is pulled back onto the board if it drifted off.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut saved: Self = serde_json::from_str(json).map_err(|err| {
            log::warn!("Rejected saved game: {}", err);
            GameError::InvalidSave
        })?;
        saved.snapshot.validate()?;
        saved.cursor = saved.cursor.map(|cursor| cursor.clamped(saved.snapshot.size()));
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;

    fn round_trip(saved: &SavedGame) -> SavedGame {
        SavedGame::from_json(&saved.to_json().unwrap()).unwrap()
    }

    #[test]
    fn every_game_survives_a_round_trip() {
        let mut rng = seeded_rng(10);
        let caro = CaroGame::new(9, 9)
            .unwrap()
            .make_move((4, 4))
            .unwrap()
            .play_computer_turn(&mut rng)
            .unwrap();
        let tic_tac_toe = TicTacToeGame::new().make_move((1, 1)).unwrap();
        let snake = SnakeGame::new(10, 10, &mut rng).unwrap().move_snake(&mut rng);
        let match3 = Match3Game::new(6, 6, 60, &mut rng).unwrap().tick_timer();
        let memory = MemoryGame::new(4, 4, 60, &mut rng)
            .unwrap()
            .flip_card((0, 0))
            .unwrap();

        let snapshots: Vec<GameSnapshot> = vec![
            caro.into(),
            tic_tac_toe.into(),
            snake.into(),
            match3.into(),
            memory.into(),
        ];

        for snapshot in snapshots {
            let saved = SavedGame::new(snapshot).with_cursor(KeyboardPosition::new((1, 2)));
            assert_eq!(round_trip(&saved), saved);
        }
    }

    #[test]
    fn tag_names_the_game() {
        let saved = SavedGame::new(TicTacToeGame::new());
        let json = saved.to_json().unwrap();

        assert!(json.contains("\"game\":\"tic-tac-toe\""));
        assert_eq!(saved.snapshot.kind(), GameKind::TicTacToe);
        assert!(!saved.snapshot.is_finished());
    }

    #[test]
    fn missing_cursor_defaults_to_none() {
        let saved = SavedGame::new(TicTacToeGame::new());
        let mut value: serde_json::Value = serde_json::from_str(&saved.to_json().unwrap()).unwrap();
        value.as_object_mut().unwrap().remove("cursor");

        let restored = SavedGame::from_json(&value.to_string()).unwrap();

        assert_eq!(restored.cursor, None);
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(SavedGame::from_json("{\"snapshot\":1}"), Err(GameError::InvalidSave));
        assert_eq!(
            SavedGame::from_json("{\"snapshot\":{\"game\":\"chess\",\"state\":{}}}"),
            Err(GameError::InvalidSave)
        );
    }

    #[test]
    fn inconsistent_state_is_rejected() {
        let game = CaroGame::new(5, 5).unwrap().make_move((0, 0)).unwrap();
        let mut value: serde_json::Value =
            serde_json::from_str(&SavedGame::new(game).to_json().unwrap()).unwrap();
        value["snapshot"]["state"]["moveCount"] = serde_json::json!(3);

        assert_eq!(
            SavedGame::from_json(&value.to_string()),
            Err(GameError::InvalidBoardShape)
        );
    }

    #[test]
    fn cursor_is_clamped_onto_board() {
        let saved = SavedGame::new(TicTacToeGame::new()).with_cursor(KeyboardPosition::new((8, 8)));

        let restored = round_trip(&saved);

        assert_eq!(restored.cursor, Some(KeyboardPosition::new((2, 2))));
    }

    fn saved_value(snapshot: impl Into<GameSnapshot>) -> serde_json::Value {
        serde_json::from_str(&SavedGame::new(snapshot).to_json().unwrap()).unwrap()
    }

    fn memory_value() -> serde_json::Value {
        let game = MemoryGame::new(4, 4, 60, &mut seeded_rng(3))
            .unwrap()
            .flip_card((0, 0))
            .unwrap();
        saved_value(game)
    }

    fn snake_value() -> serde_json::Value {
        saved_value(SnakeGame::new(10, 10, &mut seeded_rng(3)).unwrap())
    }

    #[test]
    fn memory_card_flipped_twice_is_rejected() {
        let mut value = memory_value();
        value["snapshot"]["state"]["flippedCards"] = serde_json::json!([[0, 0], [0, 0]]);

        assert_eq!(
            SavedGame::from_json(&value.to_string()),
            Err(GameError::InvalidCoords)
        );
    }

    #[test]
    fn memory_unknown_matched_values_are_rejected() {
        let mut value = memory_value();
        value["snapshot"]["state"]["matchedPairs"] = serde_json::json!([99, 98]);

        assert_eq!(
            SavedGame::from_json(&value.to_string()),
            Err(GameError::InvalidBoardShape)
        );
    }

    #[test]
    fn memory_pair_matched_twice_is_rejected() {
        let mut value = memory_value();
        value["snapshot"]["state"]["flippedCards"] = serde_json::json!([]);
        value["snapshot"]["state"]["matchedPairs"] = serde_json::json!([1, 1]);

        assert_eq!(
            SavedGame::from_json(&value.to_string()),
            Err(GameError::InvalidBoardShape)
        );
    }

    #[test]
    fn memory_value_without_its_twin_is_rejected() {
        let mut value = memory_value();
        value["snapshot"]["state"]["board"]["data"][0] = serde_json::json!(999);

        assert_eq!(
            SavedGame::from_json(&value.to_string()),
            Err(GameError::InvalidBoardShape)
        );
    }

    #[test]
    fn snake_repeated_segment_is_rejected() {
        let mut value = snake_value();
        let body = value["snapshot"]["state"]["snake"][1].clone();
        value["snapshot"]["state"]["snake"][2] = body;

        assert_eq!(
            SavedGame::from_json(&value.to_string()),
            Err(GameError::InvalidCoords)
        );
    }

    #[test]
    fn snake_food_under_body_is_rejected() {
        let mut value = snake_value();
        let body = value["snapshot"]["state"]["snake"][1].clone();
        value["snapshot"]["state"]["food"] = body;

        assert_eq!(
            SavedGame::from_json(&value.to_string()),
            Err(GameError::InvalidCoords)
        );
    }
}
