use alloc::collections::{BTreeSet, VecDeque};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Score added for each food eaten.
pub const FOOD_REWARD: u32 = 10;

/// Segments in a freshly spawned snake.
pub const INITIAL_LENGTH: usize = 3;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnakeStatus {
    Playing,
    GameOver,
}

impl Default for SnakeStatus {
    fn default() -> Self {
        Self::Playing
    }
}

/// Only a 180 degree turn is refused, anything else (including the same direction) is fine.
pub fn can_change_direction(current: Direction, next: Direction) -> bool {
    next != current.opposite()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnakeGame {
    /// Head first, tail last.
    snake: VecDeque<Coord2>,
    food: Coord2,
    direction: Direction,
    next_direction: Option<Direction>,
    score: u32,
    status: SnakeStatus,
    size: BoardSize,
}

impl SnakeGame {
    /// Horizontal snake centred on the board facing right, food on a random free cell.
    pub fn new<R: Rng + ?Sized>(width: Coord, height: Coord, rng: &mut R) -> Result<Self> {
        let size = BoardSize::new(width, height)?;
        if usize::from(width) < INITIAL_LENGTH || usize::from(size.total_cells()) <= INITIAL_LENGTH
        {
            return Err(GameError::BoardTooSmall);
        }

        let row = height / 2;
        let head_col = (width / 2).max(INITIAL_LENGTH as Coord - 1);
        let snake: VecDeque<Coord2> = (0..INITIAL_LENGTH as Coord)
            .map(|offset| (row, head_col - offset))
            .collect();
        let food = spawn_food(size, &snake, rng).ok_or(GameError::BoardTooSmall)?;
        log::debug!("New snake board {}x{}, food at {:?}", width, height, food);

        Ok(Self {
            snake,
            food,
            direction: Direction::Right,
            next_direction: None,
            score: 0,
            status: Default::default(),
            size,
        })
    }

    pub fn reset<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Self> {
        Self::new(self.size.width, self.size.height, rng)
    }

    pub fn snake(&self) -> &VecDeque<Coord2> {
        &self.snake
    }

    pub fn head(&self) -> Option<Coord2> {
        self.snake.front().copied()
    }

    pub fn len(&self) -> usize {
        self.snake.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snake.is_empty()
    }

    pub fn food(&self) -> Coord2 {
        self.food
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn next_direction(&self) -> Option<Direction> {
        self.next_direction
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn status(&self) -> SnakeStatus {
        self.status
    }

    pub fn size(&self) -> BoardSize {
        self.size
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.status, SnakeStatus::GameOver)
    }

    /// Queues a turn for the next tick, replacing any turn queued before it.
    pub fn change_direction(&self, direction: Direction) -> Result<Self> {
        if self.is_finished() {
            return Err(GameError::AlreadyEnded);
        }
        if !can_change_direction(self.direction, direction) {
            return Err(GameError::ReversedDirection);
        }
        Ok(Self {
            next_direction: Some(direction),
            ..self.clone()
        })
    }

    /// Advances the snake one cell.
    pub fn move_snake<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        if self.is_finished() {
            return self.clone();
        }

        let direction = match self.next_direction {
            Some(next) if can_change_direction(self.direction, next) => next,
            _ => self.direction,
        };
        let mut next = Self {
            next_direction: None,
            ..self.clone()
        };

        let Some(head) = self.head() else {
            next.status = SnakeStatus::GameOver;
            return next;
        };

        let Some(new_head) = apply_delta(head, direction.delta(), self.size.bounds()) else {
            log::debug!("Snake hit the wall at {:?} going {:?}", head, direction);
            next.status = SnakeStatus::GameOver;
            return next;
        };

        if self.snake.contains(&new_head) {
            log::debug!("Snake hit itself at {:?}", new_head);
            next.status = SnakeStatus::GameOver;
            return next;
        }

        next.direction = direction;
        next.snake.push_front(new_head);

        if new_head == self.food {
            next.score += FOOD_REWARD;
            log::debug!("Snake ate at {:?}, length {}", new_head, next.snake.len());
            match spawn_food(self.size, &next.snake, rng) {
                Some(food) => next.food = food,
                None => {
                    log::debug!("Snake fills the board");
                    next.status = SnakeStatus::GameOver;
                }
            }
        } else {
            next.snake.pop_back();
        }

        next
    }

    pub fn validate(&self) -> Result<()> {
        BoardSize::new(self.size.width, self.size.height)?;
        if self.snake.is_empty() || !self.size.contains(self.food) {
            return Err(GameError::InvalidBoardShape);
        }
        if self.snake.iter().any(|&segment| !self.size.contains(segment)) {
            return Err(GameError::InvalidCoords);
        }
        let segments: BTreeSet<Coord2> = self.snake.iter().copied().collect();
        if segments.len() != self.snake.len() {
            return Err(GameError::InvalidCoords);
        }
        // Food only stays under the snake once it fills the board.
        let fills_board = self.snake.len() == usize::from(self.size.total_cells());
        if segments.contains(&self.food) && !fills_board {
            return Err(GameError::InvalidCoords);
        }
        Ok(())
    }
}

/// Uniformly random cell outside the snake, `None` when the snake covers the board.
fn spawn_food<R: Rng + ?Sized>(
    size: BoardSize,
    snake: &VecDeque<Coord2>,
    rng: &mut R,
) -> Option<Coord2> {
    let occupied = size.cells().filter(|cell| snake.contains(cell)).count();
    let free_cells = usize::from(size.total_cells()) - occupied;
    if free_cells == 0 {
        return None;
    }

    let place = rng.gen_range(0..free_cells);
    size.cells()
        .filter(|cell| !snake.contains(cell))
        .nth(place)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    fn game_with(snake: &[Coord2], food: Coord2, direction: Direction) -> SnakeGame {
        SnakeGame {
            snake: snake.iter().copied().collect(),
            food,
            direction,
            next_direction: None,
            score: 0,
            status: SnakeStatus::Playing,
            size: BoardSize::new(6, 6).unwrap(),
        }
    }

    #[test]
    fn starts_centred_facing_right() {
        let game = SnakeGame::new(10, 8, &mut seeded_rng(0)).unwrap();

        assert_eq!(game.snake().iter().copied().collect::<Vec<_>>(), vec![(4, 5), (4, 4), (4, 3)]);
        assert_eq!(game.direction(), Direction::Right);
        assert!(!game.snake().contains(&game.food()));
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn rejects_boards_without_room() {
        assert_eq!(SnakeGame::new(2, 5, &mut seeded_rng(0)), Err(GameError::BoardTooSmall));
        assert_eq!(SnakeGame::new(3, 1, &mut seeded_rng(0)), Err(GameError::BoardTooSmall));
        assert_eq!(SnakeGame::new(0, 1, &mut seeded_rng(0)), Err(GameError::InvalidSize));
        assert!(SnakeGame::new(4, 1, &mut seeded_rng(0)).is_ok());
    }

    #[test]
    fn slides_forward() {
        let game = game_with(&[(2, 2), (2, 1), (2, 0)], (5, 5), Direction::Right);
        let moved = game.move_snake(&mut seeded_rng(0));

        assert_eq!(moved.snake().iter().copied().collect::<Vec<_>>(), vec![(2, 3), (2, 2), (2, 1)]);
        assert_eq!(moved.score(), 0);
    }

    #[test]
    fn eating_grows_and_scores() {
        let game = game_with(&[(2, 2), (2, 1), (2, 0)], (2, 3), Direction::Right);

        for seed in 0..8 {
            let moved = game.move_snake(&mut seeded_rng(seed));
            assert_eq!(moved.len(), 4);
            assert_eq!(moved.score(), FOOD_REWARD);
            assert!(!moved.snake().contains(&moved.food()));
            assert_eq!(moved.status(), SnakeStatus::Playing);
        }
    }

    #[test]
    fn wall_ends_game_without_moving() {
        let game = game_with(&[(2, 5), (2, 4), (2, 3)], (0, 0), Direction::Right);
        let moved = game.move_snake(&mut seeded_rng(0));

        assert_eq!(moved.status(), SnakeStatus::GameOver);
        assert_eq!(moved.snake(), game.snake());
        assert_eq!(moved.move_snake(&mut seeded_rng(0)), moved);
    }

    #[test]
    fn body_collision_ends_game() {
        // Head at (2,2) turning up into its own body at (1,2).
        let game = game_with(
            &[(2, 2), (2, 3), (1, 3), (1, 2), (1, 1)],
            (5, 5),
            Direction::Left,
        )
        .change_direction(Direction::Up)
        .unwrap();
        let moved = game.move_snake(&mut seeded_rng(0));

        assert_eq!(moved.status(), SnakeStatus::GameOver);
        assert_eq!(moved.snake(), game.snake());
    }

    #[test]
    fn moving_into_tail_cell_collides() {
        let game = game_with(&[(1, 1), (1, 2), (2, 2), (2, 1)], (5, 5), Direction::Left)
            .change_direction(Direction::Down)
            .unwrap();
        let moved = game.move_snake(&mut seeded_rng(0));

        assert_eq!(moved.status(), SnakeStatus::GameOver);
    }

    #[test]
    fn reversal_is_rejected_and_snake_keeps_going() {
        let game = game_with(&[(2, 2), (2, 1), (2, 0)], (5, 5), Direction::Right);

        assert_eq!(game.change_direction(Direction::Left), Err(GameError::ReversedDirection));

        let mut reversed = game.clone();
        reversed.next_direction = Some(Direction::Left);
        let moved = reversed.move_snake(&mut seeded_rng(0));

        assert_eq!(moved.direction(), Direction::Right);
        assert_eq!(moved.head(), Some((2, 3)));
        assert_eq!(moved.next_direction(), None);
    }

    #[test]
    fn queued_turn_is_last_write_wins() {
        let game = game_with(&[(2, 2), (2, 1), (2, 0)], (5, 5), Direction::Right)
            .change_direction(Direction::Up)
            .unwrap()
            .change_direction(Direction::Down)
            .unwrap();

        assert_eq!(game.direction(), Direction::Right);
        let moved = game.move_snake(&mut seeded_rng(0));

        assert_eq!(moved.direction(), Direction::Down);
        assert_eq!(moved.head(), Some((3, 2)));
    }

    #[test]
    fn filling_the_board_ends_game() {
        let mut game = game_with(&[(0, 1), (0, 0)], (0, 2), Direction::Right);
        game.size = BoardSize::new(3, 1).unwrap();
        let moved = game.move_snake(&mut seeded_rng(0));

        assert_eq!(moved.len(), 3);
        assert_eq!(moved.score(), FOOD_REWARD);
        assert_eq!(moved.status(), SnakeStatus::GameOver);
        assert_eq!(moved.food(), (0, 2));
        assert!(moved.validate().is_ok());
    }

    #[test]
    fn food_never_lands_on_snake() {
        let mut rng = seeded_rng(42);
        let mut game = game_with(&[(0, 0)], (0, 1), Direction::Right);

        for _ in 0..5 {
            let (row, col) = game.head().unwrap();
            game.food = (row, col + 1);
            game = game.move_snake(&mut rng);
            assert!(!game.snake().contains(&game.food()));
        }

        assert_eq!(game.len(), 6);
        assert_eq!(game.score(), 5 * FOOD_REWARD);
    }

    #[test]
    fn json_round_trip() {
        let game = SnakeGame::new(8, 8, &mut seeded_rng(5))
            .unwrap()
            .change_direction(Direction::Down)
            .unwrap();
        let json = serde_json::to_string(&game).unwrap();
        let restored: SnakeGame = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, game);
        assert!(restored.validate().is_ok());
    }

    #[test]
    fn only_reversal_is_refused() {
        for current in Direction::ALL {
            for next in Direction::ALL {
                assert_eq!(can_change_direction(current, next), next != current.opposite());
            }
        }
        assert!(can_change_direction(Direction::Up, Direction::Up));
        assert!(!can_change_direction(Direction::Left, Direction::Right));
    }
}
