//! Game state and core entity types

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::EventBus;
use super::grid::{Board, Direction, Point};
use super::rules;
use super::spawn::spawn_fruit;
use crate::settings::GameConfig;

/// The player's snake
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    pub head: Point,
    /// Segments behind the head, nearest first
    pub body: VecDeque<Point>,
    pub direction: Direction,
    /// Direction of the last step taken; turns are checked against it
    pub moved: Direction,
    /// Simulation rate in ticks per second
    pub speed: f64,
}

impl Snake {
    /// Create a snake whose body trails straight behind the head
    pub fn new(head: Point, length: usize, direction: Direction, speed: f64) -> Self {
        let back = direction.opposite().vector();
        let length = i32::try_from(length.max(1)).unwrap_or(i32::MAX);
        let body = (1..=length).map(|i| head + back * i).collect();
        Self {
            head,
            body,
            direction,
            moved: direction,
            speed,
        }
    }

    /// Shift one cell along `direction`, keeping the length
    pub fn advance(&mut self) {
        self.body.pop_back();
        self.body.push_front(self.head);
        self.head += self.direction.vector();
        self.moved = self.direction;
    }

    /// Append a segment at the tail end
    pub fn grow(&mut self, at: Point) {
        self.body.push_back(at);
    }

    /// Change heading. Returns false (and keeps the heading) when the turn
    /// would reverse the last step, however many turns came since.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if direction == self.moved.opposite() {
            return false;
        }
        self.direction = direction;
        true
    }

    /// Point the snake as if its last step went `direction`
    pub fn face(&mut self, direction: Direction) {
        self.direction = direction;
        self.moved = direction;
    }

    /// Milliseconds between ticks at the current speed
    pub fn frame_interval_ms(&self) -> f64 {
        if self.speed > 0.0 {
            (1000.0 / self.speed).floor()
        } else {
            f64::INFINITY
        }
    }

    /// Number of occupied cells, head included
    pub fn cell_count(&self) -> usize {
        self.body.len() + 1
    }

    /// Head followed by the body
    pub fn segments(&self) -> impl Iterator<Item = Point> + '_ {
        std::iter::once(self.head).chain(self.body.iter().copied())
    }

    pub fn occupies(&self, p: Point) -> bool {
        self.head == p || self.body.contains(&p)
    }

    /// Head overlaps a body segment
    pub fn bites_itself(&self) -> bool {
        self.body.contains(&self.head)
    }
}

/// A fruit waiting to be eaten
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fruit {
    pub position: Point,
}

impl Fruit {
    pub fn new(position: Point) -> Self {
        Self { position }
    }
}

/// How the fruit is painted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FruitSkin {
    #[default]
    Plain,
    Golden,
    Neon,
}

/// How the snake is painted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SnakeSkin {
    #[default]
    Classic,
    Neon,
}

/// Paint routines currently selected by the active scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Theme {
    pub fruit: FruitSkin,
    pub snake: SnakeSkin,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Head ran into the body
    SelfCollision,
    /// Head left the board
    HitWall,
    /// No free cell left for a fruit
    BoardFilled,
}

impl Outcome {
    pub fn is_win(self) -> bool {
        self == Outcome::BoardFilled
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::SelfCollision => "self collision",
            Outcome::HitWall => "hit the wall",
            Outcome::BoardFilled => "board filled",
        }
    }
}

/// Complete state of one game session
pub struct GameState {
    pub seed: u64,
    pub board: Board,
    pub snake: Snake,
    pub fruit: Fruit,
    pub theme: Theme,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Subscribers per event kind
    pub events: EventBus,
    rng: Pcg32,
    score: u32,
    outcome: Option<Outcome>,
}

impl GameState {
    /// Create a session with the classic rules installed as the first
    /// `fruit_eaten` subscribers
    pub fn new(config: &GameConfig, seed: u64) -> Self {
        let mut state = Self::without_rules(config, seed);
        rules::install(&mut state);
        state
    }

    /// Create a session with an empty subscriber registry. A board already
    /// full at this point ends the session before any subscriber exists;
    /// the session host announces that outcome.
    pub fn without_rules(config: &GameConfig, seed: u64) -> Self {
        let board = Board::new(config.board_size);
        let snake = Snake::new(
            config.initial_head,
            config.initial_length,
            config.initial_direction,
            config.base_speed,
        );
        let mut rng = Pcg32::seed_from_u64(seed);
        let spawned = spawn_fruit(&board, &snake, &mut rng);

        let mut state = Self {
            seed,
            board,
            fruit: Fruit::new(spawned.unwrap_or(snake.head)),
            snake,
            theme: Theme::default(),
            time_ticks: 0,
            events: EventBus::default(),
            rng,
            score: 0,
            outcome: None,
        };
        if spawned.is_none() {
            state.finish(Outcome::BoardFilled);
        }
        state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Add points to the score
    pub fn award(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub fn is_game_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Mark the session as ended. The first outcome wins; returns whether
    /// this call ended the session.
    pub fn finish(&mut self, outcome: Outcome) -> bool {
        if self.outcome.is_some() {
            return false;
        }
        log::info!("Session over: {} (score {})", outcome.as_str(), self.score);
        self.outcome = Some(outcome);
        true
    }

    /// Draw a new fruit position clear of the snake
    pub fn respawn_fruit(&mut self) -> Option<Point> {
        let position = spawn_fruit(&self.board, &self.snake, &mut self.rng)?;
        self.fruit = Fruit::new(position);
        Some(position)
    }
}

impl std::fmt::Debug for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameState")
            .field("seed", &self.seed)
            .field("board", &self.board)
            .field("snake", &self.snake)
            .field("fruit", &self.fruit)
            .field("theme", &self.theme)
            .field("time_ticks", &self.time_ticks)
            .field("score", &self.score)
            .field("outcome", &self.outcome)
            .field("events", &self.events)
            .finish()
    }
}
