//! Headless game harness: board, snake and seeded food driven by a controller.
use hmac::{Hmac, Mac};
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;
use std::time::{Duration, Instant};

use crate::board::Board;
use crate::config::{ConfigError, GameConfig};
use crate::constants::{FOOD_STREAM_TAG, LATENCY_SMOOTHING};
use crate::controller::Controller;
use crate::geometry::{Cell, CellSet, Direction};
use crate::snake::{Body, MoveOutcome, Snake};
use crate::{BodyProvider, FoodProvider, GridProvider};

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()).map_or(user_seed, |mut mac| {
        mac.update(domain_tag);
        let digest = mac.finalize().into_bytes();
        let mut seed_bytes = [0u8; 8];
        seed_bytes.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(seed_bytes)
    })
}

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// No free cell remained for food.
    Won,
    /// The head left the board or hit the body.
    Died,
    /// The controller reported an [`AgentFailure`](crate::controller::AgentFailure).
    AgentFailed,
    /// Configured move limit reached.
    MoveLimit,
    /// The score stopped changing for [`GameConfig::stall_limit`] moves.
    Stalled,
}

impl Outcome {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Won => "won",
            Self::Died => "died",
            Self::AgentFailed => "agent failed",
            Self::MoveLimit => "move limit",
            Self::Stalled => "stalled",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Final statistics for one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub outcome: Outcome,
    pub score: u64,
    pub max_score: u64,
    pub moves: u64,
    /// Cumulative time spent inside the controller.
    #[serde(with = "duration_serde")]
    pub total_decision: Duration,
    /// Exponentially smoothed per-move decision time.
    #[serde(with = "duration_serde")]
    pub smoothed_decision: Duration,
    pub seed: u64,
    pub size: i32,
    pub growth: u32,
}

/// Seeded food placement.
#[derive(Debug, Clone)]
pub struct Food {
    rng: ChaCha20Rng,
    location: Option<Cell>,
}

impl Food {
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(derive_stream_seed(seed, FOOD_STREAM_TAG)),
            location: None,
        }
    }

    #[must_use]
    pub const fn location(&self) -> Option<Cell> {
        self.location
    }

    pub const fn clear(&mut self) {
        self.location = None;
    }

    /// Drop the food on a uniformly chosen free cell.
    pub fn place(&mut self, board: &Board, body: &Body) -> bool {
        let free = board.sorted_open_cells(body);
        if free.is_empty() {
            self.location = None;
            return false;
        }
        let index = self.rng.gen_range(0..free.len());
        self.location = Some(free[index]);
        true
    }
}

/// One game in progress.
#[derive(Debug, Clone)]
pub struct Game {
    config: GameConfig,
    board: Board,
    snake: Snake,
    food: Food,
    score: u64,
    moves: u64,
}

impl Game {
    /// Set up the board, spawn the snake in the centre and place the first
    /// food.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when `config` fails validation.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let board = Board::square(config.size);
        let snake = Snake::spawn(board.center());
        let mut food = Food::seeded(config.seed);
        food.place(&board, snake.body());
        debug!("snake: {:?}, food: {:?}", snake.body(), food.location());
        Ok(Self {
            config,
            board,
            snake,
            food,
            score: 0,
            moves: 0,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub const fn snake(&self) -> &Snake {
        &self.snake
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub const fn moves(&self) -> u64 {
        self.moves
    }

    /// Run the game to completion with `controller` choosing every move.
    pub fn play(&mut self, controller: &mut Controller) -> GameSummary {
        let max_score = self.config.max_score();
        let stall_limit = self.config.stall_limit();
        let mut last_progress = self.moves;
        let mut total_decision = Duration::ZERO;
        let mut smoothed = 0.0_f64;
        let mut moves_needed: u32 = 0;

        let outcome = loop {
            if self.config.max_moves.is_some_and(|limit| self.moves >= limit) {
                break Outcome::MoveLimit;
            }
            if self.moves - last_progress >= stall_limit {
                info!("stalled at score {} after {} moves", self.score, self.moves);
                break Outcome::Stalled;
            }

            let started = Instant::now();
            let decision = controller.get_move(&*self);
            let elapsed = started.elapsed();
            self.moves += 1;
            total_decision += elapsed;
            smoothed = smoothed.mul_add(
                1.0 - LATENCY_SMOOTHING,
                LATENCY_SMOOTHING * elapsed.as_secs_f64(),
            );

            let direction = match decision {
                Ok(direction) => direction,
                Err(failure) => {
                    debug!(
                        "move {}: none: {:.3}: {smoothed:.6}: {:.6}",
                        self.moves,
                        total_decision.as_secs_f64(),
                        elapsed.as_secs_f64()
                    );
                    info!("agent failed after {} moves: {failure}", self.moves);
                    break Outcome::AgentFailed;
                }
            };
            debug!(
                "move {}: {direction}: {:.3}: {smoothed:.6}: {:.6}",
                self.moves,
                total_decision.as_secs_f64(),
                elapsed.as_secs_f64()
            );

            let mut open = self.board.open_cells(self.snake.body());
            let moved = self.snake.apply_move(direction, &mut open);
            if !moved.safe {
                info!("died at {} after {} moves", moved.head, self.moves);
                break Outcome::Died;
            }

            if self.food.location() == Some(moved.head) {
                self.food.clear();
                self.snake.eat(self.config.growth);
                moves_needed += self.config.growth;
                continue;
            }
            if moves_needed > 0 {
                moves_needed -= 1;
                if moves_needed > 0 {
                    continue;
                }
            }

            if self.food.location().is_none() {
                self.score += 1;
                last_progress = self.moves;
                if !self.food.place(&self.board, self.snake.body()) {
                    info!("won with score {} after {} moves", self.score, self.moves);
                    break Outcome::Won;
                }
                info!(
                    "score {}/{max_score}, food at {:?}",
                    self.score,
                    self.food.location()
                );
            }
        };

        GameSummary {
            outcome,
            score: self.score,
            max_score,
            moves: self.moves,
            total_decision,
            smoothed_decision: Duration::from_secs_f64(smoothed),
            seed: self.config.seed,
            size: self.config.size,
            growth: self.config.growth,
        }
    }
}

impl GridProvider for Game {
    fn size(&self) -> i32 {
        self.board.size()
    }

    fn cells(&self) -> &CellSet {
        self.board.cells()
    }

    fn open_cells(&self, body: &Body) -> CellSet {
        self.board.open_cells(body)
    }
}

impl BodyProvider for Game {
    fn body(&self) -> &Body {
        self.snake.body()
    }

    fn pending_growth(&self) -> u32 {
        self.snake.pending_growth()
    }

    fn growth_per_food(&self) -> u32 {
        self.config.growth
    }

    fn apply_move(&mut self, direction: Direction, open: &mut CellSet) -> MoveOutcome {
        self.snake.apply_move(direction, open)
    }
}

impl FoodProvider for Game {
    fn food(&self) -> Option<Cell> {
        self.food.location()
    }

    fn relocate(&mut self, body: &Body) -> bool {
        self.food.place(&self.board, body)
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_micros().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let micros = u128::deserialize(deserializer)?;
        Ok(Duration::from_micros(u64::try_from(micros).unwrap_or(u64::MAX)))
    }
}
