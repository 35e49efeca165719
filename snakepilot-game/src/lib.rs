//! SnakePilot Core
//!
//! Graph-search autopilot for the classic snake game plus a headless harness
//! to drive it. The controller only reads the world through the collaborator
//! traits below, so it can be embedded in any front end that can answer
//! them.

pub mod board;
pub mod config;
pub mod constants;
pub mod controller;
pub mod game;
pub mod geometry;
pub mod patch;
pub mod plan;
pub mod search;
pub mod simulate;
pub mod snake;
pub mod trail;

// Re-export commonly used types
pub use board::Board;
pub use config::{AgentConfig, ConfigError, GameConfig, PilotConfig};
pub use controller::{AgentFailure, Controller, PlanStage, Regime, SearchOrder};
pub use game::{Game, GameSummary, Outcome};
pub use geometry::{Cell, CellSet, Direction, trajectory};
pub use plan::{Plan, PlanTag, PlannedMove};
pub use search::{PathNotFound, find_path};
pub use simulate::{Collision, is_safe};
pub use snake::{Body, MoveOutcome, Snake};

/// Read access to the playing field.
pub trait GridProvider {
    fn size(&self) -> i32;

    /// Every cell on the board.
    fn cells(&self) -> &CellSet;

    /// Board cells not covered by `body`.
    fn open_cells(&self, body: &Body) -> CellSet {
        let mut open = self.cells().clone();
        for cell in body {
            open.remove(cell);
        }
        open
    }
}

/// The snake as seen by the controller.
pub trait BodyProvider {
    /// Body cells, head first.
    fn body(&self) -> &Body;

    fn pending_growth(&self) -> u32;

    /// Cells added for each food eaten.
    fn growth_per_food(&self) -> u32;

    /// Commit one move. Never called by the controller.
    fn apply_move(&mut self, direction: Direction, open: &mut CellSet) -> MoveOutcome;
}

/// Current food location and its respawn rule.
pub trait FoodProvider {
    fn food(&self) -> Option<Cell>;

    /// Move the food to a free cell. Returns `false` when none remains.
    fn relocate(&mut self, body: &Body) -> bool;
}

/// Everything the controller needs to decide a move.
pub trait World: GridProvider + BodyProvider + FoodProvider {}

impl<T: GridProvider + BodyProvider + FoodProvider + ?Sized> World for T {}
