//! Agent and game configuration.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_BOARD_SIZE, DEFAULT_GROWTH, DEFAULT_SEED, MIN_BOARD_SIZE, STALL_AREA_MULTIPLE,
};

/// Errors raised when configuration invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("board size must be at least {min} (got {value})")]
    BoardTooSmall { min: i32, value: i32 },
    #[error("growth per food must be at least 1")]
    ZeroGrowth,
    #[error("move limit must be positive when set")]
    ZeroMoveLimit,
    #[error("invalid configuration JSON: {0}")]
    Parse(String),
}

/// Decision-making switches for the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Replay every adopted plan and patch before trusting it. Slower, and
    /// off unless requested.
    #[serde(default)]
    pub safety_check: bool,
    /// Alternate the two-leg search order after a failed first leg.
    #[serde(default = "AgentConfig::default_toggle_search_order")]
    pub toggle_search_order: bool,
}

impl AgentConfig {
    const fn default_toggle_search_order() -> bool {
        true
    }

    #[must_use]
    pub const fn with_safety_check(mut self, enabled: bool) -> Self {
        self.safety_check = enabled;
        self
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            safety_check: false,
            toggle_search_order: Self::default_toggle_search_order(),
        }
    }
}

/// Board and food settings for one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default = "GameConfig::default_size")]
    pub size: i32,
    /// Cells added per food eaten.
    #[serde(default = "GameConfig::default_growth")]
    pub growth: u32,
    #[serde(default = "GameConfig::default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub max_moves: Option<u64>,
}

impl GameConfig {
    const fn default_size() -> i32 {
        DEFAULT_BOARD_SIZE
    }

    const fn default_growth() -> u32 {
        DEFAULT_GROWTH
    }

    const fn default_seed() -> u64 {
        DEFAULT_SEED
    }

    /// Check configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] describing the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size < MIN_BOARD_SIZE {
            return Err(ConfigError::BoardTooSmall {
                min: MIN_BOARD_SIZE,
                value: self.size,
            });
        }
        if self.growth == 0 {
            return Err(ConfigError::ZeroGrowth);
        }
        if matches!(self.max_moves, Some(0)) {
            return Err(ConfigError::ZeroMoveLimit);
        }
        Ok(())
    }

    /// Highest reachable score: every free cell filled, two cells per start.
    #[must_use]
    pub const fn max_score(&self) -> u64 {
        let area = (self.size as i64) * (self.size as i64) - 2;
        if area <= 0 || self.growth == 0 {
            return 0;
        }
        area.unsigned_abs() / self.growth as u64
    }

    /// Moves without a score change after which the game is abandoned.
    #[must_use]
    pub const fn stall_limit(&self) -> u64 {
        let area = (self.size as i64) * (self.size as i64);
        area.unsigned_abs() * STALL_AREA_MULTIPLE
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            size: Self::default_size(),
            growth: Self::default_growth(),
            seed: Self::default_seed(),
            max_moves: None,
        }
    }
}

/// Combined configuration file layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PilotConfig {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub game: GameConfig,
}

impl PilotConfig {
    /// Parse and validate a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and any validation
    /// error from [`GameConfig::validate`].
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let cfg: Self =
            serde_json::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        cfg.game.validate()?;
        Ok(cfg)
    }
}
