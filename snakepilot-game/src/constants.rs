//! Centralized tuning constants for the autopilot and its harness.

// Game defaults -------------------------------------------------------------
pub const DEFAULT_BOARD_SIZE: i32 = 30;
pub const DEFAULT_GROWTH: u32 = 2;
pub const DEFAULT_SEED: u64 = 1;
pub const MIN_BOARD_SIZE: i32 = 3;
/// Board areas a game may spend without scoring before it counts as stalled.
pub const STALL_AREA_MULTIPLE: u64 = 4;

// Diagnostics ---------------------------------------------------------------
/// Weight of the latest decision time in the smoothed latency average.
pub const LATENCY_SMOOTHING: f64 = 0.01;

// Randomness ----------------------------------------------------------------
/// Domain tag for the food placement stream.
pub(crate) const FOOD_STREAM_TAG: &[u8] = b"snakepilot-food";
