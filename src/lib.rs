//! Fragile Gate - A falling-shapes arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (frame geometry, spawning, collisions, power-ups)
//! - `persistence`: Player profile record and key/value storage backend
//! - `platform`: Browser/native platform glue (key map, wasm binding)
//! - `market`: Token shop for power-ups and cosmetics
//! - `highscores`: Per-player leaderboard
//! - `settings`: Persisted player preferences

pub mod highscores;
pub mod market;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use highscores::Leaderboard;
pub use persistence::PlayerProfile;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Nominal simulation step (60 Hz display refresh)
    pub const TICK_MS: u64 = 16;
    /// Max simulation steps per rendered frame
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame gap fed to the simulation (tab switches, debugger stops)
    pub const MAX_FRAME_MS: f64 = 100.0;

    /// Frame defaults
    pub const BASE_FRAME_WIDTH: f32 = 320.0;
    /// Frame never exceeds this fraction of the screen width (before modifiers)
    pub const FRAME_SCREEN_FRACTION: f32 = 0.85;
    pub const FRAME_HEIGHT: f32 = 80.0;
    /// Frame top sits this far above the bottom edge of the screen
    pub const FRAME_BOTTOM_OFFSET: f32 = 180.0;
    /// How far the frame may be dragged past either screen edge
    pub const FRAME_OVERFLOW: f32 = 180.0;
    pub const HOLE_SIZE: f32 = 50.0;
    pub const EXPAND_FACTOR: f32 = 1.4;
    pub const SHRINK_FACTOR: f32 = 0.65;

    /// Falling shape defaults
    pub const SHAPE_SIZE: f32 = 40.0;
    pub const SHAPE_BASE_SPEED: f32 = 1.5;
    /// Score-driven speed increase is capped at this many px/tick
    pub const SHAPE_MAX_SPEED_BONUS: f32 = 4.0;
    /// Shapes are dropped once they fall this far below the screen
    pub const OFFSCREEN_MARGIN: f32 = 50.0;
    /// A shape must sink this far into the frame before solid material kills it
    pub const SOLID_HIT_GRACE: f32 = 10.0;
    pub const GOLDEN_CHANCE: f64 = 0.05;
    pub const POWER_UP_SHAPE_CHANCE: f64 = 0.15;

    /// Triple burst shapes
    pub const TRIPLE_SHAPE_SIZE: f32 = 38.0;
    pub const TRIPLE_SHAPE_SPEED: f32 = 2.5;
    pub const TRIPLE_SPAWN_Y: f32 = -50.0;

    /// Spawn cadence (ticks between spawns)
    pub const SPAWN_INTERVAL_START: f32 = 120.0;
    pub const SPAWN_INTERVAL_FLOOR: f32 = 60.0;
    pub const SPAWN_INTERVAL_DECAY: f32 = 0.008;

    /// Scoring
    pub const POINTS_NORMAL: u64 = 10;
    pub const POINTS_GOLDEN: u64 = 30;
    /// Share of the final score paid out as tokens
    pub const TOKEN_RATE_PERCENT: u64 = 10;
    /// Fraction of the record that triggers the "approaching" notice
    pub const HIGH_SCORE_APPROACH: f64 = 0.8;

    /// Power-ups
    pub const POWER_UP_DURATION_MS: u64 = 5000;
    pub const SLOWMO_FACTOR: f32 = 0.4;

    /// Frame transitions
    pub const TRANSITION_DURATION_MS: u64 = 3000;
    /// Progress at which the pending configuration replaces the old one
    pub const TRANSITION_SWAP_PROGRESS: f32 = 0.8;
    pub const FRAME_CHANGE_MIN_MS: u64 = 12_000;
    pub const FRAME_CHANGE_MAX_MS: u64 = 30_000;

    /// Continue pricing: base + step * continues already used
    pub const CONTINUE_BASE_COST: u64 = 50;
    pub const CONTINUE_COST_STEP: u64 = 50;
}

/// Token payout for a final score (10%, rounded down)
#[inline]
pub fn tokens_for_score(score: u64) -> u64 {
    score * consts::TOKEN_RATE_PERCENT / 100
}

/// Cost of the next continue given how many were already bought this session
#[inline]
pub fn continue_cost(continues_used: u32) -> u64 {
    consts::CONTINUE_BASE_COST + consts::CONTINUE_COST_STEP * continues_used as u64
}
