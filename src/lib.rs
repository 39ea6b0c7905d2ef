//! Blob Arena - a single-player growth arena
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, growth, bot AI, camera)
//! - `session`: Round orchestration, frame/decay scheduling and score reporting
//! - `settings`: Data-driven game balance
//! - `highscores`: Local leaderboard fed by finished rounds
//! - `web`: Browser bindings (wasm32 only)

pub mod highscores;
pub mod session;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use highscores::HighScores;
pub use session::{ScoreSink, Session, SubmitError};
pub use settings::{ArenaConfig, ConfigError};

/// Game configuration constants
pub mod consts {
    /// World dimensions (world units)
    pub const WORLD_WIDTH: f32 = 2000.0;
    pub const WORLD_HEIGHT: f32 = 2000.0;
    /// Maximum entity radius as a fraction of world width
    pub const MAX_SIZE_FRACTION: f32 = 0.1;

    /// Speeds below are tuned per frame at this rate, stored per second
    pub const FRAMES_PER_SECOND: f32 = 60.0;
    /// Largest frame delta fed to the simulation (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Player defaults
    pub const STARTING_RADIUS: f32 = 20.0;
    pub const PLAYER_SPEED: f32 = 2.0 * FRAMES_PER_SECOND;
    /// Offset of the start position from world center along x
    pub const PLAYER_START_OFFSET_X: f32 = 100.0;
    /// Cursor distance (screen px) at which the player reaches full speed
    pub const CURSOR_FULL_SPEED_DISTANCE: f32 = 100.0;
    /// Player wears a crown above this multiple of the starting radius
    pub const CROWN_FACTOR: f32 = 1.5;

    /// Boost: costs radius, grants a timed speed multiplier
    pub const BOOST_COST: f32 = 1.0;
    pub const BOOST_DURATION_MS: f64 = 5000.0;
    pub const BOOST_MULTIPLIER: f32 = 2.0;

    /// Food defaults
    pub const FOOD_COUNT: usize = 30;
    pub const FOOD_RADIUS: f32 = 3.0;
    pub const FOOD_MIN_SCORE: f32 = 5.0;
    pub const FOOD_MAX_SCORE: f32 = 10.0;

    /// Growth tuning
    pub const FOOD_GROWTH: f32 = 0.5;
    pub const FOOD_GROWTH_FLOOR: f32 = 0.05;
    pub const BASE_GROWTH_RATE: f32 = 0.5;
    pub const BASE_GROWTH_FLOOR: f32 = 0.1;
    /// Growth shrinks by this factor every `SCORE_PENALTY_THRESHOLD` points
    pub const GROWTH_PENALTY_FACTOR: f32 = 0.7;
    pub const SCORE_PENALTY_THRESHOLD: u64 = 100;

    /// Points
    pub const POINTS_PER_FOOD: u64 = 1;
    pub const POINTS_PER_BOT: u64 = 10;

    /// Passive decay (applied once per interval of wall-clock time)
    pub const MASS_DECAY_RATE: f32 = 0.9999;
    pub const MIN_DECAY_SIZE: f32 = 35.0;
    pub const DECAY_INTERVAL_MS: f64 = 1000.0;

    /// Bot population
    pub const LARGE_BOT_COUNT: usize = 8;
    pub const REGULAR_BOT_COUNT: usize = 12;
    pub const LARGE_BOT_RADIUS_MIN: f32 = 35.0;
    pub const LARGE_BOT_RADIUS_MAX: f32 = 45.0;
    pub const LARGE_BOT_SPEED: f32 = 1.8 * FRAMES_PER_SECOND;
    /// Regular bot radius as a fraction of the starting radius
    pub const REGULAR_BOT_SCALE_MIN: f32 = 0.8;
    pub const REGULAR_BOT_SCALE_MAX: f32 = 0.9;
    pub const REGULAR_BOT_SPEED: f32 = 2.0 * FRAMES_PER_SECOND;
    pub const LARGE_BOT_PERSONALITY_MIN: f32 = 0.7;

    /// Bot AI
    pub const BOT_VIEW_RANGE: f32 = 300.0;
    /// Threats are perceived at `BOT_VIEW_RANGE * THREAT_RANGE_FACTOR`
    pub const THREAT_RANGE_FACTOR: f32 = 1.5;
    /// Something is a threat once its radius exceeds ours by this factor
    pub const THREAT_MARGIN: f32 = 1.2;
    pub const BOT_FLEE_SPEED: f32 = 3.0 * FRAMES_PER_SECOND;
    pub const BOT_DECISION_INTERVAL_MS: f64 = 1000.0;
    pub const BOT_MOVEMENT_SMOOTHING: f32 = 0.08;

    /// Spawn zones: 10% squares anchored at 0% and 60% of each axis
    pub const SPAWN_ZONE_EXTENT: f32 = 0.1;
    pub const SPAWN_ZONE_FAR_ORIGIN: f32 = 0.6;

    /// Default viewport (screen pixels) before the host reports a size
    pub const DEFAULT_VIEWPORT_WIDTH: f32 = 1280.0;
    pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 720.0;
}

/// Map a hue in degrees to an `hsl(h, 70%, 50%)` CSS color string
pub fn hue_to_css(hue: f32) -> String {
    format!("hsl({}, 70%, 50%)", hue.rem_euclid(360.0).round())
}
