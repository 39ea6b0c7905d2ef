//! Arena tuning
//!
//! Every gameplay number lives here so a round can be rebalanced without a
//! rebuild. Persisted in LocalStorage on the web, defaults everywhere else.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Rejected tuning
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("world must be positive, got {width}x{height}")]
    World { width: f32, height: f32 },
    #[error("starting radius {start} must be positive and below max size {max}")]
    StartingRadius { start: f32, max: f32 },
    #[error("decay rate {0} must be within (0, 1]")]
    DecayRate(f32),
    #[error("growth penalty factor {0} must be within (0, 1]")]
    PenaltyFactor(f32),
    #[error("score penalty threshold must be non-zero")]
    PenaltyThreshold,
    #[error("bot movement smoothing {0} must be within (0, 1]")]
    Smoothing(f32),
    #[error("{0} interval must be positive")]
    Interval(&'static str),
    #[error("max size {max} must be positive and at most half the world ({limit})")]
    MaxSize { max: f32, limit: f32 },
    #[error("{0} range is empty or out of bounds")]
    Range(&'static str),
    #[error("{0} must be a finite number")]
    NotFinite(&'static str),
}

/// Data-driven game balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    // === World ===
    pub world_width: f32,
    pub world_height: f32,
    /// Cap on any entity radius, as a fraction of world width
    pub max_size_fraction: f32,

    // === Player ===
    pub starting_radius: f32,
    /// Units per second
    pub player_speed: f32,
    pub cursor_full_speed_distance: f32,
    pub boost_cost: f32,
    pub boost_duration_ms: f64,
    pub boost_multiplier: f32,

    // === Food ===
    pub food_count: usize,
    pub food_radius: f32,
    pub food_growth: f32,
    pub food_growth_floor: f32,
    /// Nutrition range of a pellet
    pub food_min_score: f32,
    pub food_max_score: f32,

    // === Growth / decay ===
    pub base_growth_rate: f32,
    pub base_growth_floor: f32,
    pub growth_penalty_factor: f32,
    pub score_penalty_threshold: u64,
    pub points_per_food: u64,
    pub points_per_bot: u64,
    pub decay_rate: f32,
    pub min_decay_size: f32,
    pub decay_interval_ms: f64,

    // === Bots ===
    pub large_bot_count: usize,
    pub regular_bot_count: usize,
    pub large_bot_radius_min: f32,
    pub large_bot_radius_max: f32,
    pub large_bot_speed: f32,
    pub large_bot_personality_min: f32,
    /// Regular bot radius as a fraction of the starting radius
    pub regular_bot_scale_min: f32,
    pub regular_bot_scale_max: f32,
    pub regular_bot_speed: f32,
    /// Corner spawn zone size, as a fraction of each world axis
    pub spawn_zone_extent: f32,
    /// Where the far zones start, as a fraction of each world axis
    pub spawn_zone_far_origin: f32,
    pub bot_view_range: f32,
    pub threat_range_factor: f32,
    pub threat_margin: f32,
    pub bot_flee_speed: f32,
    pub bot_decision_interval_ms: f64,
    pub bot_movement_smoothing: f32,

    // === Camera ===
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            max_size_fraction: MAX_SIZE_FRACTION,

            starting_radius: STARTING_RADIUS,
            player_speed: PLAYER_SPEED,
            cursor_full_speed_distance: CURSOR_FULL_SPEED_DISTANCE,
            boost_cost: BOOST_COST,
            boost_duration_ms: BOOST_DURATION_MS,
            boost_multiplier: BOOST_MULTIPLIER,

            food_count: FOOD_COUNT,
            food_radius: FOOD_RADIUS,
            food_growth: FOOD_GROWTH,
            food_growth_floor: FOOD_GROWTH_FLOOR,
            food_min_score: FOOD_MIN_SCORE,
            food_max_score: FOOD_MAX_SCORE,

            base_growth_rate: BASE_GROWTH_RATE,
            base_growth_floor: BASE_GROWTH_FLOOR,
            growth_penalty_factor: GROWTH_PENALTY_FACTOR,
            score_penalty_threshold: SCORE_PENALTY_THRESHOLD,
            points_per_food: POINTS_PER_FOOD,
            points_per_bot: POINTS_PER_BOT,
            decay_rate: MASS_DECAY_RATE,
            min_decay_size: MIN_DECAY_SIZE,
            decay_interval_ms: DECAY_INTERVAL_MS,

            large_bot_count: LARGE_BOT_COUNT,
            regular_bot_count: REGULAR_BOT_COUNT,
            large_bot_radius_min: LARGE_BOT_RADIUS_MIN,
            large_bot_radius_max: LARGE_BOT_RADIUS_MAX,
            large_bot_speed: LARGE_BOT_SPEED,
            large_bot_personality_min: LARGE_BOT_PERSONALITY_MIN,
            regular_bot_scale_min: REGULAR_BOT_SCALE_MIN,
            regular_bot_scale_max: REGULAR_BOT_SCALE_MAX,
            regular_bot_speed: REGULAR_BOT_SPEED,
            spawn_zone_extent: SPAWN_ZONE_EXTENT,
            spawn_zone_far_origin: SPAWN_ZONE_FAR_ORIGIN,
            bot_view_range: BOT_VIEW_RANGE,
            threat_range_factor: THREAT_RANGE_FACTOR,
            threat_margin: THREAT_MARGIN,
            bot_flee_speed: BOT_FLEE_SPEED,
            bot_decision_interval_ms: BOT_DECISION_INTERVAL_MS,
            bot_movement_smoothing: BOT_MOVEMENT_SMOOTHING,

            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl ArenaConfig {
    /// Largest radius any entity may reach
    pub fn max_size(&self) -> f32 {
        self.world_width * self.max_size_fraction
    }

    /// Radius above which the player wears a crown
    pub fn crown_threshold(&self) -> f32 {
        self.starting_radius * CROWN_FACTOR
    }

    /// Parse and validate a JSON document (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject tuning the simulation cannot honor
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.check_finite()?;

        if !(self.world_width > 0.0 && self.world_height > 0.0) {
            return Err(ConfigError::World {
                width: self.world_width,
                height: self.world_height,
            });
        }
        let max = self.max_size();
        let limit = self.world_width.min(self.world_height) / 2.0;
        if !(max > 0.0 && max <= limit) {
            return Err(ConfigError::MaxSize { max, limit });
        }
        if !(self.starting_radius > 0.0 && self.starting_radius < max) {
            return Err(ConfigError::StartingRadius {
                start: self.starting_radius,
                max,
            });
        }
        if !(self.decay_rate > 0.0 && self.decay_rate <= 1.0) {
            return Err(ConfigError::DecayRate(self.decay_rate));
        }
        if !(self.growth_penalty_factor > 0.0 && self.growth_penalty_factor <= 1.0) {
            return Err(ConfigError::PenaltyFactor(self.growth_penalty_factor));
        }
        if self.score_penalty_threshold == 0 {
            return Err(ConfigError::PenaltyThreshold);
        }
        if !(self.bot_movement_smoothing > 0.0 && self.bot_movement_smoothing <= 1.0) {
            return Err(ConfigError::Smoothing(self.bot_movement_smoothing));
        }
        if !(self.decay_interval_ms > 0.0) {
            return Err(ConfigError::Interval("decay"));
        }
        if !(self.bot_decision_interval_ms > 0.0) {
            return Err(ConfigError::Interval("bot decision"));
        }

        // Spawn ranges must be non-empty
        if !(self.food_min_score < self.food_max_score) {
            return Err(ConfigError::Range("food score"));
        }
        if !(self.large_bot_radius_min > 0.0 && self.large_bot_radius_min < self.large_bot_radius_max) {
            return Err(ConfigError::Range("large bot radius"));
        }
        if !(self.regular_bot_scale_min > 0.0 && self.regular_bot_scale_min < self.regular_bot_scale_max) {
            return Err(ConfigError::Range("regular bot scale"));
        }
        if !(0.0..1.0).contains(&self.large_bot_personality_min) {
            return Err(ConfigError::Range("large bot personality"));
        }
        if !(self.spawn_zone_extent > 0.0
            && self.spawn_zone_far_origin >= self.spawn_zone_extent
            && self.spawn_zone_far_origin + self.spawn_zone_extent <= 1.0)
        {
            return Err(ConfigError::Range("spawn zone"));
        }
        Ok(())
    }

    /// Every float field must be a real number
    fn check_finite(&self) -> Result<(), ConfigError> {
        let fields = [
            ("world_width", f64::from(self.world_width)),
            ("world_height", f64::from(self.world_height)),
            ("max_size_fraction", f64::from(self.max_size_fraction)),
            ("starting_radius", f64::from(self.starting_radius)),
            ("player_speed", f64::from(self.player_speed)),
            ("cursor_full_speed_distance", f64::from(self.cursor_full_speed_distance)),
            ("boost_cost", f64::from(self.boost_cost)),
            ("boost_duration_ms", self.boost_duration_ms),
            ("boost_multiplier", f64::from(self.boost_multiplier)),
            ("food_radius", f64::from(self.food_radius)),
            ("food_growth", f64::from(self.food_growth)),
            ("food_growth_floor", f64::from(self.food_growth_floor)),
            ("food_min_score", f64::from(self.food_min_score)),
            ("food_max_score", f64::from(self.food_max_score)),
            ("base_growth_rate", f64::from(self.base_growth_rate)),
            ("base_growth_floor", f64::from(self.base_growth_floor)),
            ("growth_penalty_factor", f64::from(self.growth_penalty_factor)),
            ("decay_rate", f64::from(self.decay_rate)),
            ("min_decay_size", f64::from(self.min_decay_size)),
            ("decay_interval_ms", self.decay_interval_ms),
            ("large_bot_radius_min", f64::from(self.large_bot_radius_min)),
            ("large_bot_radius_max", f64::from(self.large_bot_radius_max)),
            ("large_bot_speed", f64::from(self.large_bot_speed)),
            ("large_bot_personality_min", f64::from(self.large_bot_personality_min)),
            ("regular_bot_scale_min", f64::from(self.regular_bot_scale_min)),
            ("regular_bot_scale_max", f64::from(self.regular_bot_scale_max)),
            ("regular_bot_speed", f64::from(self.regular_bot_speed)),
            ("spawn_zone_extent", f64::from(self.spawn_zone_extent)),
            ("spawn_zone_far_origin", f64::from(self.spawn_zone_far_origin)),
            ("bot_view_range", f64::from(self.bot_view_range)),
            ("threat_range_factor", f64::from(self.threat_range_factor)),
            ("threat_margin", f64::from(self.threat_margin)),
            ("bot_flee_speed", f64::from(self.bot_flee_speed)),
            ("bot_decision_interval_ms", self.bot_decision_interval_ms),
            ("bot_movement_smoothing", f64::from(self.bot_movement_smoothing)),
            ("viewport_width", f64::from(self.viewport_width)),
            ("viewport_height", f64::from(self.viewport_height)),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite(name));
            }
        }
        Ok(())
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "blob_arena_config";

    /// Load tuning from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded arena config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored arena config: {}", e),
                }
            }
        }

        log::info!("Using default arena config");
        Self::default()
    }

    /// Save tuning to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Arena config saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
