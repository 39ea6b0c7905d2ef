//! Growth and decay policy
//!
//! Pure functions of radius and score. Two damping mechanisms stack:
//! - size damping: growth shrinks linearly as radius approaches the max size
//! - threshold penalty: growth is multiplied by `penalty_factor` for every
//!   `score_penalty_threshold` points already scored
//!
//! Food growth (player and bots alike) only sees size damping. The threshold
//! penalty belongs to the general [`growth_rate`], which the HUD reports.

use crate::settings::ArenaConfig;

/// Fraction of the max size already used, clamped to [0, 1]
#[inline]
fn size_ratio(radius: f32, config: &ArenaConfig) -> f32 {
    (radius / config.max_size()).clamp(0.0, 1.0)
}

/// Size-damped food growth: `max(floor, base * (1 - r / max))`
pub fn food_growth(radius: f32, config: &ArenaConfig) -> f32 {
    (config.food_growth * (1.0 - size_ratio(radius, config))).max(config.food_growth_floor)
}

/// `penalty_factor ^ floor(score / threshold)`
pub fn threshold_penalty(score: u64, config: &ArenaConfig) -> f32 {
    let thresholds = (score / config.score_penalty_threshold).min(i32::MAX as u64) as i32;
    config.growth_penalty_factor.powi(thresholds)
}

/// General growth rate: size damping times the threshold penalty
pub fn growth_rate(radius: f32, score: u64, config: &ArenaConfig) -> f32 {
    let size_based =
        (config.base_growth_rate * (1.0 - size_ratio(radius, config))).max(config.base_growth_floor);
    size_based * threshold_penalty(score, config)
}

/// Apply a growth amount, capped at the max size
#[inline]
pub fn grow(radius: f32, amount: f32, config: &ArenaConfig) -> f32 {
    (radius + amount).min(config.max_size())
}

/// Area-conserving absorption: `sqrt(a² + b²)`
#[inline]
pub fn absorb_radius(eater: f32, eaten: f32) -> f32 {
    (eater * eater + eaten * eaten).sqrt()
}

/// One decay interval. Never takes the radius below `min_decay_size`.
pub fn decay_step(radius: f32, config: &ArenaConfig) -> f32 {
    if radius > config.min_decay_size {
        (radius * config.decay_rate).max(config.min_decay_size)
    } else {
        radius
    }
}

/// Boost needs spare radius above the start size and no boost running
pub fn can_boost(radius: f32, boost_active: bool, config: &ArenaConfig) -> bool {
    !boost_active && radius > config.starting_radius
}
