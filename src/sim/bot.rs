//! Bot perception, decisions and movement
//!
//! Each bot re-decides only when its decision interval has elapsed, but steers
//! toward its current target every tick:
//!
//! ```text
//!   decision due? ──no──────────────────────────────┐
//!        │yes                                       │
//!   bigger thing in threat range? ─yes─> Fleeing    │
//!        │no                                        │
//!   food in view range? ─yes─> SeekingFood          │
//!        │no                                        ▼
//!   Wandering                               steer toward target
//! ```
//!
//! Large and regular bots share this machine; they differ only at spawn.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{nearest, within_range};
use super::pool::AppearancePool;
use super::world::{Bot, BotClass, Food, World, clamp_to_bounds};
use crate::settings::ArenaConfig;

/// Closer than this to the target counts as arrived
const ARRIVE_DISTANCE: f32 = 1.0;

/// Current intent of a bot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BotMode {
    #[default]
    Wandering,
    SeekingFood,
    Fleeing,
}

/// Another blob as seen by a bot during a decision
#[derive(Debug, Clone, Copy)]
pub struct Perceived {
    /// Bot id, `None` for the player
    pub bot_id: Option<u32>,
    pub pos: Vec2,
    pub radius: f32,
}

/// True when the bot's decision interval has elapsed
pub fn decision_due(bot: &Bot, now_ms: f64, interval_ms: f64) -> bool {
    bot.last_decision_ms
        .is_none_or(|last| now_ms - last >= interval_ms)
}

/// Re-evaluate target, speed and mode
///
/// `others` holds every blob the bot could be afraid of (other bots and the
/// player); the bot's own entry is skipped by id.
pub fn decide<R: Rng>(
    bot: &mut Bot,
    others: &[Perceived],
    foods: &[Food],
    world: &World,
    config: &ArenaConfig,
    now_ms: f64,
    rng: &mut R,
) {
    bot.last_decision_ms = Some(now_ms);

    let threat_range = config.bot_view_range * config.threat_range_factor;
    let threats = others.iter().filter(|other| {
        other.bot_id != Some(bot.id)
            && within_range(bot.pos, other.pos, threat_range)
            && other.radius > bot.radius * config.threat_margin
    });

    if let Some((threat, _)) = nearest(bot.pos, threats.map(|t| (t, t.pos))) {
        let away = (bot.pos - threat.pos)
            .try_normalize()
            .or_else(|| (bot.pos - world.center()).try_normalize())
            .unwrap_or(Vec2::X);
        bot.mode = BotMode::Fleeing;
        bot.speed = config.bot_flee_speed;
        bot.target = world.clamp_point(bot.pos + away * config.bot_view_range, bot.radius);
        return;
    }

    bot.speed = bot.base_speed;

    let visible_food = foods
        .iter()
        .filter(|food| within_range(bot.pos, food.pos, config.bot_view_range))
        .map(|food| (food.pos, food.pos));
    if let Some((food_pos, _)) = nearest(bot.pos, visible_food) {
        bot.mode = BotMode::SeekingFood;
        bot.target = food_pos;
        return;
    }

    // Bolder bots wander further
    let spread = config.bot_view_range * (0.5 + bot.personality * 0.5);
    let offset = Vec2::new(
        rng.random_range(-0.5..0.5) * spread,
        rng.random_range(-0.5..0.5) * spread,
    );
    bot.mode = BotMode::Wandering;
    bot.target = world.clamp_point(bot.pos + offset, bot.radius);
}

/// Smooth velocity toward the target, advance, clamp. Returns true on a wall hit.
///
/// A wall hit zeroes the velocity and forces a fresh decision next tick.
pub fn steer(bot: &mut Bot, world: &World, smoothing: f32, dt: f32) -> bool {
    let to_target = bot.target - bot.pos;
    let dist = to_target.length();
    let desired = if dist > ARRIVE_DISTANCE && dt > 0.0 {
        // Don't ask for more than reaches the target this tick
        let speed = bot.speed.min(dist / dt);
        to_target / dist * speed
    } else {
        Vec2::ZERO
    };

    bot.vel += (desired - bot.vel) * smoothing;
    bot.pos += bot.vel * dt;

    let hit_wall = clamp_to_bounds(bot, world);
    if hit_wall {
        bot.vel = Vec2::ZERO;
        bot.last_decision_ms = None;
    }
    hit_wall
}

/// One of the four spawn zones away from the world center
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CornerZone {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl CornerZone {
    pub const ALL: [CornerZone; 4] = [
        CornerZone::TopLeft,
        CornerZone::TopRight,
        CornerZone::BottomLeft,
        CornerZone::BottomRight,
    ];

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Zone rectangle as (min, max) corners in world units
    pub fn rect(self, world: &World, config: &ArenaConfig) -> (Vec2, Vec2) {
        let far = config.spawn_zone_far_origin;
        let (fx, fy) = match self {
            CornerZone::TopLeft => (0.0, 0.0),
            CornerZone::TopRight => (far, 0.0),
            CornerZone::BottomLeft => (0.0, far),
            CornerZone::BottomRight => (far, far),
        };
        let min = Vec2::new(fx * world.width, fy * world.height);
        let extent = Vec2::new(world.width, world.height) * config.spawn_zone_extent;
        (min, min + extent)
    }

    /// True if a circle of `radius` at `pos` could have been spawned here
    pub fn contains(self, world: &World, config: &ArenaConfig, pos: Vec2, radius: f32) -> bool {
        let (min, max) = self.rect(world, config);
        // Spawn positions are clamped into the world, which can nudge them past the zone edge
        let min = world.clamp_point(min, radius);
        let max = world.clamp_point(max, radius);
        pos.x >= min.x && pos.x <= max.x && pos.y >= min.y && pos.y <= max.y
    }

    fn sample<R: Rng>(self, world: &World, config: &ArenaConfig, rng: &mut R) -> Vec2 {
        let (min, max) = self.rect(world, config);
        Vec2::new(
            rng.random_range(min.x..max.x),
            rng.random_range(min.y..max.y),
        )
    }
}

/// Create a fresh bot of `class` in a random corner zone
pub fn spawn_bot<R: Rng>(
    id: u32,
    class: BotClass,
    world: &World,
    config: &ArenaConfig,
    pool: &mut AppearancePool,
    rng: &mut R,
) -> Bot {
    let zone = CornerZone::random(rng);
    let (radius, base_speed, personality) = match class {
        BotClass::Large => (
            rng.random_range(config.large_bot_radius_min..config.large_bot_radius_max),
            config.large_bot_speed,
            rng.random_range(config.large_bot_personality_min..1.0),
        ),
        BotClass::Regular => (
            config.starting_radius
                * rng.random_range(config.regular_bot_scale_min..config.regular_bot_scale_max),
            config.regular_bot_speed,
            rng.random_range(0.0..1.0),
        ),
    };
    let pos = world.clamp_point(zone.sample(world, config, rng), radius);

    log::debug!("Spawned {:?} bot {} r={:.1} in {:?}", class, id, radius, zone);

    Bot {
        id,
        class,
        pos,
        radius,
        appearance: pool.draw(rng),
        base_speed,
        speed: base_speed,
        target: pos,
        last_decision_ms: None,
        personality,
        vel: Vec2::ZERO,
        mode: BotMode::Wandering,
    }
}
