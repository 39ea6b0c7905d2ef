//! World bounds and entity records
//!
//! Entities are plain data. Everything that moves goes through
//! [`clamp_to_bounds`] afterwards so its whole circle stays inside the world.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bot::BotMode;

/// The fixed world rectangle, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub width: f32,
    pub height: f32,
}

impl World {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Clamp a point so a circle of `radius` around it fits in the world
    ///
    /// Uses max-then-min so an oversized radius pins to the far edge instead of panicking.
    pub fn clamp_point(&self, point: Vec2, radius: f32) -> Vec2 {
        Vec2::new(
            point.x.max(radius).min(self.width - radius),
            point.y.max(radius).min(self.height - radius),
        )
    }

    /// Largest circle that fits in the world at all
    pub fn max_radius(&self) -> f32 {
        self.width.min(self.height) / 2.0
    }

    /// True when the full circle lies inside the world
    pub fn contains(&self, pos: Vec2, radius: f32) -> bool {
        pos.x >= radius
            && pos.x <= self.width - radius
            && pos.y >= radius
            && pos.y <= self.height - radius
    }
}

/// Anything with a position and a radius
pub trait Body {
    fn pos(&self) -> Vec2;
    fn set_pos(&mut self, pos: Vec2);
    fn radius(&self) -> f32;
}

/// Pull `body` back inside `world`; returns true if a wall was hit
pub fn clamp_to_bounds<B: Body + ?Sized>(body: &mut B, world: &World) -> bool {
    let pos = body.pos();
    let clamped = world.clamp_point(pos, body.radius());
    if clamped != pos {
        body.set_pos(clamped);
        true
    } else {
        false
    }
}

/// How an entity should be drawn. Opaque to the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Appearance {
    /// Solid fill, hue in degrees
    Flat { hue: f32 },
    /// Profile picture; renderer falls back to the hue if the image is missing
    Profile { image: String, fallback_hue: f32 },
}

impl Default for Appearance {
    fn default() -> Self {
        // Player is drawn white when no profile is set
        Appearance::Flat { hue: 0.0 }
    }
}

impl Appearance {
    /// Hue to use when the image can't be drawn
    pub fn hue(&self) -> f32 {
        match self {
            Appearance::Flat { hue } => *hue,
            Appearance::Profile { fallback_hue, .. } => *fallback_hue,
        }
    }
}

/// The player-controlled blob
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    /// Base speed, units per second
    pub speed: f32,
    pub score: u64,
    /// Boost expiry timestamp (ms); `None` when no boost is active
    pub boost_until_ms: Option<f64>,
    /// Cosmetic profile style (None draws a flat white circle)
    pub profile: Option<Appearance>,
    /// Largest radius reached this round
    pub peak_radius: f32,
}

impl Player {
    pub fn new(pos: Vec2, radius: f32, speed: f32) -> Self {
        Self {
            pos,
            radius,
            speed,
            score: 0,
            boost_until_ms: None,
            profile: None,
            peak_radius: radius,
        }
    }

    /// Boost flag, considering expiry
    pub fn boost_active(&self, now_ms: f64) -> bool {
        self.boost_until_ms.is_some_and(|until| now_ms < until)
    }

    /// Record a radius change, tracking the round peak
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius;
        self.peak_radius = self.peak_radius.max(radius);
    }
}

impl Body for Player {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn set_pos(&mut self, pos: Vec2) {
        self.pos = pos;
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

/// Spawn bucket; decides starting radius, speed and personality range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BotClass {
    Large,
    Regular,
}

impl BotClass {
    pub fn is_large(self) -> bool {
        self == BotClass::Large
    }
}

/// An AI-controlled blob
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bot {
    pub id: u32,
    pub class: BotClass,
    pub pos: Vec2,
    pub radius: f32,
    pub appearance: Appearance,
    /// Non-flee speed, units per second
    pub base_speed: f32,
    /// Current speed (flee speed while fleeing)
    pub speed: f32,
    pub target: Vec2,
    /// When the bot last re-decided; `None` forces a decision next tick
    pub last_decision_ms: Option<f64>,
    /// Behavioral bias in [0, 1]
    pub personality: f32,
    /// Smoothed velocity, units per second
    pub vel: Vec2,
    pub mode: BotMode,
}

impl Body for Bot {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn set_pos(&mut self, pos: Vec2) {
        self.pos = pos;
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

/// A static pellet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Food {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    /// Decorative hue in degrees
    pub hue: f32,
    /// Nutritional yield
    pub score: f32,
}

impl Body for Food {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn set_pos(&mut self, pos: Vec2) {
        self.pos = pos;
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}
