//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Time only from the host timestamps passed in
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod bot;
pub mod camera;
pub mod clock;
pub mod collision;
pub mod growth;
pub mod pool;
pub mod state;
pub mod tick;
pub mod view;
pub mod world;

pub use bot::{BotMode, CornerZone, Perceived, decide, spawn_bot, steer};
pub use camera::{Viewport, screen_to_world, update_viewport, world_to_screen};
pub use clock::{DecayTimer, EventQueue, FrameScheduler, FrameToken, SimEvent};
pub use collision::{check_collision, distance, within_range};
pub use growth::{
    absorb_radius, decay_step, food_growth, grow, growth_rate, threshold_penalty,
};
pub use pool::AppearancePool;
pub use state::{EndReason, GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
pub use view::{RenderFrame, Sprite, snapshot};
pub use world::{Appearance, Body, Bot, BotClass, Food, Player, World, clamp_to_bounds};
