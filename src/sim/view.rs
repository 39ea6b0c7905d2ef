//! Render snapshot
//!
//! After each tick a renderer asks for a [`RenderFrame`]: every visible
//! entity already mapped to screen pixels. Off-screen entities are culled.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::camera::world_to_screen;
use super::growth::growth_rate;
use super::state::{GamePhase, GameState};
use super::world::Appearance;

/// One circle to draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub appearance: Appearance,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub width: f32,
    pub height: f32,
    /// Screen position of the world origin (for grid/background alignment)
    pub world_origin: (f32, f32),
    pub foods: Vec<Sprite>,
    pub bots: Vec<Sprite>,
    pub player: Sprite,
    pub crowned: bool,
    pub boosting: bool,
    pub score: u64,
    /// General growth rate at the current size and score (HUD)
    pub growth_rate: f32,
    pub phase: GamePhase,
}

/// Build the frame for the current state
pub fn snapshot(state: &GameState) -> RenderFrame {
    let viewport = &state.viewport;
    let to_sprite = |pos: Vec2, radius: f32, appearance: Appearance| {
        let screen = world_to_screen(pos, viewport);
        Sprite {
            x: screen.x,
            y: screen.y,
            radius,
            appearance,
        }
    };

    let foods = state
        .foods
        .iter()
        .filter(|f| viewport.is_visible(f.pos, f.radius))
        .map(|f| to_sprite(f.pos, f.radius, Appearance::Flat { hue: f.hue }))
        .collect();

    let bots = state
        .bots
        .iter()
        .filter(|b| viewport.is_visible(b.pos, b.radius))
        .map(|b| to_sprite(b.pos, b.radius, b.appearance.clone()))
        .collect();

    let player_style = state.player.profile.clone().unwrap_or_default();
    let origin = world_to_screen(Vec2::ZERO, viewport);

    RenderFrame {
        width: viewport.width,
        height: viewport.height,
        world_origin: (origin.x, origin.y),
        foods,
        bots,
        player: to_sprite(state.player.pos, state.player.radius, player_style),
        crowned: state.crowned(),
        boosting: state.player.boost_active(state.clock_ms),
        score: state.score(),
        growth_rate: growth_rate(state.player.radius, state.score(), &state.config),
        phase: state.phase,
    }
}
