//! Viewport centered on the player
//!
//! Pure coordinate bookkeeping: the camera never touches game state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Camera center in world units plus the rendering surface size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(center: Vec2, width: f32, height: f32) -> Self {
        Self {
            center,
            width,
            height,
        }
    }

    /// Screen position of the view center
    pub fn screen_center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// True if a circle at world `pos` could show up on screen
    pub fn is_visible(&self, pos: Vec2, radius: f32) -> bool {
        let screen = world_to_screen(pos, self);
        screen.x + radius >= 0.0
            && screen.x - radius <= self.width
            && screen.y + radius >= 0.0
            && screen.y - radius <= self.height
    }
}

/// Recenter on the player and pick up a resized canvas
pub fn update_viewport(viewport: &mut Viewport, player_pos: Vec2, canvas_size: Option<(f32, f32)>) {
    viewport.center = player_pos;
    if let Some((width, height)) = canvas_size {
        if width > 0.0 && height > 0.0 {
            viewport.width = width;
            viewport.height = height;
        }
    }
}

/// World coordinates to screen pixels
#[inline]
pub fn world_to_screen(world: Vec2, viewport: &Viewport) -> Vec2 {
    world - viewport.center + viewport.screen_center()
}

/// Screen pixels to world coordinates
#[inline]
pub fn screen_to_world(screen: Vec2, viewport: &Viewport) -> Vec2 {
    screen - viewport.screen_center() + viewport.center
}
