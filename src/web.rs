//! Browser bindings
//!
//! The page owns the canvas and the `requestAnimationFrame` loop; this module
//! exposes a [`WebArena`] handle it drives. Frame tokens cross the boundary as
//! opaque JSON strings so a frame queued before a restart is recognized as
//! stale on the Rust side.

use wasm_bindgen::prelude::*;

use crate::highscores::HighScores;
use crate::session::Session;
use crate::settings::ArenaConfig;
use crate::sim::{Appearance, FrameToken};

/// Install the panic hook and console logger once per page
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Blob Arena starting...");
}

fn seed_from_clock() -> u64 {
    js_sys::Date::now() as u64
}

/// One browser game
#[wasm_bindgen]
pub struct WebArena {
    session: Session<HighScores>,
}

#[wasm_bindgen]
impl WebArena {
    /// Start a round. `profile_image` styles the player; `bot_images` feed the
    /// bot appearance pool.
    #[wasm_bindgen(constructor)]
    pub fn new(profile_image: Option<String>, bot_images: Vec<String>) -> WebArena {
        let config = ArenaConfig::load();
        let profile = profile_image.map(|image| Appearance::Profile {
            image,
            fallback_hue: 200.0,
        });
        let session = Session::with_profiles(
            config,
            seed_from_clock(),
            HighScores::load(),
            js_sys::Date::now(),
            profile,
            bot_images,
        );
        WebArena { session }
    }

    /// Token of the frame the page should request next, if any
    #[wasm_bindgen(js_name = pendingFrame)]
    pub fn pending_frame(&self) -> Option<String> {
        self.session
            .pending_frame()
            .and_then(|t| serde_json::to_string(&t).ok())
    }

    /// Deliver a frame. Returns the next token while the round runs.
    pub fn frame(&mut self, token: &str, now_ms: f64) -> Option<String> {
        let token: FrameToken = match serde_json::from_str(token) {
            Ok(t) => t,
            Err(e) => {
                log::warn!("Bad frame token {:?}: {}", token, e);
                return None;
            }
        };
        self.session
            .frame(token, now_ms)
            .and_then(|t| serde_json::to_string(&t).ok())
    }

    /// Pointer position in canvas pixels
    #[wasm_bindgen(js_name = setCursor)]
    pub fn set_cursor(&mut self, x: f32, y: f32) {
        self.session.set_cursor(x, y);
    }

    pub fn boost(&mut self, held: bool) {
        self.session.set_boost(held);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.session.resize(width, height);
    }

    #[wasm_bindgen(js_name = endGame)]
    pub fn end_game(&mut self) {
        self.session.end_game();
    }

    /// Start a fresh round after game over
    pub fn restart(&mut self) -> bool {
        self.session.restart(seed_from_clock(), js_sys::Date::now())
    }

    pub fn score(&self) -> f64 {
        self.session.state().score() as f64
    }

    #[wasm_bindgen(js_name = isGameOver)]
    pub fn is_game_over(&self) -> bool {
        !self.session.state().is_running()
    }

    /// Current frame as JSON for the canvas renderer
    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.snapshot())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Leaderboard as JSON
    #[wasm_bindgen(js_name = highScores)]
    pub fn high_scores(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.session.sink())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
