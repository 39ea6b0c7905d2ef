//! Round orchestration
//!
//! A [`Session`] owns one [`GameState`] and everything that drives it from the
//! outside: the host's frame callback, the wall-clock decay timer and the
//! score collaborator. The host loop looks like:
//!
//! ```text
//! token = session.pending_frame()
//! on animation frame(now):  token = session.frame(token, now)
//! on pointer move:          session.set_cursor(x, y)
//! on "End Game":            session.end_game()
//! on "Play again":          session.restart(seed, now)
//! ```
//!
//! Stopping always cancels the frame and decay timer before state is touched,
//! so a frame the host had already queued can never land on a fresh round.

use glam::Vec2;
use thiserror::Error;

use crate::consts::{FRAMES_PER_SECOND, MAX_FRAME_DT};
use crate::settings::ArenaConfig;
use crate::sim::{
    Appearance, DecayTimer, EndReason, FrameScheduler, FrameToken, GameEvent, GamePhase, GameState,
    RenderFrame, SimEvent, TickInput, snapshot, tick,
};

/// The score collaborator could not take the final score
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("score submission rejected: {0}")]
    Rejected(String),
    #[error("score sink unavailable")]
    Unavailable,
}

/// What a finished round hands to the score collaborator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundSummary {
    pub final_score: u64,
    pub peak_radius: f32,
    pub duration_ms: f64,
    /// Host timestamp when the round ended (ms)
    pub ended_ms: f64,
    pub reason: EndReason,
}

/// Receives score updates and the end-of-round notification
pub trait ScoreSink {
    /// Called whenever the score changes (including the reset to 0)
    fn score_changed(&mut self, score: u64);

    /// Called exactly once per round. A failure is logged; the round stays over.
    fn game_over(&mut self, summary: &RoundSummary) -> Result<(), SubmitError>;
}

/// Sink that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ScoreSink for NullSink {
    fn score_changed(&mut self, _score: u64) {}

    fn game_over(&mut self, _summary: &RoundSummary) -> Result<(), SubmitError> {
        Ok(())
    }
}

/// One player's sequence of rounds
pub struct Session<S: ScoreSink> {
    state: GameState,
    sink: S,
    frames: FrameScheduler,
    decay: DecayTimer,
    last_frame_ms: Option<f64>,
    cursor: Option<Vec2>,
    boost_held: bool,
    /// Game-over already delivered for the current round
    notified: bool,
}

impl<S: ScoreSink> Session<S> {
    /// Start a round at host time `now_ms`
    pub fn new(config: ArenaConfig, seed: u64, sink: S, now_ms: f64) -> Self {
        Self::with_profiles(config, seed, sink, now_ms, None, Vec::new())
    }

    /// Start a round with a player style and bot profile images
    pub fn with_profiles(
        config: ArenaConfig,
        seed: u64,
        sink: S,
        now_ms: f64,
        player_profile: Option<Appearance>,
        bot_images: Vec<String>,
    ) -> Self {
        let decay = DecayTimer::new(config.decay_interval_ms);
        let mut state = GameState::with_profiles(config, seed, player_profile, bot_images);
        state.clock_ms = now_ms;
        state.started_ms = now_ms;

        let mut session = Self {
            state,
            sink,
            frames: FrameScheduler::default(),
            decay,
            last_frame_ms: None,
            cursor: None,
            boost_held: false,
            notified: false,
        };
        session.start(now_ms);
        session
    }

    /// Arm timers, flush the initial score and request the first frame
    fn start(&mut self, now_ms: f64) {
        self.decay.arm(now_ms);
        self.last_frame_ms = None;
        self.notified = false;
        self.dispatch();
        self.frames.schedule();
    }

    /// Cancel the frame request and the decay timer
    fn stop_timers(&mut self) {
        self.frames.cancel_all();
        self.decay.cancel();
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for hosts that script a round (tutorials, tests)
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Frame the host should deliver next, if any
    pub fn pending_frame(&self) -> Option<FrameToken> {
        self.frames.pending()
    }

    /// Pointer position in screen pixels
    pub fn set_cursor(&mut self, x: f32, y: f32) {
        self.cursor = Some(Vec2::new(x, y));
    }

    /// Boost key state
    pub fn set_boost(&mut self, held: bool) {
        self.boost_held = held;
    }

    /// Rendering surface changed size; applied on the next tick
    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.events.push(SimEvent::Resize { width, height });
    }

    /// Run one frame. Returns the token for the next frame while the round runs.
    pub fn frame(&mut self, token: FrameToken, now_ms: f64) -> Option<FrameToken> {
        if !self.frames.take(token) {
            log::debug!("Dropping stale frame {:?}", token);
            return None;
        }
        if !self.state.is_running() {
            return None;
        }

        let dt = match self.last_frame_ms {
            Some(last) => (((now_ms - last) / 1000.0) as f32).clamp(0.0, MAX_FRAME_DT),
            None => 1.0 / FRAMES_PER_SECOND,
        };
        self.last_frame_ms = Some(now_ms);

        let intervals = self.decay.poll(now_ms);
        if intervals > 0 {
            self.state.events.push(SimEvent::Decay { intervals });
        }

        let input = TickInput {
            cursor: self.cursor,
            boost: self.boost_held,
            now_ms,
        };
        tick(&mut self.state, &input, dt);
        self.dispatch();

        if self.state.is_running() {
            Some(self.frames.schedule())
        } else {
            self.stop_timers();
            None
        }
    }

    /// External "end game" signal. Ignored if the round already ended.
    pub fn end_game(&mut self) {
        self.stop_timers();
        if self.state.end_round(EndReason::Quit) {
            self.dispatch();
        }
    }

    /// Start a new round. Only valid once the current round is over.
    pub fn restart(&mut self, seed: u64, now_ms: f64) -> bool {
        if self.state.phase != GamePhase::GameOver {
            log::warn!("Restart ignored: round still {:?}", self.state.phase);
            return false;
        }
        // Cancel first, then reset
        self.stop_timers();
        self.state.initialize(seed, now_ms);
        self.start(now_ms);
        log::info!("Round restarted with seed {}", seed);
        true
    }

    /// Screen-space state for the renderer
    pub fn snapshot(&self) -> RenderFrame {
        snapshot(&self.state)
    }

    /// Forward simulation events to the sink
    fn dispatch(&mut self) {
        for event in self.state.take_events() {
            match event {
                GameEvent::ScoreChanged { score } => self.sink.score_changed(score),
                GameEvent::BotAbsorbed { bot_id, class } => {
                    log::debug!("Absorbed {:?} bot {}", class, bot_id);
                }
                GameEvent::GameOver {
                    final_score,
                    reason,
                } => {
                    if self.notified {
                        continue;
                    }
                    self.notified = true;
                    let summary = RoundSummary {
                        final_score,
                        peak_radius: self.state.player.peak_radius,
                        duration_ms: self.state.clock_ms - self.state.started_ms,
                        ended_ms: self.state.clock_ms,
                        reason,
                    };
                    if let Err(e) = self.sink.game_over(&summary) {
                        log::error!("Error submitting score {}: {}", final_score, e);
                    }
                }
            }
        }
    }
}
