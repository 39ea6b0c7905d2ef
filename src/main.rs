//! Blob Arena entry point
//!
//! The browser build is driven through `blob_arena::web`. Natively this runs a
//! headless round with a simple autopilot, which is handy for balance checks:
//!
//! ```text
//! RUST_LOG=info cargo run -- [seed] [max_seconds]
//! ```

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let max_secs: f64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(120.0);

    log::info!("Blob Arena (native) starting: seed={} limit={}s", seed, max_secs);
    let summary = autoplay::run(seed, max_secs);
    println!(
        "score={} peak_radius={:.1} duration={:.1}s reason={:?}",
        summary.final_score,
        summary.peak_radius,
        summary.duration_ms / 1000.0,
        summary.reason
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is blob_arena::web::start, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod autoplay {
    use blob_arena::session::{RoundSummary, ScoreSink, SubmitError};
    use blob_arena::sim::{EndReason, distance};
    use blob_arena::{ArenaConfig, Session};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Keeps the last summary and logs score changes
    #[derive(Default)]
    struct Outcome {
        summary: Option<RoundSummary>,
    }

    impl ScoreSink for Outcome {
        fn score_changed(&mut self, score: u64) {
            log::debug!("score: {}", score);
        }

        fn game_over(&mut self, summary: &RoundSummary) -> Result<(), SubmitError> {
            self.summary = Some(*summary);
            Ok(())
        }
    }

    /// Chase the nearest pellet, steer away from bigger bots
    fn steer(session: &mut Session<Outcome>) {
        let state = session.state();
        let player = &state.player;
        let threat = state
            .bots
            .iter()
            .filter(|b| b.radius > player.radius)
            .map(|b| (b.pos, distance(b.pos, player.pos)))
            .filter(|(_, d)| *d < 250.0)
            .min_by(|a, b| a.1.total_cmp(&b.1));

        let goal = match threat {
            Some((pos, _)) => player.pos + (player.pos - pos),
            None => state
                .foods
                .iter()
                .map(|f| (f.pos, distance(f.pos, player.pos)))
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map_or(player.pos, |(pos, _)| pos),
        };

        let screen = blob_arena::sim::world_to_screen(goal, &state.viewport);
        session.set_cursor(screen.x, screen.y);
    }

    pub fn run(seed: u64, max_secs: f64) -> RoundSummary {
        let mut session = Session::new(ArenaConfig::default(), seed, Outcome::default(), 0.0);
        let mut token = session.pending_frame();
        let mut now = 0.0;

        while let Some(t) = token {
            now += FRAME_MS;
            if now / 1000.0 > max_secs {
                session.end_game();
                break;
            }
            steer(&mut session);
            token = session.frame(t, now);
        }

        session.sink().summary.unwrap_or(RoundSummary {
            final_score: session.state().score(),
            peak_radius: session.state().player.peak_radius,
            duration_ms: now,
            ended_ms: now,
            reason: EndReason::Quit,
        })
    }
}
