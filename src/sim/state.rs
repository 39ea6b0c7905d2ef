//! Game state and round lifecycle
//!
//! `GameState` is the single owner of every entity in a round. Nothing else
//! keeps a mutable handle: the tick, the session and tests all borrow it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bot::spawn_bot;
use super::camera::Viewport;
use super::clock::{EventQueue, SimEvent};
use super::pool::AppearancePool;
use super::world::{Appearance, Bot, BotClass, Food, Player, World};
use crate::consts::PLAYER_START_OFFSET_X;
use crate::settings::ArenaConfig;

/// Round lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Entities being (re)built
    Initializing,
    /// Active gameplay
    Running,
    /// Round ended; ticks are no-ops until restart
    GameOver,
}

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// A strictly larger bot touched the player
    Eaten { bot_id: u32 },
    /// External "end game" signal
    Quit,
}

/// Outward notifications produced by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged { score: u64 },
    BotAbsorbed { bot_id: u32, class: BotClass },
    GameOver { final_score: u64, reason: EndReason },
}

/// Complete round state (the simulation aggregate)
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: ArenaConfig,
    pub world: World,
    /// Seed of the current round
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub player: Player,
    /// Sorted by id for deterministic iteration
    pub bots: Vec<Bot>,
    pub foods: Vec<Food>,
    pub viewport: Viewport,
    pub pool: AppearancePool,
    /// Events waiting for the next tick
    pub events: EventQueue,
    /// Host timestamp of the latest tick (ms)
    pub clock_ms: f64,
    /// Host timestamp when the round started (ms)
    pub started_ms: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Score captured when the round ended
    pub final_score: Option<u64>,
    /// Cosmetic player style carried across rounds
    player_profile: Option<Appearance>,
    outbox: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a running round with no profile images
    pub fn new(config: ArenaConfig, seed: u64) -> Self {
        Self::with_profiles(config, seed, None, Vec::new())
    }

    /// Create a running round with a player style and a pool of bot images
    pub fn with_profiles(
        config: ArenaConfig,
        seed: u64,
        player_profile: Option<Appearance>,
        bot_images: Vec<String>,
    ) -> Self {
        let world = World::new(config.world_width, config.world_height);
        let viewport = Viewport::new(world.center(), config.viewport_width, config.viewport_height);
        let player = Player::new(world.center(), config.starting_radius, config.player_speed);
        let mut state = Self {
            world,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Initializing,
            player,
            bots: Vec::new(),
            foods: Vec::new(),
            viewport,
            pool: AppearancePool::new(bot_images),
            events: EventQueue::default(),
            clock_ms: 0.0,
            started_ms: 0.0,
            time_ticks: 0,
            final_score: None,
            player_profile,
            outbox: Vec::new(),
            next_id: 1,
            config,
        };
        state.initialize(seed, 0.0);
        state
    }

    /// Reset everything for a fresh round and enter `Running`
    pub fn initialize(&mut self, seed: u64, now_ms: f64) {
        self.phase = GamePhase::Initializing;
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.next_id = 1;
        self.time_ticks = 0;
        self.clock_ms = now_ms;
        self.started_ms = now_ms;
        self.final_score = None;
        self.outbox.clear();

        // The surface size outlives the round; a resize reported while the
        // round was over still applies. Pending decay does not carry over.
        let (mut width, mut height) = (self.viewport.width, self.viewport.height);
        for event in self.events.drain() {
            if let SimEvent::Resize { width: w, height: h } = event {
                if w > 0.0 && h > 0.0 {
                    (width, height) = (w, h);
                }
            }
        }
        self.pool.reset();

        self.player = Player::new(
            self.start_position(),
            self.config.starting_radius,
            self.config.player_speed,
        );
        self.player.profile = self.player_profile.clone();

        self.foods.clear();
        self.replenish_food();

        self.bots.clear();
        self.replace_bots();

        self.viewport = Viewport::new(self.player.pos, width, height);

        self.phase = GamePhase::Running;
        self.outbox.push(GameEvent::ScoreChanged { score: 0 });

        log::info!(
            "Round initialized: seed={} food={} bots={}",
            seed,
            self.foods.len(),
            self.bots.len()
        );
    }

    /// Fixed player start: just right of world center
    pub fn start_position(&self) -> Vec2 {
        let start = self.world.center() + Vec2::new(PLAYER_START_OFFSET_X, 0.0);
        self.world.clamp_point(start, self.config.starting_radius)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn score(&self) -> u64 {
        self.player.score
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Whether the player currently wears the crown
    pub fn crowned(&self) -> bool {
        self.player.radius > self.config.crown_threshold()
    }

    /// Add points and announce the new score
    pub fn add_score(&mut self, points: u64) {
        if points == 0 {
            return;
        }
        self.player.score += points;
        self.outbox.push(GameEvent::ScoreChanged {
            score: self.player.score,
        });
    }

    /// Enter `GameOver` once. Returns false if the round had already ended.
    pub fn end_round(&mut self, reason: EndReason) -> bool {
        if self.phase == GamePhase::GameOver {
            return false;
        }
        let final_score = self.player.score;
        self.phase = GamePhase::GameOver;
        self.final_score = Some(final_score);
        self.outbox.push(GameEvent::GameOver {
            final_score,
            reason,
        });
        log::info!("Round over ({:?}): final score {}", reason, final_score);
        true
    }

    /// Record an outward event
    pub fn emit(&mut self, event: GameEvent) {
        self.outbox.push(event);
    }

    /// Take the events produced since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// Spawn one pellet at a random in-bounds position
    pub fn spawn_food(&mut self) {
        let id = self.next_entity_id();
        let radius = self.config.food_radius;
        let pos = Vec2::new(
            self.rng.random_range(0.0..self.world.width),
            self.rng.random_range(0.0..self.world.height),
        );
        let food = Food {
            id,
            pos: self.world.clamp_point(pos, radius),
            radius,
            hue: self.rng.random_range(0.0..360.0),
            score: self
                .rng
                .random_range(self.config.food_min_score..self.config.food_max_score),
        };
        self.foods.push(food);
    }

    /// Top food back up to the configured count
    pub fn replenish_food(&mut self) {
        while self.foods.len() < self.config.food_count {
            self.spawn_food();
        }
    }

    pub fn bot_count(&self, class: BotClass) -> usize {
        self.bots.iter().filter(|b| b.class == class).count()
    }

    /// Spawn bots until each class is back at its configured count
    pub fn replace_bots(&mut self) {
        for (class, target) in [
            (BotClass::Large, self.config.large_bot_count),
            (BotClass::Regular, self.config.regular_bot_count),
        ] {
            let mut have = self.bot_count(class);
            while have < target {
                let id = self.next_entity_id();
                let bot = spawn_bot(
                    id,
                    class,
                    &self.world,
                    &self.config,
                    &mut self.pool,
                    &mut self.rng,
                );
                self.bots.push(bot);
                have += 1;
            }
        }
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.bots.sort_by_key(|b| b.id);
        self.foods.sort_by_key(|f| f.id);
    }
}
