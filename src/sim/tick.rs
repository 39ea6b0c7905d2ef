//! Per-frame simulation step
//!
//! One call advances a running round by one rendered frame:
//! queued events → boost → player movement → food pass → bot collision pass
//! → bot AI pass → respawn → camera. A round that is not `Running` is frozen.

use glam::Vec2;

use super::bot::{Perceived, decide, decision_due, steer};
use super::camera::update_viewport;
use super::clock::SimEvent;
use super::collision::bodies_collide;
use super::growth::{absorb_radius, can_boost, decay_step, food_growth, grow};
use super::state::{EndReason, GameEvent, GamePhase, GameState};
use super::world::clamp_to_bounds;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Cursor position in screen pixels; `None` leaves the player coasting in place
    pub cursor: Option<Vec2>,
    /// Boost trigger (held key)
    pub boost: bool,
    /// Host timestamp for this frame (ms)
    pub now_ms: f64,
}

/// Advance the game state by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.phase != GamePhase::Running {
        return;
    }

    state.time_ticks += 1;
    state.clock_ms = input.now_ms;
    let now_ms = input.now_ms;

    // Timer-driven work queued since the last frame
    let mut resize = None;
    for event in state.events.drain() {
        match event {
            SimEvent::Decay { intervals } => {
                for _ in 0..intervals {
                    let radius = decay_step(state.player.radius, &state.config);
                    state.player.set_radius(radius);
                }
            }
            SimEvent::Resize { width, height } => resize = Some((width, height)),
        }
    }

    // Boost: expire, then maybe start a new one
    if state.player.boost_until_ms.is_some() && !state.player.boost_active(now_ms) {
        state.player.boost_until_ms = None;
    }
    if input.boost && can_boost(state.player.radius, state.player.boost_active(now_ms), &state.config)
    {
        let radius = state.player.radius - state.config.boost_cost;
        state.player.radius = radius.max(state.config.starting_radius);
        state.player.boost_until_ms = Some(now_ms + state.config.boost_duration_ms);
    }

    move_player(state, input.cursor, dt);

    eat_food(state);

    if resolve_player_bot_collisions(state) {
        // Eaten: the round froze mid-tick
        return;
    }

    run_bots(state, dt);

    state.replenish_food();
    state.replace_bots();

    // Growth this tick may have pushed the player past a wall
    clamp_to_bounds(&mut state.player, &state.world);
    update_viewport(&mut state.viewport, state.player.pos, resize);

    state.normalize_order();
}

/// Steer the player toward the cursor (screen space relative to the view center)
fn move_player(state: &mut GameState, cursor: Option<Vec2>, dt: f32) {
    let Some(cursor) = cursor.filter(|c| c.is_finite()) else {
        return;
    };

    let offset = cursor - state.viewport.screen_center();
    let dist = offset.length();
    let Some(dir) = offset.try_normalize() else {
        return;
    };

    let throttle = (dist / state.config.cursor_full_speed_distance).min(1.0);
    let mut speed = state.player.speed * throttle;
    if state.player.boost_active(state.clock_ms) {
        speed *= state.config.boost_multiplier;
    }

    state.player.pos += dir * speed * dt;
    clamp_to_bounds(&mut state.player, &state.world);
}

/// Player eats every pellet it touches; eaten pellets are respawned
fn eat_food(state: &mut GameState) {
    let mut eaten = 0usize;
    let mut points = 0u64;
    let config = &state.config;
    let player = &mut state.player;

    state.foods.retain(|food| {
        if !bodies_collide(&*player, food) {
            return true;
        }
        let growth = food_growth(player.radius, config);
        player.set_radius(grow(player.radius, growth, config));
        points += config.points_per_food;
        eaten += 1;
        false
    });

    if eaten > 0 {
        state.add_score(points);
        state.replenish_food();
    }
}

/// Absorb smaller touching bots, or end the round if a bigger one touches.
/// Returns true if the player was eaten.
fn resolve_player_bot_collisions(state: &mut GameState) -> bool {
    let mut idx = 0;
    let mut absorbed = false;
    while idx < state.bots.len() {
        let bot = &state.bots[idx];
        if !bodies_collide(&state.player, bot) {
            idx += 1;
            continue;
        }

        if bot.radius > state.player.radius {
            let bot_id = bot.id;
            state.end_round(EndReason::Eaten { bot_id });
            return true;
        }

        if bot.radius < state.player.radius {
            let bot = state.bots.remove(idx);
            // Exact absorption, bounded only by what fits in the world
            let radius =
                absorb_radius(state.player.radius, bot.radius).min(state.world.max_radius());
            state.player.set_radius(radius);
            state.add_score(state.config.points_per_bot);
            state.emit(GameEvent::BotAbsorbed {
                bot_id: bot.id,
                class: bot.class,
            });
            log::debug!("Player absorbed bot {} (r={:.1})", bot.id, bot.radius);
            absorbed = true;
            continue;
        }

        // Equal radius: neither can eat the other
        idx += 1;
    }

    if absorbed {
        state.replace_bots();
    }
    false
}

/// Decisions, movement and bot feeding
fn run_bots(state: &mut GameState, dt: f32) {
    // Everyone as seen at the start of the pass
    let mut seen: Vec<Perceived> = state
        .bots
        .iter()
        .map(|b| Perceived {
            bot_id: Some(b.id),
            pos: b.pos,
            radius: b.radius,
        })
        .collect();
    seen.push(Perceived {
        bot_id: None,
        pos: state.player.pos,
        radius: state.player.radius,
    });

    let now_ms = state.clock_ms;
    let interval = state.config.bot_decision_interval_ms;
    let smoothing = state.config.bot_movement_smoothing;
    for bot in &mut state.bots {
        if decision_due(bot, now_ms, interval) {
            decide(
                bot,
                &seen,
                &state.foods,
                &state.world,
                &state.config,
                now_ms,
                &mut state.rng,
            );
        }
        steer(bot, &state.world, smoothing, dt);

        // Bots graze too, without the score penalty
        let config = &state.config;
        state.foods.retain(|food| {
            if bodies_collide(&*bot, food) {
                bot.radius = grow(bot.radius, food_growth(bot.radius, config), config);
                false
            } else {
                true
            }
        });
        clamp_to_bounds(bot, &state.world);
    }

    bots_eat_bots(state);
}

/// A bot clearly bigger than a touching bot absorbs it
fn bots_eat_bots(state: &mut GameState) {
    let margin = state.config.threat_margin;
    let max_size = state.config.max_size();
    let mut eaten: Vec<usize> = Vec::new();

    for i in 0..state.bots.len() {
        if eaten.contains(&i) {
            continue;
        }
        for j in 0..state.bots.len() {
            if i == j || eaten.contains(&j) {
                continue;
            }
            let (a, b) = (&state.bots[i], &state.bots[j]);
            if a.radius > b.radius * margin && bodies_collide(a, b) {
                let radius = absorb_radius(a.radius, b.radius).min(max_size);
                log::debug!("Bot {} absorbed bot {}", a.id, b.id);
                state.bots[i].radius = radius;
                eaten.push(j);
            }
        }
    }

    if eaten.is_empty() {
        return;
    }
    eaten.sort_unstable_by(|a, b| b.cmp(a));
    for idx in eaten {
        state.bots.remove(idx);
    }
    // Absorption can push a grown bot past the walls
    let world = state.world;
    for bot in &mut state.bots {
        clamp_to_bounds(bot, &world);
    }
    state.replace_bots();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::settings::ArenaConfig;
    use crate::sim::world::{Bot, BotClass, Food};

    const DT: f32 = 1.0 / 60.0;

    /// A round with no bots and no food so tests can place their own
    fn empty_state() -> GameState {
        let config = ArenaConfig {
            food_count: 0,
            large_bot_count: 0,
            regular_bot_count: 0,
            ..ArenaConfig::default()
        };
        let mut state = GameState::new(config, 12345);
        state.take_events();
        state
    }

    fn place_bot(state: &mut GameState, class: BotClass, pos: Vec2, radius: f32) -> u32 {
        let id = state.next_entity_id();
        state.bots.push(Bot {
            id,
            class,
            pos,
            radius,
            appearance: Default::default(),
            base_speed: REGULAR_BOT_SPEED,
            speed: REGULAR_BOT_SPEED,
            target: pos,
            last_decision_ms: Some(0.0),
            personality: 0.5,
            vel: Vec2::ZERO,
            mode: Default::default(),
        });
        id
    }

    fn place_food(state: &mut GameState, pos: Vec2) {
        let id = state.next_entity_id();
        state.foods.push(Food {
            id,
            pos,
            radius: FOOD_RADIUS,
            hue: 0.0,
            score: 5.0,
        });
    }

    fn still(now_ms: f64) -> TickInput {
        TickInput {
            cursor: None,
            boost: false,
            now_ms,
        }
    }

    #[test]
    fn test_player_follows_cursor() {
        let mut state = empty_state();
        let start = state.player.pos;
        let center = state.viewport.screen_center();

        let input = TickInput {
            cursor: Some(center + Vec2::new(300.0, 0.0)),
            ..still(16.0)
        };
        tick(&mut state, &input, DT);
        assert!((state.player.pos.x - (start.x + PLAYER_SPEED * DT)).abs() < 1e-3);
        assert_eq!(state.player.pos.y, start.y);
        // Camera follows
        assert_eq!(state.viewport.center, state.player.pos);
    }

    #[test]
    fn test_cursor_throttle_and_dead_center() {
        let mut state = empty_state();
        let start = state.player.pos;
        let center = state.viewport.screen_center();

        tick(&mut state, &TickInput { cursor: Some(center), ..still(16.0) }, DT);
        assert_eq!(state.player.pos, start);

        let half = CURSOR_FULL_SPEED_DISTANCE / 2.0;
        tick(
            &mut state,
            &TickInput { cursor: Some(center + Vec2::new(0.0, half)), ..still(32.0) },
            DT,
        );
        assert!((state.player.pos.y - (start.y + PLAYER_SPEED * 0.5 * DT)).abs() < 1e-3);
    }

    #[test]
    fn test_offscreen_cursor_stays_in_bounds() {
        let mut state = empty_state();
        let input = TickInput {
            cursor: Some(Vec2::new(-50_000.0, -50_000.0)),
            ..still(0.0)
        };
        for i in 0..2000 {
            let input = TickInput { now_ms: i as f64 * 16.0, ..input.clone() };
            tick(&mut state, &input, DT);
            assert!(state.world.contains(state.player.pos, state.player.radius));
        }
        assert_eq!(state.player.pos, Vec2::splat(STARTING_RADIUS));
    }

    #[test]
    fn test_food_growth_and_score() {
        let mut state = empty_state();
        let pos = state.player.pos;
        place_food(&mut state, pos + Vec2::new(5.0, 0.0));

        tick(&mut state, &still(16.0), DT);

        assert!((state.player.radius - 20.45).abs() < 1e-4);
        assert_eq!(state.score(), POINTS_PER_FOOD);
        assert!(state.foods.is_empty());
        assert!(state.take_events().contains(&GameEvent::ScoreChanged { score: POINTS_PER_FOOD }));
    }

    #[test]
    fn test_food_growth_unaffected_by_score() {
        let mut state = empty_state();
        state.add_score(100);
        let pos = state.player.pos;
        place_food(&mut state, pos);

        tick(&mut state, &still(16.0), DT);

        assert!((state.player.radius - 20.45).abs() < 1e-4);
        assert_eq!(state.score(), 100 + POINTS_PER_FOOD);
    }

    #[test]
    fn test_food_respawned_same_tick() {
        let mut state = GameState::new(ArenaConfig::default(), 3);
        let pos = state.player.pos;
        // Put two pellets under the player
        state.foods[0].pos = pos;
        state.foods[1].pos = pos + Vec2::new(2.0, 2.0);

        tick(&mut state, &still(16.0), DT);
        assert_eq!(state.foods.len(), FOOD_COUNT);
        assert!(state.score() >= 2 * POINTS_PER_FOOD);
    }

    #[test]
    fn test_absorbs_smaller_bot() {
        let mut state = empty_state();
        let pos = state.player.pos;
        place_bot(&mut state, BotClass::Regular, pos + Vec2::new(10.0, 0.0), 15.0);

        tick(&mut state, &still(16.0), DT);

        let expected = (20.0f32 * 20.0 + 15.0 * 15.0).sqrt();
        assert!((state.player.radius - expected).abs() < 1e-4);
        assert_eq!(state.score(), POINTS_PER_BOT);
        assert!(state.bots.is_empty(), "no regular bots configured, none respawned");
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_absorption_capped_to_world() {
        let config = ArenaConfig {
            world_width: 300.0,
            world_height: 300.0,
            max_size_fraction: 0.5,
            food_count: 0,
            large_bot_count: 0,
            regular_bot_count: 0,
            ..ArenaConfig::default()
        };
        let mut state = GameState::new(config, 1);
        state.player.set_radius(140.0);
        let pos = state.player.pos;
        place_bot(&mut state, BotClass::Regular, pos + Vec2::new(10.0, 0.0), 130.0);

        tick(&mut state, &still(16.0), DT);

        assert_eq!(state.player.radius, 150.0);
        assert!(state.world.contains(state.player.pos, state.player.radius));
    }

    #[test]
    fn test_eaten_by_larger_bot() {
        let mut state = empty_state();
        let pos = state.player.pos;
        let big = place_bot(&mut state, BotClass::Large, pos + Vec2::new(30.0, 0.0), 40.0);
        state.add_score(3);
        state.take_events();

        tick(&mut state, &still(16.0), DT);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.final_score, Some(3));
        assert_eq!(
            state.take_events(),
            vec![GameEvent::GameOver {
                final_score: 3,
                reason: EndReason::Eaten { bot_id: big }
            }]
        );

        // Frozen: further ticks change nothing
        let before = state.player.pos;
        let input = TickInput {
            cursor: Some(Vec2::ZERO),
            ..still(32.0)
        };
        tick(&mut state, &input, DT);
        assert_eq!(state.player.pos, before);
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_equal_radius_is_a_standoff() {
        let mut state = empty_state();
        let pos = state.player.pos;
        place_bot(&mut state, BotClass::Regular, pos + Vec2::new(10.0, 0.0), 20.0);
        tick(&mut state, &still(16.0), DT);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.bots.len(), 1);
    }

    #[test]
    fn test_large_bot_replaced_in_corner() {
        let config = ArenaConfig {
            food_count: 0,
            large_bot_count: 3,
            regular_bot_count: 0,
            ..ArenaConfig::default()
        };
        let mut state = GameState::new(config, 77);
        // Move every large bot far away, then drop a small one onto a huge player
        for bot in &mut state.bots {
            bot.pos = Vec2::new(100.0, 1900.0);
            bot.target = bot.pos;
            bot.last_decision_ms = Some(0.0);
        }
        state.player.set_radius(100.0);
        let victim = state.bots[0].id;
        state.bots[0].pos = state.player.pos + Vec2::new(20.0, 0.0);

        tick(&mut state, &still(16.0), DT);

        assert_eq!(state.bot_count(BotClass::Large), 3);
        assert!(state.bots.iter().all(|b| b.id != victim));
        // Replacement spawned in a corner zone, then took one small step
        let fresh = state.bots.iter().max_by_key(|b| b.id).expect("bots");
        assert!(fresh.id > victim);
        assert!(fresh.pos.distance(state.world.center()) > 200.0);
    }

    #[test]
    fn test_decay_event_applied_on_tick() {
        let mut state = empty_state();
        state.player.set_radius(100.0);
        state.events.push(SimEvent::Decay { intervals: 2 });
        tick(&mut state, &still(16.0), DT);
        assert!((state.player.radius - 100.0 * MASS_DECAY_RATE * MASS_DECAY_RATE).abs() < 1e-3);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_resize_event_updates_viewport() {
        let mut state = empty_state();
        state.events.push(SimEvent::Resize { width: 1920.0, height: 1080.0 });
        tick(&mut state, &still(16.0), DT);
        assert_eq!((state.viewport.width, state.viewport.height), (1920.0, 1080.0));
    }

    #[test]
    fn test_boost_costs_radius_and_expires() {
        let mut state = empty_state();
        state.player.set_radius(30.0);
        let center = state.viewport.screen_center();
        let right = Some(center + Vec2::new(500.0, 0.0));

        let x0 = state.player.pos.x;
        tick(&mut state, &TickInput { cursor: right, boost: true, now_ms: 1000.0 }, DT);
        assert_eq!(state.player.radius, 30.0 - BOOST_COST);
        assert_eq!(state.player.boost_until_ms, Some(1000.0 + BOOST_DURATION_MS));
        let boosted_step = state.player.pos.x - x0;
        assert!((boosted_step - PLAYER_SPEED * BOOST_MULTIPLIER * DT).abs() < 1e-3);

        // Holding the key during an active boost costs nothing more
        tick(&mut state, &TickInput { cursor: None, boost: true, now_ms: 2000.0 }, DT);
        assert_eq!(state.player.radius, 30.0 - BOOST_COST);

        // Expired
        tick(&mut state, &still(1000.0 + BOOST_DURATION_MS), DT);
        assert!(state.player.boost_until_ms.is_none());
    }

    #[test]
    fn test_boost_needs_spare_radius() {
        let mut state = empty_state();
        tick(&mut state, &TickInput { cursor: None, boost: true, now_ms: 0.0 }, DT);
        assert_eq!(state.player.radius, STARTING_RADIUS);
        assert!(state.player.boost_until_ms.is_none());
    }

    #[test]
    fn test_bot_eats_food_and_smaller_bot() {
        let mut state = empty_state();
        let spot = Vec2::new(300.0, 300.0);
        let big = place_bot(&mut state, BotClass::Large, spot, 40.0);
        place_food(&mut state, spot + Vec2::new(1.0, 0.0));
        place_bot(&mut state, BotClass::Regular, spot + Vec2::new(30.0, 0.0), 16.0);

        tick(&mut state, &still(16.0), DT);

        assert!(state.foods.is_empty());
        assert_eq!(state.bots.len(), 1);
        let survivor = &state.bots[0];
        assert_eq!(survivor.id, big);
        assert!(survivor.radius > (40.0f32 * 40.0 + 16.0 * 16.0).sqrt());
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(ArenaConfig::default(), 99999);
        let mut state2 = GameState::new(ArenaConfig::default(), 99999);

        for i in 0..300 {
            let input = TickInput {
                cursor: Some(Vec2::new((i % 97) as f32 * 10.0, (i % 53) as f32 * 10.0)),
                boost: i == 120,
                now_ms: i as f64 * 16.6,
            };
            tick(&mut state1, &input, DT);
            tick(&mut state2, &input, DT);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score(), state2.score());
        assert_eq!(state1.player.pos, state2.player.pos);
        assert_eq!(state1.bots.len(), state2.bots.len());
        for (a, b) in state1.bots.iter().zip(&state2.bots) {
            assert_eq!(a.pos, b.pos);
        }
    }
}
