//! Per-frame simulation tick
//!
//! Core game loop that advances the simulation deterministically. Order
//! within a tick: power-up expiry, frame transition, high-score notices,
//! spawn timer, shape movement + collision, spawn-rate decay.

use super::collision::{CollisionOutcome, Protection, check_shape};
use super::economy::Economy;
use super::events::GameEvent;
use super::powerup::{Activation, InventoryItem, PowerUpKind};
use super::spawner::{spawn_shape, spawn_triple};
use super::state::{FallingShape, GamePhase, GameState};
use super::transition::TransitionMachine;
use crate::consts::*;
use crate::settings::Settings;
use crate::{continue_cost, tokens_for_score};

/// Furthest the autopilot moves the frame in one tick (px)
const AUTOPILOT_MAX_STEP: f32 = 14.0;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer drag since the last tick (px, before sensitivity)
    pub drag: Option<f32>,
    /// Inventory hotkey pressed
    pub use_item: Option<InventoryItem>,
    /// Pause toggle
    pub pause: bool,
    /// Demo mode - the frame steers itself
    pub autopilot: bool,
}

/// Advance the game by one display frame. `dt_ms` feeds the simulation
/// clock that times power-ups and frame transitions.
pub fn tick(state: &mut GameState, input: &TickInput, economy: &mut impl Economy, dt_ms: u64) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.pause();
                return;
            }
            GamePhase::Paused => state.resume(),
            _ => {}
        }
    }

    // Don't tick unless playing
    if state.phase != GamePhase::Playing {
        return;
    }

    if let Some(delta) = input.drag {
        state.drag(delta);
    }
    if input.autopilot {
        if let Some(step) = autopilot_step(state) {
            state.frame.drag(step, state.screen.x);
        }
    }
    if let Some(item) = input.use_item {
        use_inventory_item(state, item, economy);
    }

    state.time_ticks += 1;
    state.clock_ms += dt_ms;
    let now = state.clock_ms;

    // Power-up expiry
    if let Some(kind) = state.power_up.update(now) {
        state.events.push(GameEvent::PowerUpExpired { kind });
        if kind.resizes_frame() {
            state.refresh_frame();
        }
    }

    // Frame transition
    let current = state.frame.config.clone();
    let update = state
        .transition
        .update(now, &current, &state.templates, &mut state.rng);
    if update.started {
        state.events.push(GameEvent::FrameTransitionStart);
    }
    if let Some(config) = update.swap_to {
        state.rebuild_frame(&config);
        state.events.push(GameEvent::FrameTransitionSwap);
    }
    if update.ended {
        state.events.push(GameEvent::FrameTransitionEnd);
    }

    check_high_score(state, economy.high_score());

    // Spawn timer
    if state.spawner.advance() {
        let id = state.next_entity_id();
        let golden = state.power_up.is(PowerUpKind::Golden);
        let shape = spawn_shape(&mut state.rng, id, state.score, golden, state.screen.x);
        state.shapes.push(shape);
    }

    if !advance_shapes(state, economy) {
        return;
    }

    state.spawner.decay();

    // Ensure deterministic ordering
    state.normalize_order();
}

/// Move every shape and resolve it against the frame. Returns false if
/// the game ended this tick.
fn advance_shapes(state: &mut GameState, economy: &mut impl Economy) -> bool {
    let speed_factor = state.power_up.speed_factor();
    let falling = std::mem::take(&mut state.shapes);
    let mut kept: Vec<FallingShape> = Vec::with_capacity(falling.len());
    let mut remaining = falling.into_iter();

    while let Some(mut shape) = remaining.next() {
        shape.advance(speed_factor);

        let protection = Protection {
            invincible: state.is_invincible(),
            shielded: state.power_up.is(PowerUpKind::Shield),
        };
        match check_shape(&shape, &state.frame, protection, state.screen.y) {
            CollisionOutcome::Falling => kept.push(shape),
            CollisionOutcome::Offscreen => {}
            CollisionOutcome::Collected { points } => collect(state, &shape, points),
            CollisionOutcome::Absorbed(cause) => state.events.push(GameEvent::Miss {
                x: shape.pos.x,
                y: state.frame.top(),
                cause,
            }),
            CollisionOutcome::Fatal => {
                kept.push(shape);
                kept.extend(remaining);
                kept.append(&mut state.shapes);
                state.shapes = kept;
                end_game(state, economy);
                return false;
            }
        }
    }

    // Shapes spawned mid-loop (triple burst) start moving next tick
    kept.append(&mut state.shapes);
    state.shapes = kept;
    true
}

/// A shape passed through its matching hole
fn collect(state: &mut GameState, shape: &FallingShape, points: u64) {
    if let Some(kind) = shape.power_up {
        activate_power_up(state, kind);
    } else {
        state.add_score(points);
    }
    state.events.push(GameEvent::Success {
        x: shape.pos.x,
        y: state.frame.top(),
        kind: shape.kind,
        golden: shape.golden && !shape.is_power_up(),
        power_up: shape.is_power_up(),
    });
}

/// Start `kind` and apply its side effects. No-op while another
/// power-up is active.
pub fn activate_power_up(state: &mut GameState, kind: PowerUpKind) -> bool {
    match state.power_up.activate(kind, state.clock_ms) {
        Activation::Ignored => false,
        Activation::Started { kind, duration_ms } => {
            state.events.push(GameEvent::PowerUpActivated { kind, duration_ms });
            if kind.resizes_frame() {
                state.refresh_frame();
            }
            true
        }
        Activation::Instant(kind) => {
            state.events.push(GameEvent::PowerUpActivated {
                kind,
                duration_ms: 0,
            });
            if kind == PowerUpKind::Triple {
                let first = state.reserve_ids(state.frame.holes.len() as u32);
                let burst = spawn_triple(&state.frame, first);
                state.shapes.extend(burst);
            }
            true
        }
    }
}

/// Spend one inventory item. Rejected (inventory untouched) unless the
/// game is running with no active power-up and the item is in stock.
pub fn use_inventory_item(
    state: &mut GameState,
    item: InventoryItem,
    economy: &mut impl Economy,
) -> bool {
    if !state.is_running() || state.power_up.is_active() {
        return false;
    }
    if item == InventoryItem::FrameChange && state.transition.is_transitioning() {
        return false;
    }
    if economy.inventory(item) == 0 || !economy.consume_inventory(item) {
        return false;
    }
    economy.commit();
    log::debug!("Used inventory item {}", item.as_str());

    match item.power_up() {
        Some(kind) => activate_power_up(state, kind),
        None => {
            let current = state.frame.config.clone();
            let started = state.transition.trigger(
                state.clock_ms,
                &current,
                &state.templates,
                &mut state.rng,
            );
            if started {
                state.events.push(GameEvent::FrameTransitionStart);
            }
            started
        }
    }
}

/// Fire the 80%-of-record and record-beaten notices, once each per game
fn check_high_score(state: &mut GameState, record: u64) {
    if record == 0 {
        return;
    }

    let approach = record as f64 * HIGH_SCORE_APPROACH;
    if !state.latches.approaching && state.score as f64 >= approach && state.score < record {
        state.latches.approaching = true;
        state.events.push(GameEvent::HighScoreApproaching);
    }

    if !state.latches.beaten && state.score > record {
        state.latches.beaten = true;
        state.events.push(GameEvent::HighScoreBeaten);
    }
}

/// Stop the run: award tokens, update the record and report the result
pub fn end_game(state: &mut GameState, economy: &mut impl Economy) {
    if !matches!(state.phase, GamePhase::Playing | GamePhase::Paused) {
        return;
    }
    state.phase = GamePhase::GameOver;

    // Continues re-end the same run; only pay what has not been paid yet
    let total = tokens_for_score(state.score);
    let earned_tokens = total.saturating_sub(state.tokens_awarded);
    state.tokens_awarded = total;
    economy.award_tokens(earned_tokens);

    let new_high_score = state.score > economy.high_score();
    if new_high_score {
        economy.set_high_score(state.score);
    }
    economy.commit();

    log::info!(
        "Game over: score {}, +{} tokens{}",
        state.score,
        earned_tokens,
        if new_high_score { " (new high score)" } else { "" }
    );
    state.events.push(GameEvent::GameOver {
        score: state.score,
        earned_tokens,
        new_high_score,
    });
}

/// Buy another go at a finished run. The score is kept; shapes, power-up
/// and transition are reset.
pub fn continue_game(state: &mut GameState, economy: &mut impl Economy) -> bool {
    if state.phase != GamePhase::GameOver {
        return false;
    }
    let cost = continue_cost(state.continues);
    if !economy.spend_tokens(cost) {
        return false;
    }
    economy.commit();

    state.continues += 1;
    state.shapes.clear();
    state.power_up.clear();
    state.transition = TransitionMachine::scheduled(state.clock_ms, &mut state.rng);
    state.refresh_frame();
    state.phase = GamePhase::Playing;

    log::info!("Continue #{} for {} tokens", state.continues, cost);
    state.events.push(GameEvent::Continued { cost });
    true
}

/// Frame move that brings the lowest approaching shape over a matching
/// hole, or clear of the frame when no hole matches
fn autopilot_step(state: &GameState) -> Option<f32> {
    let frame = &state.frame;
    let target = state
        .shapes
        .iter()
        .filter(|s| s.top() <= frame.bottom())
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))?;

    let min_left = -FRAME_OVERFLOW;
    let max_left = state.screen.x - frame.width + FRAME_OVERFLOW;

    let matching = frame
        .holes
        .iter()
        .filter(|hole| hole.kind == target.kind)
        .map(|hole| target.pos.x - (frame.hole_center_x(hole) - frame.left()));
    let dodging = [
        target.pos.x + target.size,
        target.pos.x - target.size - frame.width,
    ];

    let desired = nearest_reachable(matching, frame.left(), min_left, max_left)
        .or_else(|| nearest_reachable(dodging.into_iter(), frame.left(), min_left, max_left))?;
    Some((desired - frame.left()).clamp(-AUTOPILOT_MAX_STEP, AUTOPILOT_MAX_STEP))
}

/// Candidate frame position closest to `current` within `[min, max]`
fn nearest_reachable(
    candidates: impl Iterator<Item = f32>,
    current: f32,
    min: f32,
    max: f32,
) -> Option<f32> {
    candidates
        .filter(|left| (min..=max).contains(left))
        .min_by(|a, b| (a - current).abs().total_cmp(&(b - current).abs()))
}

impl GameState {
    /// Pointer drag, scaled by sensitivity and clamped to the screen
    pub fn drag(&mut self, pixels: f32) {
        if !self.is_running() {
            return;
        }
        self.frame.drag(pixels * self.sensitivity, self.screen.x);
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.sensitivity = settings.sensitivity;
    }

    /// Stop ticking until resumed. Timers are frozen with the clock.
    pub fn pause(&mut self) {
        if self.phase == GamePhase::Playing {
            self.phase = GamePhase::Paused;
            log::info!("Paused at {}ms", self.clock_ms);
        }
    }

    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Playing;
            log::info!("Resumed");
        }
    }

    /// Abandon the run without payout
    pub fn quit(&mut self) {
        if matches!(self.phase, GamePhase::Playing | GamePhase::Paused) {
            self.phase = GamePhase::Abandoned;
            log::info!("Run abandoned at score {}", self.score);
        }
    }

    /// Screen size changed: re-anchor the frame to the bottom and re-clamp
    pub fn resize(&mut self, width: f32, height: f32) {
        self.screen = glam::Vec2::new(width, height);
        self.frame.pos.y = height - FRAME_BOTTOM_OFFSET;
        super::geometry::clamp(&mut self.frame, width);
    }
}
