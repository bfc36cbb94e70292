//! Browser binding
//!
//! The page owns the canvas and the animation loop; it drives a `WebGame`
//! each frame and renders from the drained events and state snapshots.

use wasm_bindgen::prelude::*;

use super::{FrameClock, KeyCommand};
use crate::consts::TICK_MS;
use crate::highscores::Leaderboard;
use crate::persistence::PlayerProfile;
use crate::settings::Settings;
use crate::sim::{self, GamePhase, GameState, TickInput};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialised".into());
    }
    log::info!("Fragile Gate starting...");
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|err| {
        log::warn!("Could not encode state: {err}");
        String::from("null")
    })
}

#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    profile: PlayerProfile,
    leaderboard: Leaderboard,
    input: TickInput,
    clock: FrameClock,
    // Track phase for leaderboard updates
    last_phase: GamePhase,
}

#[wasm_bindgen]
impl WebGame {
    /// Start a run for `player` on a `width` x `height` canvas
    #[wasm_bindgen(constructor)]
    pub fn new(player: &str, width: f32, height: f32) -> WebGame {
        let mut settings = Settings::load();
        settings.last_player_name = player.to_string();
        settings.save();

        let seed = js_sys::Date::now() as u64;
        let mut state = GameState::new(seed, width, height);
        state.apply_settings(&settings);

        WebGame {
            state,
            profile: PlayerProfile::load(player),
            leaderboard: Leaderboard::load(),
            input: TickInput::default(),
            clock: FrameClock::new(),
            last_phase: GamePhase::Playing,
        }
    }

    /// Advance by the real time since the last animation frame
    pub fn tick(&mut self, dt_ms: f64) {
        for _ in 0..self.clock.steps(dt_ms) {
            let input = self.input.clone();
            sim::tick(&mut self.state, &input, &mut self.profile, TICK_MS);

            // Clear one-shot inputs after processing
            self.input.drag = None;
            self.input.use_item = None;
            self.input.pause = false;

            self.record_game_over();
        }
    }

    /// Pointer moved horizontally by `dx` px while held
    pub fn drag(&mut self, dx: f32) {
        *self.input.drag.get_or_insert(0.0) += dx;
    }

    /// Keyboard press (`KeyboardEvent.key`). Returns true if it was handled.
    pub fn key(&mut self, key: &str) -> bool {
        match KeyCommand::from_key(key) {
            Some(command) => {
                command.apply(&mut self.input);
                true
            }
            None => false,
        }
    }

    pub fn pause(&mut self) {
        self.state.pause();
    }

    pub fn resume(&mut self) {
        self.state.resume();
    }

    pub fn quit(&mut self) {
        self.state.quit();
        self.last_phase = self.state.phase;
    }

    pub fn continue_game(&mut self) -> bool {
        let resumed = sim::continue_game(&mut self.state, &mut self.profile);
        if resumed {
            self.last_phase = self.state.phase;
        }
        resumed
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.resize(width, height);
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.input.autopilot = enabled;
    }

    /// Buy one inventory charge by hotkey ("1"-"6")
    pub fn buy_power_up(&mut self, key: &str) -> bool {
        let Some(item) = super::inventory_item_for_key(key) else {
            return false;
        };
        match self.profile.buy_power_up(item) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("Purchase refused: {err}");
                false
            }
        }
    }

    pub fn score(&self) -> f64 {
        self.state.score as f64
    }

    pub fn tokens(&self) -> f64 {
        self.profile.tokens as f64
    }

    pub fn next_continue_cost(&self) -> f64 {
        crate::continue_cost(self.state.continues) as f64
    }

    /// Events since the last call, as a JSON array
    pub fn drain_events(&mut self) -> String {
        to_json(&self.state.drain_events())
    }

    /// Full game state as JSON for rendering
    pub fn snapshot(&self) -> String {
        to_json(&self.state)
    }

    pub fn profile(&self) -> String {
        to_json(&self.profile)
    }

    pub fn leaderboard(&self) -> String {
        to_json(&self.leaderboard)
    }
}

impl WebGame {
    fn record_game_over(&mut self) {
        if self.state.phase == GamePhase::GameOver && self.last_phase != GamePhase::GameOver {
            let rank = self.leaderboard.record(
                &self.profile.name,
                self.state.score,
                js_sys::Date::now(),
            );
            if let Some(rank) = rank {
                log::info!("Leaderboard rank #{rank}");
            }
            self.leaderboard.save();
        }
        self.last_phase = self.state.phase;
    }
}
