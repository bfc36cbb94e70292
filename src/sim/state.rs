//! Game state and core simulation types
//!
//! All state that must survive a Continue lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use super::geometry::{Frame, FrameConfig, ShapeKind, build_frame};
use super::powerup::{PowerUpKind, PowerUpMachine};
use super::spawner::Spawner;
use super::transition::TransitionMachine;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused; no ticks run and no time accrues
    Paused,
    /// Run ended (may still be continued)
    GameOver,
    /// Player quit mid-run; nothing is awarded and the run cannot resume
    Abandoned,
}

/// A shape falling toward the frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingShape {
    pub id: u32,
    pub kind: ShapeKind,
    /// Center position
    pub pos: Vec2,
    pub size: f32,
    /// Fall speed in px per tick
    pub speed: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub golden: bool,
    /// Power-up carried by this shape (collecting it grants the effect, not points)
    pub power_up: Option<PowerUpKind>,
}

impl FallingShape {
    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.size / 2.0
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size / 2.0
    }

    pub fn is_power_up(&self) -> bool {
        self.power_up.is_some()
    }

    /// Advance one tick, with fall speed scaled by `speed_factor`
    pub fn advance(&mut self, speed_factor: f32) {
        self.pos.y += self.speed * speed_factor;
        self.rotation += self.rotation_speed;
    }
}

/// Latched high-score notices; each fires at most once per game
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct HighScoreLatches {
    pub approaching: bool,
    pub beaten: bool,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Simulation clock, advanced only by ticks
    pub clock_ms: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub score: u64,
    /// Screen size in px
    pub screen: Vec2,
    /// Drag multiplier applied to pointer deltas
    pub sensitivity: f32,
    /// Configuration rotation for transitions
    pub templates: Vec<FrameConfig>,
    pub frame: Frame,
    /// Falling shapes (sorted by id for determinism)
    pub shapes: Vec<FallingShape>,
    pub spawner: Spawner,
    pub power_up: PowerUpMachine,
    pub transition: TransitionMachine,
    pub latches: HighScoreLatches,
    /// Continues bought this session
    pub continues: u32,
    /// Tokens already paid out this session (continues end the game more than once)
    pub tokens_awarded: u64,
    /// Events since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Start a new game on a `width` x `height` screen
    pub fn new(seed: u64, width: f32, height: f32) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let screen = Vec2::new(width, height);
        let templates = FrameConfig::templates();
        let frame = build_frame(&templates[0], None, screen, Default::default());
        let transition = TransitionMachine::scheduled(0, &mut rng);

        log::info!("New game (seed {seed}) on {width}x{height}");

        Self {
            seed,
            rng,
            clock_ms: 0,
            time_ticks: 0,
            phase: GamePhase::Playing,
            score: 0,
            screen,
            sensitivity: 1.0,
            templates,
            frame,
            shapes: Vec::new(),
            spawner: Spawner::default(),
            power_up: PowerUpMachine::default(),
            transition,
            latches: HighScoreLatches::default(),
            continues: 0,
            tokens_awarded: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Reserve `count` consecutive entity IDs, returning the first
    pub fn reserve_ids(&mut self, count: u32) -> u32 {
        let first = self.next_id;
        self.next_id += count;
        first
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn is_invincible(&self) -> bool {
        self.transition.is_invincible()
    }

    /// Rebuild the frame around its current center, using `config` and
    /// the size modifier of the active power-up
    pub fn rebuild_frame(&mut self, config: &FrameConfig) {
        self.frame = build_frame(
            config,
            Some(&self.frame),
            self.screen,
            self.power_up.size_modifier(),
        );
    }

    /// Rebuild the frame with its current configuration
    pub fn refresh_frame(&mut self) {
        let config = self.frame.config.clone();
        self.rebuild_frame(&config);
    }

    pub fn add_score(&mut self, points: u64) {
        self.score += points;
        self.events.push(GameEvent::ScoreChanged { score: self.score });
    }

    /// Take all events queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure shapes are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.shapes.sort_by_key(|s| s.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_defaults() {
        let state = GameState::new(42, 800.0, 600.0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert!(state.shapes.is_empty());
        assert_eq!(state.frame.config, state.templates[0]);
        assert!(!state.power_up.is_active());
        assert!(!state.is_invincible());
        let next = state.transition.next_change_ms();
        assert!((12_000..30_000).contains(&next));
    }

    #[test]
    fn test_entity_ids_increase() {
        let mut state = GameState::new(1, 800.0, 600.0);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert!(b > a);
    }

    #[test]
    fn test_add_score_emits_event() {
        let mut state = GameState::new(1, 800.0, 600.0);
        state.add_score(10);
        state.add_score(30);
        assert_eq!(state.score, 40);
        assert_eq!(
            state.drain_events(),
            vec![
                GameEvent::ScoreChanged { score: 10 },
                GameEvent::ScoreChanged { score: 40 }
            ]
        );
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_shape_advance_scales_speed() {
        let mut shape = FallingShape {
            id: 1,
            kind: ShapeKind::Star,
            pos: Vec2::new(100.0, 0.0),
            size: 40.0,
            speed: 2.0,
            rotation: 0.0,
            rotation_speed: 0.01,
            golden: false,
            power_up: None,
        };
        shape.advance(1.0);
        assert_eq!(shape.pos.y, 2.0);
        shape.advance(0.5);
        assert_eq!(shape.pos.y, 3.0);
        assert_eq!(shape.top(), -17.0);
        assert_eq!(shape.bottom(), 23.0);
    }

    #[test]
    fn test_state_round_trips_through_json() {
        let state = GameState::new(9, 640.0, 480.0);
        let json = serde_json::to_string(&state).unwrap();
        let restored: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.seed, 9);
        assert_eq!(restored.frame.config, state.frame.config);
        assert_eq!(
            restored.transition.next_change_ms(),
            state.transition.next_change_ms()
        );
    }
}
