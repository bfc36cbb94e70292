//! Events emitted by the simulation for rendering, audio and UI

use serde::{Deserialize, Serialize};

use super::geometry::ShapeKind;
use super::powerup::PowerUpKind;

/// Why a harmful contact was absorbed instead of ending the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissCause {
    /// Frame transition in progress
    Invincible,
    /// Shield power-up active
    Shield,
}

impl MissCause {
    /// Particle color (0xRRGGBB) for the absorbed hit
    pub fn color(&self) -> u32 {
        match self {
            MissCause::Invincible => 0xffff00,
            MissCause::Shield => 0x00ffff,
        }
    }
}

/// A simulation event, queued on the game state and drained by the front-end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    ScoreChanged {
        score: u64,
    },
    Success {
        x: f32,
        y: f32,
        kind: ShapeKind,
        golden: bool,
        power_up: bool,
    },
    Miss {
        x: f32,
        y: f32,
        cause: MissCause,
    },
    PowerUpActivated {
        kind: PowerUpKind,
        duration_ms: u64,
    },
    PowerUpExpired {
        kind: PowerUpKind,
    },
    FrameTransitionStart,
    FrameTransitionSwap,
    FrameTransitionEnd,
    /// Score reached 80% of the stored record
    HighScoreApproaching,
    /// Score passed the stored record
    HighScoreBeaten,
    GameOver {
        score: u64,
        earned_tokens: u64,
        new_high_score: bool,
    },
    Continued {
        cost: u64,
    },
}

/// Receiver for simulation events. Every hook defaults to a no-op.
pub trait EventSink {
    fn on_score_changed(&mut self, _score: u64) {}
    fn on_success(&mut self, _x: f32, _y: f32, _kind: ShapeKind, _golden: bool, _power_up: bool) {}
    fn on_miss(&mut self, _x: f32, _y: f32, _color: u32) {}
    fn on_power_up_activated(&mut self, _kind: PowerUpKind, _duration_ms: u64) {}
    fn on_power_up_expired(&mut self, _kind: PowerUpKind) {}
    fn on_frame_transition_start(&mut self) {}
    fn on_frame_transition_swap(&mut self) {}
    fn on_frame_transition_end(&mut self) {}
    fn on_high_score_approaching(&mut self) {}
    fn on_high_score_beaten(&mut self) {}
    fn on_game_over(&mut self, _score: u64, _earned_tokens: u64, _new_high_score: bool) {}
    fn on_continued(&mut self, _cost: u64) {}
}

impl GameEvent {
    /// Route this event to the matching sink hook
    pub fn dispatch(&self, sink: &mut impl EventSink) {
        match *self {
            GameEvent::ScoreChanged { score } => sink.on_score_changed(score),
            GameEvent::Success {
                x,
                y,
                kind,
                golden,
                power_up,
            } => sink.on_success(x, y, kind, golden, power_up),
            GameEvent::Miss { x, y, cause } => sink.on_miss(x, y, cause.color()),
            GameEvent::PowerUpActivated { kind, duration_ms } => {
                sink.on_power_up_activated(kind, duration_ms)
            }
            GameEvent::PowerUpExpired { kind } => sink.on_power_up_expired(kind),
            GameEvent::FrameTransitionStart => sink.on_frame_transition_start(),
            GameEvent::FrameTransitionSwap => sink.on_frame_transition_swap(),
            GameEvent::FrameTransitionEnd => sink.on_frame_transition_end(),
            GameEvent::HighScoreApproaching => sink.on_high_score_approaching(),
            GameEvent::HighScoreBeaten => sink.on_high_score_beaten(),
            GameEvent::GameOver {
                score,
                earned_tokens,
                new_high_score,
            } => sink.on_game_over(score, earned_tokens, new_high_score),
            GameEvent::Continued { cost } => sink.on_continued(cost),
        }
    }
}
