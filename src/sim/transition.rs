//! Frame transition state machine
//!
//! `Stable(next_change_at) -> Transitioning(start, pending) -> Stable`.
//! The frame is invincible for the whole transition; the pending
//! configuration replaces the old one at 80% progress.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::FrameConfig;
use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TransitionState {
    Stable {
        next_change_ms: u64,
    },
    Transitioning {
        start_ms: u64,
        /// `None` once the swap has happened
        pending: Option<FrameConfig>,
        /// Schedule to restore if the transition was triggered manually
        next_change_ms: u64,
    },
}

/// Everything that happened during one `update`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionUpdate {
    pub started: bool,
    /// Configuration to rebuild the frame with (swap point crossed)
    pub swap_to: Option<FrameConfig>,
    pub ended: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionMachine {
    state: TransitionState,
}

impl TransitionMachine {
    /// Stable machine whose first automatic change fires at `next_change_ms`
    pub fn stable(next_change_ms: u64) -> Self {
        Self {
            state: TransitionState::Stable { next_change_ms },
        }
    }

    /// Stable machine with a freshly drawn schedule
    pub fn scheduled(now_ms: u64, rng: &mut impl Rng) -> Self {
        Self::stable(next_change_time(now_ms, rng))
    }

    pub fn state(&self) -> &TransitionState {
        &self.state
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.state, TransitionState::Transitioning { .. })
    }

    /// Mismatches and solid hits are harmless while transitioning
    pub fn is_invincible(&self) -> bool {
        self.is_transitioning()
    }

    pub fn next_change_ms(&self) -> u64 {
        match self.state {
            TransitionState::Stable { next_change_ms }
            | TransitionState::Transitioning { next_change_ms, .. } => next_change_ms,
        }
    }

    pub fn pending(&self) -> Option<&FrameConfig> {
        match &self.state {
            TransitionState::Transitioning { pending, .. } => pending.as_ref(),
            TransitionState::Stable { .. } => None,
        }
    }

    /// Transition progress in `[0, 1]`, or `None` when stable
    pub fn progress(&self, now_ms: u64) -> Option<f32> {
        match self.state {
            TransitionState::Transitioning { start_ms, .. } => Some(progress_at(start_ms, now_ms)),
            TransitionState::Stable { .. } => None,
        }
    }

    /// Enter a transition toward a random configuration different from
    /// `current`. Returns false if already transitioning or no template differs.
    pub fn trigger(
        &mut self,
        now_ms: u64,
        current: &FrameConfig,
        templates: &[FrameConfig],
        rng: &mut impl Rng,
    ) -> bool {
        if self.is_transitioning() {
            return false;
        }
        let Some(pending) = pick_next_config(current, templates, rng) else {
            log::warn!("No frame template differs from the current one");
            return false;
        };

        log::debug!("Frame transition started toward {:?}", pending.holes());
        self.state = TransitionState::Transitioning {
            start_ms: now_ms,
            pending: Some(pending),
            next_change_ms: self.next_change_ms(),
        };
        true
    }

    /// Advance the machine to `now_ms`. Progresses an active transition,
    /// or starts one when the schedule is due.
    pub fn update(
        &mut self,
        now_ms: u64,
        current: &FrameConfig,
        templates: &[FrameConfig],
        rng: &mut impl Rng,
    ) -> TransitionUpdate {
        let mut update = TransitionUpdate::default();

        match self.state {
            TransitionState::Transitioning { start_ms, .. } => {
                let progress = progress_at(start_ms, now_ms);
                if progress >= TRANSITION_SWAP_PROGRESS {
                    if let TransitionState::Transitioning { pending, .. } = &mut self.state {
                        if let Some(config) = pending.take() {
                            log::debug!("Frame swapped to {:?}", config.holes());
                            update.swap_to = Some(config);
                        }
                    }
                }
                if progress >= 1.0 {
                    self.state = TransitionState::Stable {
                        next_change_ms: next_change_time(now_ms, rng),
                    };
                    log::debug!("Frame transition ended, next at {}ms", self.next_change_ms());
                    update.ended = true;
                }
            }
            TransitionState::Stable { next_change_ms } => {
                if now_ms >= next_change_ms {
                    update.started = self.trigger(now_ms, current, templates, rng);
                }
            }
        }

        update
    }
}

fn progress_at(start_ms: u64, now_ms: u64) -> f32 {
    let elapsed = now_ms.saturating_sub(start_ms);
    (elapsed as f32 / TRANSITION_DURATION_MS as f32).min(1.0)
}

/// Next automatic change, drawn uniformly from `[12s, 30s)` after `now_ms`
pub fn next_change_time(now_ms: u64, rng: &mut impl Rng) -> u64 {
    now_ms + rng.random_range(FRAME_CHANGE_MIN_MS..FRAME_CHANGE_MAX_MS)
}

/// Uniform draw over the templates whose hole sequence differs from `current`
pub fn pick_next_config(
    current: &FrameConfig,
    templates: &[FrameConfig],
    rng: &mut impl Rng,
) -> Option<FrameConfig> {
    let candidates: Vec<&FrameConfig> = templates
        .iter()
        .filter(|config| config.holes() != current.holes())
        .collect();
    if candidates.is_empty() {
        return None;
    }
    let index = rng.random_range(0..candidates.len());
    Some(candidates[index].clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::ShapeKind;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn opening() -> FrameConfig {
        FrameConfig::templates()[0].clone()
    }

    #[test]
    fn test_scheduled_transition_timeline() {
        let mut rng = Pcg32::seed_from_u64(7);
        let templates = FrameConfig::templates();
        let current = opening();
        let mut machine = TransitionMachine::stable(0);

        let start = machine.update(0, &current, &templates, &mut rng);
        assert!(start.started);
        assert!(machine.is_invincible());
        let pending = machine.pending().cloned().unwrap();
        assert_ne!(pending.holes(), current.holes());

        let early = machine.update(2000, &current, &templates, &mut rng);
        assert_eq!(early, TransitionUpdate::default());
        assert!(machine.is_invincible());

        // progress ~0.83: swap already done, still invincible
        let swap = machine.update(2500, &current, &templates, &mut rng);
        assert_eq!(swap.swap_to, Some(pending.clone()));
        assert!(!swap.ended);
        assert!(machine.is_invincible());
        assert!(machine.pending().is_none());

        let end = machine.update(3000, &pending, &templates, &mut rng);
        assert!(end.ended);
        assert!(end.swap_to.is_none());
        assert!(!machine.is_invincible());
        let next = machine.next_change_ms();
        assert!((3000 + 12_000..3000 + 30_000).contains(&next));
    }

    #[test]
    fn test_long_step_swaps_and_ends_together() {
        let mut rng = Pcg32::seed_from_u64(1);
        let templates = FrameConfig::templates();
        let mut machine = TransitionMachine::stable(u64::MAX);
        assert!(machine.trigger(100, &opening(), &templates, &mut rng));

        let update = machine.update(5000, &opening(), &templates, &mut rng);
        assert!(update.swap_to.is_some());
        assert!(update.ended);
        assert!(!machine.is_transitioning());
    }

    #[test]
    fn test_manual_trigger_keeps_schedule_until_completion() {
        let mut rng = Pcg32::seed_from_u64(3);
        let templates = FrameConfig::templates();
        let mut machine = TransitionMachine::stable(20_000);

        assert!(machine.trigger(1000, &opening(), &templates, &mut rng));
        assert_eq!(machine.next_change_ms(), 20_000);
        assert!(!machine.trigger(1500, &opening(), &templates, &mut rng));

        machine.update(4000, &opening(), &templates, &mut rng);
        assert!(!machine.is_transitioning());
        assert!((16_000..34_000).contains(&machine.next_change_ms()));
    }

    #[test]
    fn test_stable_before_schedule_does_nothing() {
        let mut rng = Pcg32::seed_from_u64(3);
        let templates = FrameConfig::templates();
        let mut machine = TransitionMachine::stable(10_000);
        let update = machine.update(9_999, &opening(), &templates, &mut rng);
        assert_eq!(update, TransitionUpdate::default());
        assert_eq!(machine.progress(9_999), None);
    }

    #[test]
    fn test_pick_never_repeats_current() {
        let mut rng = Pcg32::seed_from_u64(11);
        let templates = FrameConfig::templates();
        for current in &templates {
            for _ in 0..50 {
                let next = pick_next_config(current, &templates, &mut rng).unwrap();
                assert_ne!(next.holes(), current.holes());
            }
        }
    }

    #[test]
    fn test_pick_with_no_alternative() {
        let mut rng = Pcg32::seed_from_u64(11);
        let only = FrameConfig::new(&[ShapeKind::Star]).unwrap();
        let templates = vec![only.clone(), only.clone()];
        assert!(pick_next_config(&only, &templates, &mut rng).is_none());

        let mut machine = TransitionMachine::stable(0);
        let update = machine.update(0, &only, &templates, &mut rng);
        assert!(!update.started);
        assert!(!machine.is_transitioning());
    }

    #[test]
    fn test_progress_is_clamped() {
        let mut rng = Pcg32::seed_from_u64(5);
        let templates = FrameConfig::templates();
        let mut machine = TransitionMachine::stable(u64::MAX);
        machine.trigger(1000, &opening(), &templates, &mut rng);
        assert_eq!(machine.progress(1000), Some(0.0));
        assert_eq!(machine.progress(2500), Some(0.5));
        assert_eq!(machine.progress(99_000), Some(1.0));
    }
}
