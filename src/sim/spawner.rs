//! Shape spawning: cadence, randomized shapes and the triple burst

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::{Frame, ShapeKind};
use super::powerup::PowerUpKind;
use super::state::FallingShape;
use crate::consts::*;

/// Spawn cadence. The interval only ever shrinks, down to the floor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    /// Ticks since the last spawn
    pub timer: u32,
    /// Ticks between spawns
    pub interval: f32,
}

impl Default for Spawner {
    fn default() -> Self {
        Self {
            timer: 0,
            interval: SPAWN_INTERVAL_START,
        }
    }
}

impl Spawner {
    /// Count one tick; true when a shape is due
    pub fn advance(&mut self) -> bool {
        self.timer += 1;
        if self.timer as f32 >= self.interval {
            self.timer = 0;
            true
        } else {
            false
        }
    }

    /// Speed up the cadence by one tick's worth of decay
    pub fn decay(&mut self) {
        if self.interval > SPAWN_INTERVAL_FLOOR {
            self.interval = (self.interval - SPAWN_INTERVAL_DECAY).max(SPAWN_INTERVAL_FLOOR);
            if self.interval == SPAWN_INTERVAL_FLOOR {
                log::debug!("Spawn interval reached its floor");
            }
        }
    }
}

/// Fall speed for a shape spawned at `score`: base plus a capped,
/// jittered score bonus
fn shape_speed(score: u64, jitter: f32) -> f32 {
    let bonus = (score as f32 / 50.0 * 0.25).min(SHAPE_MAX_SPEED_BONUS);
    SHAPE_BASE_SPEED + bonus * (0.6 + jitter * 0.4)
}

/// Spawn one random shape just above the screen.
///
/// Golden and power-up variants are exclusive: a forced golden wins, then
/// the 5% golden roll, then the 15% power-up roll.
pub fn spawn_shape(
    rng: &mut impl Rng,
    id: u32,
    score: u64,
    golden_forced: bool,
    screen_width: f32,
) -> FallingShape {
    let kind = ShapeKind::ALL[rng.random_range(0..ShapeKind::ALL.len())];
    let size = SHAPE_SIZE;
    let x = rng.random::<f32>() * (screen_width - size * 2.0) + size;
    let speed = shape_speed(score, rng.random::<f32>());

    let mut golden = false;
    let mut power_up = None;
    if golden_forced || rng.random_bool(GOLDEN_CHANCE) {
        golden = true;
    } else if rng.random_bool(POWER_UP_SHAPE_CHANCE) {
        power_up = Some(PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())]);
    }

    FallingShape {
        id,
        kind,
        pos: Vec2::new(x, -size),
        size,
        speed,
        rotation: 0.0,
        rotation_speed: (rng.random::<f32>() - 0.5) * 0.05,
        golden,
        power_up,
    }
}

/// One golden shape per hole, pre-matched and aligned with the hole.
/// Ids are assigned consecutively from `first_id`.
pub fn spawn_triple(frame: &Frame, first_id: u32) -> Vec<FallingShape> {
    frame
        .holes
        .iter()
        .zip(first_id..)
        .map(|(hole, id)| FallingShape {
            id,
            kind: hole.kind,
            pos: Vec2::new(frame.hole_center_x(hole), TRIPLE_SPAWN_Y),
            size: TRIPLE_SHAPE_SIZE,
            speed: TRIPLE_SHAPE_SPEED,
            rotation: 0.0,
            rotation_speed: 0.0,
            golden: true,
            power_up: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::{FrameConfig, SizeModifier, build_frame};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_cadence_starts_at_120_ticks() {
        let mut spawner = Spawner::default();
        let due: Vec<bool> = (0..120).map(|_| spawner.advance()).collect();
        assert!(due[..119].iter().all(|d| !d));
        assert!(due[119]);
        assert_eq!(spawner.timer, 0);
    }

    #[test]
    fn test_decay_stops_at_floor() {
        let mut spawner = Spawner::default();
        for _ in 0..20_000 {
            spawner.decay();
        }
        assert_eq!(spawner.interval, SPAWN_INTERVAL_FLOOR);
    }

    #[test]
    fn test_golden_forced_spawns() {
        let mut rng = Pcg32::seed_from_u64(2024);
        for id in 0..10 {
            let shape = spawn_shape(&mut rng, id, 0, true, 800.0);
            assert!(shape.golden);
            assert!(!shape.is_power_up());
        }
    }

    #[test]
    fn test_spawn_bounds_and_speed() {
        let mut rng = Pcg32::seed_from_u64(5);
        for id in 0..500 {
            let shape = spawn_shape(&mut rng, id, 0, false, 800.0);
            assert!(shape.pos.x >= SHAPE_SIZE && shape.pos.x <= 800.0 - SHAPE_SIZE);
            assert_eq!(shape.pos.y, -SHAPE_SIZE);
            // No score, no bonus
            assert_eq!(shape.speed, SHAPE_BASE_SPEED);
            assert!(!(shape.golden && shape.is_power_up()));
        }
    }

    #[test]
    fn test_speed_bonus_capped() {
        let mut rng = Pcg32::seed_from_u64(5);
        for id in 0..200 {
            let shape = spawn_shape(&mut rng, id, 1_000_000, false, 800.0);
            assert!(shape.speed >= SHAPE_BASE_SPEED + SHAPE_MAX_SPEED_BONUS * 0.6 - 1e-4);
            assert!(shape.speed <= SHAPE_BASE_SPEED + SHAPE_MAX_SPEED_BONUS + 1e-4);
        }
    }

    #[test]
    fn test_variant_rates_are_plausible() {
        let mut rng = Pcg32::seed_from_u64(99);
        let n = 20_000;
        let shapes: Vec<_> = (0..n)
            .map(|id| spawn_shape(&mut rng, id, 0, false, 800.0))
            .collect();
        let golden = shapes.iter().filter(|s| s.golden).count() as f64 / n as f64;
        let power = shapes.iter().filter(|s| s.is_power_up()).count() as f64 / n as f64;
        assert!((golden - 0.05).abs() < 0.01, "golden rate {golden}");
        // 15% of the 95% that were not golden
        assert!((power - 0.1425).abs() < 0.015, "power-up rate {power}");
        assert!(shapes
            .iter()
            .filter_map(|s| s.power_up)
            .any(|k| k == PowerUpKind::Triple));
    }

    #[test]
    fn test_triple_matches_holes() {
        let config = FrameConfig::templates()[0].clone();
        let frame = build_frame(&config, None, Vec2::new(800.0, 600.0), SizeModifier::Normal);
        let shapes = spawn_triple(&frame, 11);
        assert_eq!(shapes.len(), 3);
        for (shape, hole) in shapes.iter().zip(&frame.holes) {
            assert_eq!(shape.kind, hole.kind);
            assert!(shape.golden);
            assert_eq!(frame.hole_at(shape.pos.x).map(|h| h.kind), Some(hole.kind));
            assert_eq!(shape.speed, TRIPLE_SHAPE_SPEED);
        }
        assert_eq!(shapes.iter().map(|s| s.id).collect::<Vec<_>>(), vec![11, 12, 13]);
    }

    proptest! {
        #[test]
        fn prop_interval_monotonic(steps in 1usize..10_000) {
            let mut spawner = Spawner::default();
            let mut last = spawner.interval;
            for _ in 0..steps {
                spawner.decay();
                prop_assert!(spawner.interval <= last);
                prop_assert!(spawner.interval >= SPAWN_INTERVAL_FLOOR);
                last = spawner.interval;
            }
        }
    }
}
