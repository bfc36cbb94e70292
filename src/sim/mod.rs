//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Simulation clock advanced only by ticks
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies; storage is reached through
//!   the [`Economy`] trait

pub mod collision;
pub mod economy;
pub mod events;
pub mod geometry;
pub mod powerup;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod transition;

pub use collision::{CollisionOutcome, Protection, check_shape, points_for};
pub use economy::Economy;
pub use events::{EventSink, GameEvent, MissCause};
pub use geometry::{Frame, FrameConfig, Hole, ShapeKind, SizeModifier, build_frame};
pub use powerup::{InventoryItem, PowerUpKind, PowerUpMachine, PowerUpState};
pub use spawner::{Spawner, spawn_shape, spawn_triple};
pub use state::{FallingShape, GamePhase, GameState};
pub use tick::{TickInput, activate_power_up, continue_game, end_game, tick, use_inventory_item};
pub use transition::{TransitionMachine, TransitionState};
