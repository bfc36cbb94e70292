//! Platform abstraction layer
//!
//! Keyboard mapping and frame pacing shared by every front end, plus the
//! browser binding (wasm32 only).

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::consts::{MAX_FRAME_MS, MAX_SUBSTEPS, TICK_MS};
use crate::sim::{InventoryItem, TickInput};

/// Turns variable frame times into whole `TICK_MS` simulation steps.
/// The leftover fraction carries into the next frame.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `TICK_MS` steps to run for a frame that took `dt_ms`
    pub fn steps(&mut self, dt_ms: f64) -> u32 {
        let step = TICK_MS as f64;
        self.accumulator += dt_ms.clamp(0.0, MAX_FRAME_MS);

        let mut substeps = 0;
        while self.accumulator >= step && substeps < MAX_SUBSTEPS {
            self.accumulator -= step;
            substeps += 1;
        }
        substeps
    }
}

/// What a key press asks the game to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    UseItem(InventoryItem),
    TogglePause,
}

impl KeyCommand {
    /// Map a DOM `KeyboardEvent.key` value. Digits 1-6 spend inventory
    /// items in hotkey order.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Escape" | "p" | "P" => Some(KeyCommand::TogglePause),
            _ => inventory_item_for_key(key).map(KeyCommand::UseItem),
        }
    }

    /// Fold the command into the next tick's input
    pub fn apply(&self, input: &mut TickInput) {
        match *self {
            KeyCommand::UseItem(item) => input.use_item = Some(item),
            KeyCommand::TogglePause => input.pause = !input.pause,
        }
    }
}

pub fn inventory_item_for_key(key: &str) -> Option<InventoryItem> {
    let digit: usize = key.parse().ok()?;
    InventoryItem::ALL.get(digit.checked_sub(1)?).copied()
}
