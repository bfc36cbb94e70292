//! Power-up state machine
//!
//! `Idle -> Active(kind, end) -> Idle`. At most one power-up is active at a
//! time; activating while one is running is ignored.

use serde::{Deserialize, Serialize};

use super::geometry::SizeModifier;
use crate::consts::*;

/// The six power-up effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerUpKind {
    /// Absorbs fatal hits while active
    Shield,
    /// Every spawn is golden
    Golden,
    /// Frame width x1.4
    Expand,
    /// Frame width x0.65
    Shrink,
    /// Fall speed x0.4
    Slowmo,
    /// Instant burst of golden shapes, one per hole
    Triple,
}

impl PowerUpKind {
    /// Registered kinds, in the order power-up shapes draw from
    pub const ALL: [PowerUpKind; 6] = [
        PowerUpKind::Shield,
        PowerUpKind::Golden,
        PowerUpKind::Expand,
        PowerUpKind::Shrink,
        PowerUpKind::Slowmo,
        PowerUpKind::Triple,
    ];

    /// Effect duration; zero for instant effects
    pub fn duration_ms(&self) -> u64 {
        match self {
            PowerUpKind::Triple => 0,
            _ => POWER_UP_DURATION_MS,
        }
    }

    pub fn is_instant(&self) -> bool {
        self.duration_ms() == 0
    }

    pub fn size_modifier(&self) -> SizeModifier {
        match self {
            PowerUpKind::Expand => SizeModifier::Expanded,
            PowerUpKind::Shrink => SizeModifier::Shrunk,
            _ => SizeModifier::Normal,
        }
    }

    /// Whether this effect changes the frame width
    pub fn resizes_frame(&self) -> bool {
        self.size_modifier() != SizeModifier::Normal
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::Shield => "shield",
            PowerUpKind::Golden => "golden",
            PowerUpKind::Expand => "expand",
            PowerUpKind::Shrink => "shrink",
            PowerUpKind::Slowmo => "slowmo",
            PowerUpKind::Triple => "triple",
        }
    }
}

/// Items the player can hold in inventory and trigger from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InventoryItem {
    Slowmo,
    Shrink,
    FrameChange,
    Shield,
    Golden,
    Expand,
}

impl InventoryItem {
    /// Inventory slots in hotkey order (`1`..`6`)
    pub const ALL: [InventoryItem; 6] = [
        InventoryItem::Slowmo,
        InventoryItem::Shrink,
        InventoryItem::FrameChange,
        InventoryItem::Shield,
        InventoryItem::Golden,
        InventoryItem::Expand,
    ];

    /// The timed effect this item grants. `FrameChange` triggers a
    /// frame transition instead.
    pub fn power_up(&self) -> Option<PowerUpKind> {
        match self {
            InventoryItem::Slowmo => Some(PowerUpKind::Slowmo),
            InventoryItem::Shrink => Some(PowerUpKind::Shrink),
            InventoryItem::FrameChange => None,
            InventoryItem::Shield => Some(PowerUpKind::Shield),
            InventoryItem::Golden => Some(PowerUpKind::Golden),
            InventoryItem::Expand => Some(PowerUpKind::Expand),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InventoryItem::Slowmo => "slowmo",
            InventoryItem::Shrink => "shrink",
            InventoryItem::FrameChange => "frameChange",
            InventoryItem::Shield => "shield",
            InventoryItem::Golden => "golden",
            InventoryItem::Expand => "expand",
        }
    }
}

/// What an activation request did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Another power-up is already running
    Ignored,
    /// Timed effect started
    Started { kind: PowerUpKind, duration_ms: u64 },
    /// Instant effect fired; the machine is already back to idle
    Instant(PowerUpKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PowerUpState {
    #[default]
    Idle,
    Active { kind: PowerUpKind, end_ms: u64 },
}

/// Owns the single active power-up slot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PowerUpMachine {
    state: PowerUpState,
}

impl PowerUpMachine {
    pub fn state(&self) -> PowerUpState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, PowerUpState::Active { .. })
    }

    pub fn active_kind(&self) -> Option<PowerUpKind> {
        match self.state {
            PowerUpState::Active { kind, .. } => Some(kind),
            PowerUpState::Idle => None,
        }
    }

    pub fn is(&self, kind: PowerUpKind) -> bool {
        self.active_kind() == Some(kind)
    }

    /// Frame width modifier implied by the active power-up
    pub fn size_modifier(&self) -> SizeModifier {
        self.active_kind()
            .map_or(SizeModifier::Normal, |kind| kind.size_modifier())
    }

    /// Fall speed multiplier implied by the active power-up
    pub fn speed_factor(&self) -> f32 {
        if self.is(PowerUpKind::Slowmo) {
            SLOWMO_FACTOR
        } else {
            1.0
        }
    }

    /// Remaining time of the active effect
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        match self.state {
            PowerUpState::Active { end_ms, .. } => end_ms.saturating_sub(now_ms),
            PowerUpState::Idle => 0,
        }
    }

    /// Try to start `kind`. Instant kinds enter and leave `Active` in the
    /// same call, so the caller only sees `Instant`.
    pub fn activate(&mut self, kind: PowerUpKind, now_ms: u64) -> Activation {
        if self.is_active() {
            log::debug!(
                "Power-up {} ignored, {:?} still active",
                kind.as_str(),
                self.active_kind()
            );
            return Activation::Ignored;
        }

        if kind.is_instant() {
            log::debug!("Instant power-up {}", kind.as_str());
            return Activation::Instant(kind);
        }

        let duration_ms = kind.duration_ms();
        self.state = PowerUpState::Active {
            kind,
            end_ms: now_ms + duration_ms,
        };
        log::debug!("Power-up {} active for {}ms", kind.as_str(), duration_ms);
        Activation::Started { kind, duration_ms }
    }

    /// Expire the active effect once its end time is reached.
    /// Returns the kind that just ended.
    pub fn update(&mut self, now_ms: u64) -> Option<PowerUpKind> {
        match self.state {
            PowerUpState::Active { kind, end_ms } if now_ms >= end_ms => {
                self.state = PowerUpState::Idle;
                log::debug!("Power-up {} expired", kind.as_str());
                Some(kind)
            }
            _ => None,
        }
    }

    /// Drop any active effect without reporting expiry (new game / continue)
    pub fn clear(&mut self) {
        self.state = PowerUpState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_timed_activation_and_expiry() {
        let mut machine = PowerUpMachine::default();
        let result = machine.activate(PowerUpKind::Shield, 1000);
        assert_eq!(
            result,
            Activation::Started {
                kind: PowerUpKind::Shield,
                duration_ms: 5000
            }
        );
        assert!(machine.is(PowerUpKind::Shield));
        assert_eq!(machine.remaining_ms(3000), 3000);

        assert_eq!(machine.update(5999), None);
        assert_eq!(machine.update(6000), Some(PowerUpKind::Shield));
        assert!(!machine.is_active());
        assert_eq!(machine.update(7000), None);
    }

    #[test]
    fn test_second_activation_is_ignored() {
        let mut machine = PowerUpMachine::default();
        machine.activate(PowerUpKind::Expand, 0);
        assert_eq!(machine.activate(PowerUpKind::Shrink, 100), Activation::Ignored);
        assert_eq!(machine.active_kind(), Some(PowerUpKind::Expand));
        assert_eq!(machine.remaining_ms(100), 4900);
    }

    #[test]
    fn test_triple_is_instant() {
        let mut machine = PowerUpMachine::default();
        assert_eq!(
            machine.activate(PowerUpKind::Triple, 0),
            Activation::Instant(PowerUpKind::Triple)
        );
        assert!(!machine.is_active());
    }

    #[test]
    fn test_triple_blocked_while_active() {
        let mut machine = PowerUpMachine::default();
        machine.activate(PowerUpKind::Golden, 0);
        assert_eq!(machine.activate(PowerUpKind::Triple, 10), Activation::Ignored);
    }

    #[test]
    fn test_effect_queries() {
        let mut machine = PowerUpMachine::default();
        assert_eq!(machine.speed_factor(), 1.0);
        machine.activate(PowerUpKind::Slowmo, 0);
        assert_eq!(machine.speed_factor(), SLOWMO_FACTOR);
        assert_eq!(machine.size_modifier(), SizeModifier::Normal);
        machine.clear();
        machine.activate(PowerUpKind::Shrink, 0);
        assert_eq!(machine.size_modifier(), SizeModifier::Shrunk);
    }

    #[test]
    fn test_inventory_items_map_to_power_ups() {
        assert_eq!(InventoryItem::FrameChange.power_up(), None);
        assert_eq!(InventoryItem::Expand.power_up(), Some(PowerUpKind::Expand));
        assert!(InventoryItem::ALL
            .iter()
            .filter_map(|item| item.power_up())
            .all(|kind| !kind.is_instant()));
    }

    fn any_kind() -> impl Strategy<Value = PowerUpKind> {
        prop::sample::select(PowerUpKind::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_single_active_power_up(
            steps in prop::collection::vec((any_kind(), 0u64..3000), 1..40)
        ) {
            let mut machine = PowerUpMachine::default();
            let mut now = 0;
            for (kind, advance) in steps {
                now += advance;
                machine.update(now);
                let before = machine.state();
                let result = machine.activate(kind, now);
                if matches!(before, PowerUpState::Active { .. }) {
                    prop_assert_eq!(result, Activation::Ignored);
                    prop_assert_eq!(machine.state(), before);
                }
                let modifier = machine.size_modifier();
                prop_assert!([1.0, EXPAND_FACTOR, SHRINK_FACTOR].contains(&modifier.factor()));
            }
        }
    }
}
