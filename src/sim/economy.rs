//! Contract with the persisted player economy
//!
//! The simulation reads and adjusts tokens, inventory and the high score
//! through this trait. Failures mean "not permitted" and are never fatal.

use super::powerup::InventoryItem;

pub trait Economy {
    fn tokens(&self) -> u64;

    /// Spend `amount` tokens; false (and no change) if the balance is short
    fn spend_tokens(&mut self, amount: u64) -> bool;

    /// Credit tokens earned at game end
    fn award_tokens(&mut self, amount: u64);

    fn inventory(&self, item: InventoryItem) -> u32;

    /// Remove one unit of `item`; false (and no change) if none are held
    fn consume_inventory(&mut self, item: InventoryItem) -> bool;

    fn high_score(&self) -> u64;

    fn set_high_score(&mut self, score: u64);

    /// Persist pending changes. Best-effort: implementations log failures
    /// and must never block the simulation.
    fn commit(&mut self) {}
}
