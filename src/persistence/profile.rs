//! Persisted player profile: record, tokens, inventory and cosmetics

use serde::{Deserialize, Serialize};

use crate::sim::{Economy, InventoryItem};

/// Owned power-up charges, one counter per inventory item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Inventory {
    pub shield: u32,
    pub golden: u32,
    pub expand: u32,
    pub shrink: u32,
    pub slowmo: u32,
    #[serde(rename = "frameChange")]
    pub frame_change: u32,
}

impl Inventory {
    pub fn count(&self, item: InventoryItem) -> u32 {
        match item {
            InventoryItem::Shield => self.shield,
            InventoryItem::Golden => self.golden,
            InventoryItem::Expand => self.expand,
            InventoryItem::Shrink => self.shrink,
            InventoryItem::Slowmo => self.slowmo,
            InventoryItem::FrameChange => self.frame_change,
        }
    }

    pub fn slot_mut(&mut self, item: InventoryItem) -> &mut u32 {
        match item {
            InventoryItem::Shield => &mut self.shield,
            InventoryItem::Golden => &mut self.golden,
            InventoryItem::Expand => &mut self.expand,
            InventoryItem::Shrink => &mut self.shrink,
            InventoryItem::Slowmo => &mut self.slowmo,
            InventoryItem::FrameChange => &mut self.frame_change,
        }
    }
}

/// Everything stored about one player. Missing fields take defaults, so
/// old or partial records still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerProfile {
    pub name: String,
    pub high_score: u64,
    pub tokens: u64,
    pub owned_frame_colors: Vec<String>,
    pub owned_shape_colors: Vec<String>,
    pub owned_patterns: Vec<String>,
    pub power_up_inventory: Inventory,
    pub active_frame_color: String,
    pub active_shape_color: String,
    pub active_pattern: String,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            high_score: 0,
            tokens: 0,
            owned_frame_colors: vec!["default".to_string()],
            owned_shape_colors: vec!["default".to_string()],
            owned_patterns: vec!["solid".to_string()],
            power_up_inventory: Inventory::default(),
            active_frame_color: "default".to_string(),
            active_shape_color: "default".to_string(),
            active_pattern: "solid".to_string(),
        }
    }
}

impl PlayerProfile {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn storage_key(name: &str) -> String {
        format!("player_{name}_profile")
    }

    /// Load `name`'s profile, or a fresh one if none (or a corrupt one) is stored
    pub fn load(name: &str) -> Self {
        match super::load_json::<PlayerProfile>(&Self::storage_key(name)) {
            Some(mut profile) => {
                log::info!(
                    "Loaded profile '{}' ({} tokens, best {})",
                    name,
                    profile.tokens,
                    profile.high_score
                );
                profile.name = name.to_string();
                profile
            }
            None => {
                log::info!("New profile '{name}'");
                Self::new(name)
            }
        }
    }

    pub fn save(&self) -> bool {
        let saved = super::save_json(&Self::storage_key(&self.name), self);
        if saved {
            log::debug!("Profile '{}' saved", self.name);
        }
        saved
    }
}

impl Economy for PlayerProfile {
    fn tokens(&self) -> u64 {
        self.tokens
    }

    fn spend_tokens(&mut self, amount: u64) -> bool {
        if self.tokens < amount {
            log::warn!("Need {} tokens, have {}", amount, self.tokens);
            return false;
        }
        self.tokens -= amount;
        true
    }

    fn award_tokens(&mut self, amount: u64) {
        self.tokens += amount;
    }

    fn inventory(&self, item: InventoryItem) -> u32 {
        self.power_up_inventory.count(item)
    }

    fn consume_inventory(&mut self, item: InventoryItem) -> bool {
        let slot = self.power_up_inventory.slot_mut(item);
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    fn high_score(&self) -> u64 {
        self.high_score
    }

    fn set_high_score(&mut self, score: u64) {
        self.high_score = score;
    }

    fn commit(&mut self) {
        // Unnamed profiles are throwaway sessions
        if !self.name.is_empty() {
            self.save();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let profile = PlayerProfile::new("ada");
        assert_eq!(profile.owned_frame_colors, vec!["default"]);
        assert_eq!(profile.owned_patterns, vec!["solid"]);
        assert_eq!(profile.active_pattern, "solid");
        assert_eq!(profile.power_up_inventory, Inventory::default());
    }

    #[test]
    fn test_wire_format() {
        let mut profile = PlayerProfile::new("ada");
        profile.power_up_inventory.frame_change = 2;
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["power_up_inventory"]["frameChange"], 2);
        assert_eq!(json["high_score"], 0);
        assert_eq!(json["active_frame_color"], "default");
    }

    #[test]
    fn test_partial_record_fills_defaults() {
        let profile: PlayerProfile =
            serde_json::from_str(r#"{"tokens": 75, "power_up_inventory": {"slowmo": 3}}"#).unwrap();
        assert_eq!(profile.tokens, 75);
        assert_eq!(profile.power_up_inventory.slowmo, 3);
        assert_eq!(profile.power_up_inventory.shield, 0);
        assert_eq!(profile.owned_shape_colors, vec!["default"]);
    }

    #[test]
    fn test_save_and_load() {
        let mut profile = PlayerProfile::new("grace");
        profile.tokens = 120;
        profile.high_score = 900;
        assert!(profile.save());

        let loaded = PlayerProfile::load("grace");
        assert_eq!(loaded, profile);
    }

    #[test]
    fn test_corrupt_profile_starts_fresh() {
        super::super::write(&PlayerProfile::storage_key("broken"), "[1, 2");
        let loaded = PlayerProfile::load("broken");
        assert_eq!(loaded, PlayerProfile::new("broken"));
    }

    #[test]
    fn test_economy_rules() {
        let mut profile = PlayerProfile::default();
        profile.tokens = 40;
        assert!(!profile.spend_tokens(50));
        assert_eq!(profile.tokens, 40);
        assert!(profile.spend_tokens(40));
        assert_eq!(profile.tokens, 0);

        assert!(!profile.consume_inventory(InventoryItem::Expand));
        profile.power_up_inventory.expand = 1;
        assert!(profile.consume_inventory(InventoryItem::Expand));
        assert_eq!(profile.inventory(InventoryItem::Expand), 0);
    }

    #[test]
    fn test_commit_persists_named_profile() {
        let mut profile = PlayerProfile::new("linus");
        profile.award_tokens(15);
        profile.commit();
        assert_eq!(PlayerProfile::load("linus").tokens, 15);
    }
}
