//! Token shop: power-up charges and cosmetics
//!
//! Power-ups can be bought any number of times. Cosmetics are bought once,
//! become active on purchase and can be re-selected for free afterwards.

use std::fmt;

use crate::persistence::PlayerProfile;
use crate::sim::{Economy, InventoryItem};

/// Cosmetic slot a catalog item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CosmeticCategory {
    FrameColor,
    ShapeColor,
    Pattern,
}

impl CosmeticCategory {
    pub const ALL: [CosmeticCategory; 3] = [
        CosmeticCategory::FrameColor,
        CosmeticCategory::ShapeColor,
        CosmeticCategory::Pattern,
    ];

    pub fn catalog(&self) -> &'static [CatalogItem] {
        match self {
            CosmeticCategory::FrameColor => FRAME_COLORS,
            CosmeticCategory::ShapeColor => SHAPE_COLORS,
            CosmeticCategory::Pattern => PATTERNS,
        }
    }

    pub fn find(&self, id: &str) -> Option<&'static CatalogItem> {
        self.catalog().iter().find(|item| item.id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogItem {
    pub id: &'static str,
    pub price: u64,
}

const fn item(id: &'static str, price: u64) -> CatalogItem {
    CatalogItem { id, price }
}

pub const FRAME_COLORS: &[CatalogItem] = &[
    item("default", 0),
    item("neon-cyan", 100),
    item("neon-purple", 100),
    item("neon-pink", 100),
    item("golden", 200),
    item("emerald", 200),
];

pub const SHAPE_COLORS: &[CatalogItem] = &[
    item("default", 0),
    item("neon", 100),
    item("pastel", 150),
    item("fire", 180),
    item("ice", 180),
];

pub const PATTERNS: &[CatalogItem] = &[
    item("solid", 0),
    item("striped", 100),
    item("dotted", 80),
    item("gradient", 120),
];

/// Price of one inventory charge
pub fn power_up_price(item: InventoryItem) -> u64 {
    match item {
        InventoryItem::Slowmo => 35,
        InventoryItem::Shrink => 25,
        InventoryItem::FrameChange => 20,
        InventoryItem::Shield => 30,
        InventoryItem::Golden => 40,
        InventoryItem::Expand => 25,
    }
}

/// Why a purchase was refused. Nothing changes on refusal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketError {
    UnknownItem,
    AlreadyOwned,
    NotEnoughTokens { price: u64, balance: u64 },
}

impl fmt::Display for MarketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketError::UnknownItem => write!(f, "no such item"),
            MarketError::AlreadyOwned => write!(f, "already owned"),
            MarketError::NotEnoughTokens { price, balance } => {
                write!(f, "costs {price} tokens, have {balance}")
            }
        }
    }
}

impl std::error::Error for MarketError {}

impl PlayerProfile {
    fn owned_mut(&mut self, category: CosmeticCategory) -> &mut Vec<String> {
        match category {
            CosmeticCategory::FrameColor => &mut self.owned_frame_colors,
            CosmeticCategory::ShapeColor => &mut self.owned_shape_colors,
            CosmeticCategory::Pattern => &mut self.owned_patterns,
        }
    }

    fn active_mut(&mut self, category: CosmeticCategory) -> &mut String {
        match category {
            CosmeticCategory::FrameColor => &mut self.active_frame_color,
            CosmeticCategory::ShapeColor => &mut self.active_shape_color,
            CosmeticCategory::Pattern => &mut self.active_pattern,
        }
    }

    pub fn owns(&self, category: CosmeticCategory, id: &str) -> bool {
        let owned = match category {
            CosmeticCategory::FrameColor => &self.owned_frame_colors,
            CosmeticCategory::ShapeColor => &self.owned_shape_colors,
            CosmeticCategory::Pattern => &self.owned_patterns,
        };
        owned.iter().any(|o| o == id)
    }

    pub fn active(&self, category: CosmeticCategory) -> &str {
        match category {
            CosmeticCategory::FrameColor => &self.active_frame_color,
            CosmeticCategory::ShapeColor => &self.active_shape_color,
            CosmeticCategory::Pattern => &self.active_pattern,
        }
    }

    fn charge(&mut self, price: u64) -> Result<(), MarketError> {
        if !self.spend_tokens(price) {
            return Err(MarketError::NotEnoughTokens {
                price,
                balance: self.tokens,
            });
        }
        Ok(())
    }

    /// Buy one charge of `item` into the inventory
    pub fn buy_power_up(&mut self, item: InventoryItem) -> Result<(), MarketError> {
        self.charge(power_up_price(item))?;
        *self.power_up_inventory.slot_mut(item) += 1;
        self.commit();
        log::info!("Bought {} ({} tokens left)", item.as_str(), self.tokens);
        Ok(())
    }

    /// Buy a cosmetic and make it active
    pub fn buy_cosmetic(
        &mut self,
        category: CosmeticCategory,
        id: &str,
    ) -> Result<(), MarketError> {
        let item = category.find(id).ok_or(MarketError::UnknownItem)?;
        if self.owns(category, id) {
            return Err(MarketError::AlreadyOwned);
        }
        self.charge(item.price)?;

        self.owned_mut(category).push(id.to_string());
        *self.active_mut(category) = id.to_string();
        self.commit();
        log::info!("Bought cosmetic {} ({} tokens left)", id, self.tokens);
        Ok(())
    }

    /// Make an owned cosmetic active. False if it is not owned.
    pub fn select_cosmetic(&mut self, category: CosmeticCategory, id: &str) -> bool {
        if !self.owns(category, id) {
            log::warn!("Cannot select unowned cosmetic '{id}'");
            return false;
        }
        *self.active_mut(category) = id.to_string();
        self.commit();
        true
    }
}
