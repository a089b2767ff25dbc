//! Shop catalog and inventory item models

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Weapon,
    Armor,
    Consumable,
    Quest,
    Other,
}

/// Item rarity, ordered by scarcity. Labeling only; nothing mechanical
/// hangs off it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ItemRarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl ItemRarity {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Common => "Common",
            Self::Uncommon => "Uncommon",
            Self::Rare => "Rare",
            Self::Epic => "Epic",
            Self::Legendary => "Legendary",
        }
    }
}

/// Catalog entry in the shop; stock is mutated only by purchases
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopItem {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
    pub rarity: ItemRarity,
    #[serde(default)]
    pub description: String,
    pub price: u64,
    pub stock: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defense: Option<i32>,
}

impl Default for ShopItem {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            kind: ItemKind::Other,
            rarity: ItemRarity::Common,
            description: String::new(),
            price: 0,
            stock: 0,
            damage: None,
            defense: None,
        }
    }
}

/// Owned item embedded in a profile's inventory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
    pub rarity: ItemRarity,
    #[serde(default)]
    pub description: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defense: Option<i32>,
}

impl InventoryItem {
    /// Purchases stack onto entries matching name, kind and rarity
    pub fn stacks_with(&self, item: &ShopItem) -> bool {
        self.name == item.name && self.kind == item.kind && self.rarity == item.rarity
    }
}
