//! Player profile and character sheet model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::item::InventoryItem;

/// Character class. The three playable classes are closed; free-text
/// classes are allowed for master-authored generic character sheets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CharacterClass {
    Ocultista,
    Especialista,
    Combatente,
    Custom(String),
}

impl CharacterClass {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ocultista => "Ocultista",
            Self::Especialista => "Especialista",
            Self::Combatente => "Combatente",
            Self::Custom(name) => name,
        }
    }
}

impl From<String> for CharacterClass {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Ocultista" => Self::Ocultista,
            "Especialista" => Self::Especialista,
            "Combatente" => Self::Combatente,
            _ => Self::Custom(value),
        }
    }
}

impl From<CharacterClass> for String {
    fn from(value: CharacterClass) -> Self {
        value.as_str().to_string()
    }
}

/// The six rolled attribute scores, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            strength: 10,
            dexterity: 10,
            constitution: 10,
            intelligence: 10,
            wisdom: 10,
            charisma: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<u32>,
}

/// A user's persistent progression record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub id: String,
    pub user_id: String,
    pub username: String,
    pub class: CharacterClass,
    pub level: u32,
    pub experience: u64,
    pub health: i32,
    pub max_health: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mana: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_mana: Option<i32>,
    pub attributes: Attributes,
    pub creature_kills: u32,
    pub player_kills: u32,
    pub deaths: u32,
    pub gold: u64,
    #[serde(default)]
    pub inventory: Vec<InventoryItem>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_deceased: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause_of_death: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
