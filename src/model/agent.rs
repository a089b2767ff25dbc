//! Recruitable agent catalog and per-user recruited roster

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Agent rarity. A distinct closed set from `ItemRarity` (no Uncommon
/// tier); the two are never converted into each other.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AgentRarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

/// Agent stat block, each score 1-10
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentStats {
    pub strength: u8,
    pub speed: u8,
    pub endurance: u8,
    pub intelligence: u8,
}

impl Default for AgentStats {
    fn default() -> Self {
        Self {
            strength: 5,
            speed: 5,
            endurance: 5,
            intelligence: 5,
        }
    }
}

/// Catalog entry; not owned by anyone until recruited
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: u64,
    #[serde(default)]
    pub image_url: String,
    pub stats: AgentStats,
    #[serde(default)]
    pub special_ability: String,
    pub rarity: AgentRarity,
    pub created_at: DateTime<Utc>,
}

/// Per-user roster row created by a successful recruitment. Recruits
/// never stack; every recruitment appends a new row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecruitedAgent {
    #[serde(default)]
    pub id: String,
    pub user_id: String,
    pub agent_id: String,
    pub agent_name: String,
    #[serde(default)]
    pub agent_image: String,
    pub recruited_at: DateTime<Utc>,
    pub level: u32,
    pub experience: u64,
}
