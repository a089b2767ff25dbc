//! Mission model with per-user accepted/completed membership sets

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Legendary,
}

/// Admin-maintained browse filter, independent of the per-user sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionStatus {
    Available,
    Active,
    Completed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionReward {
    pub experience: u64,
    pub gold: u64,
}

/// Advisory requirements, filtered in the UI only
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionRequirements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_level: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_classes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_team: Option<String>,
}

/// Invariant: every id in `completed_by` also appears in `accepted_by`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mission {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub difficulty: Difficulty,
    pub status: MissionStatus,
    pub reward: MissionReward,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<MissionRequirements>,
    #[serde(default)]
    pub accepted_by: Vec<String>,
    #[serde(default)]
    pub completed_by: Vec<String>,
    pub created_by: String,
    #[serde(default)]
    pub created_by_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Mission {
    pub fn is_accepted_by(&self, user_id: &str) -> bool {
        self.accepted_by.iter().any(|id| id == user_id)
    }

    pub fn is_completed_by(&self, user_id: &str) -> bool {
        self.completed_by.iter().any(|id| id == user_id)
    }
}
