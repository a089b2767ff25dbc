//! Team model: bounded-capacity group with one leader

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MIN_TEAM_CAPACITY: u32 = 2;
pub const MAX_TEAM_CAPACITY: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamRole {
    Leader,
    Member,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    pub user_id: String,
    pub username: String,
    pub role: TeamRole,
    pub joined_at: DateTime<Utc>,
}

/// Invariants: exactly one member has `role == Leader` and that
/// member's `user_id` equals `leader_id`; `members.len() <= max_members`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub leader_id: String,
    pub leader_name: String,
    pub members: Vec<TeamMember>,
    pub max_members: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Team {
    pub fn has_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m.user_id == user_id)
    }

    pub fn is_full(&self) -> bool {
        self.members.len() as u32 >= self.max_members
    }
}
