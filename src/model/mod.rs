//! Domain models stored in the document collections
//!
//! Structs here map 1:1 onto stored JSON documents. Fields that ranking
//! and browse queries order or filter on (`level`, `experience`,
//! `creature_kills`, `deaths`, `gold`, `class`, `status`) stay at the
//! top level of the document.

pub mod agent;
pub mod item;
pub mod mission;
pub mod profile;
pub mod team;

pub use agent::{Agent, AgentRarity, AgentStats, RecruitedAgent};
pub use item::{InventoryItem, ItemKind, ItemRarity, ShopItem};
pub use mission::{
    Difficulty, Mission, MissionRequirements, MissionReward, MissionStatus,
};
pub use profile::{Attributes, CharacterClass, Profile, Skill};
pub use team::{Team, TeamMember, TeamRole};
