//! Repository traits - typed data access over the document gateway
//!
//! One trait per collection; domain services interact with data through
//! these, so the store backend can be swapped without touching the
//! rules layer. Reads on mutable entities return [`Versioned`] values
//! carrying the document version for guarded commits.

use async_trait::async_trait;
use serde_json::Value;

use crate::model::{
    Agent, Mission, Profile, RecruitedAgent, ShopItem, Team,
};
use super::document_store::{DocumentStore, StoreError, WriteOp};
use std::sync::Arc;

/// Collection names in the hosted store
pub mod collections {
    pub const PROFILES: &str = "profiles";
    pub const CHARACTERS: &str = "characters";
    pub const MISSIONS: &str = "missions";
    pub const TEAMS: &str = "teams";
    pub const SHOP_ITEMS: &str = "shop_items";
    pub const AGENTS: &str = "agents";
    pub const RECRUITS: &str = "recruits";
}

/// A typed record together with its document version
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    pub value: T,
    pub version: u64,
}

/// Repository for player profiles (and, under a second collection,
/// master-authored generic character sheets)
#[async_trait]
pub trait ProfileRepo: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<Versioned<Profile>>, StoreError>;
    async fn get_by_user(&self, user_id: &str) -> Result<Option<Versioned<Profile>>, StoreError>;
    async fn get_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Versioned<Profile>>, StoreError>;
    async fn get_all(&self) -> Result<Vec<Profile>, StoreError>;
    /// Top N profiles ordered descending on a numeric field
    async fn top_by(&self, field: &str, limit: usize) -> Result<Vec<Profile>, StoreError>;
    /// Profiles of one class ordered descending by creature kills
    async fn by_class(&self, class: &str, limit: usize) -> Result<Vec<Profile>, StoreError>;
    async fn create(&self, profile: &Profile) -> Result<String, StoreError>;
    async fn update(&self, id: &str, patch: Value) -> Result<(), StoreError>;
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
    async fn count(&self) -> Result<usize, StoreError>;
}

/// Repository for the shop catalog
#[async_trait]
pub trait ShopItemRepo: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<Versioned<ShopItem>>, StoreError>;
    async fn get_all(&self) -> Result<Vec<ShopItem>, StoreError>;
    async fn create(&self, item: &ShopItem) -> Result<String, StoreError>;
    async fn update(&self, id: &str, patch: Value) -> Result<(), StoreError>;
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
    async fn count(&self) -> Result<usize, StoreError>;
}

/// Repository for the recruitable agent catalog
#[async_trait]
pub trait AgentRepo: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<Versioned<Agent>>, StoreError>;
    async fn get_all(&self) -> Result<Vec<Agent>, StoreError>;
    async fn create(&self, agent: &Agent) -> Result<String, StoreError>;
    async fn update(&self, id: &str, patch: Value) -> Result<(), StoreError>;
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
    async fn count(&self) -> Result<usize, StoreError>;
}

/// Repository for per-user recruited rosters
#[async_trait]
pub trait RecruitRepo: Send + Sync {
    async fn get_for_user(&self, user_id: &str) -> Result<Vec<RecruitedAgent>, StoreError>;
    async fn count(&self) -> Result<usize, StoreError>;
}

/// Repository for missions
#[async_trait]
pub trait MissionRepo: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<Versioned<Mission>>, StoreError>;
    async fn get_all(&self) -> Result<Vec<Mission>, StoreError>;
    /// Missions with the admin-maintained `available` status
    async fn get_available(&self) -> Result<Vec<Mission>, StoreError>;
    async fn create(&self, mission: &Mission) -> Result<String, StoreError>;
    async fn update(&self, id: &str, patch: Value) -> Result<(), StoreError>;
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
    async fn count(&self) -> Result<usize, StoreError>;
}

/// Repository for teams
#[async_trait]
pub trait TeamRepo: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<Versioned<Team>>, StoreError>;
    async fn get_all(&self) -> Result<Vec<Team>, StoreError>;
    async fn create(&self, team: &Team) -> Result<String, StoreError>;
    async fn update(&self, id: &str, patch: Value) -> Result<(), StoreError>;
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
    async fn count(&self) -> Result<usize, StoreError>;
}

/// Central storage manager that holds all repositories plus the raw
/// gateway handle used for cross-collection atomic commits
pub struct StorageManager {
    pub store: Arc<dyn DocumentStore>,
    pub profiles: Box<dyn ProfileRepo>,
    pub characters: Box<dyn ProfileRepo>,
    pub shop_items: Box<dyn ShopItemRepo>,
    pub agents: Box<dyn AgentRepo>,
    pub recruits: Box<dyn RecruitRepo>,
    pub missions: Box<dyn MissionRepo>,
    pub teams: Box<dyn TeamRepo>,
}

impl StorageManager {
    /// Apply a batch of writes atomically at the gateway
    pub async fn commit(&self, ops: Vec<WriteOp>) -> Result<(), StoreError> {
        self.store.commit(ops).await
    }
}
