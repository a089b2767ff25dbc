//! Document repository adapters
//!
//! Implements the repository traits from `repository.rs` on top of any
//! [`DocumentStore`]. Ids live in the document envelope, not in the
//! stored payload; adapters strip the `id` field on write and inject
//! the envelope id after deserialization.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::model::{Agent, Mission, Profile, RecruitedAgent, ShopItem, Team};
use super::document_store::{Document, DocumentStore, Query, StoreError};
use super::repository::{
    collections, AgentRepo, MissionRepo, ProfileRepo, RecruitRepo, ShopItemRepo,
    TeamRepo, Versioned,
};

/// A model stored as a document; the id is carried by the envelope
pub trait DocRecord: Serialize + DeserializeOwned {
    fn set_id(&mut self, id: String);
}

macro_rules! doc_record {
    ($($ty:ty),+) => {
        $(impl DocRecord for $ty {
            fn set_id(&mut self, id: String) {
                self.id = id;
            }
        })+
    };
}

doc_record!(Profile, ShopItem, Agent, RecruitedAgent, Mission, Team);

/// Serialize a record, dropping the redundant `id` payload field
pub fn encode<T: DocRecord>(record: &T) -> Result<Value, StoreError> {
    let mut value = serde_json::to_value(record)?;
    if let Value::Object(map) = &mut value {
        map.remove("id");
    }
    Ok(value)
}

fn decode<T: DocRecord>(doc: Document) -> Result<Versioned<T>, StoreError> {
    let mut value: T = serde_json::from_value(doc.data)?;
    value.set_id(doc.id);
    Ok(Versioned {
        value,
        version: doc.version,
    })
}

fn decode_all<T: DocRecord>(docs: Vec<Document>) -> Result<Vec<T>, StoreError> {
    docs.into_iter()
        .map(|doc| decode(doc).map(|v| v.value))
        .collect()
}

/// Generic adapter: one instance per collection
pub struct DocRepo {
    store: Arc<dyn DocumentStore>,
    collection: &'static str,
}

impl DocRepo {
    pub fn new(store: Arc<dyn DocumentStore>, collection: &'static str) -> Self {
        Self { store, collection }
    }

    async fn get_one<T: DocRecord>(&self, id: &str) -> Result<Option<Versioned<T>>, StoreError> {
        match self.store.get(self.collection, id).await? {
            Some(doc) => Ok(Some(decode(doc)?)),
            None => Ok(None),
        }
    }

    async fn find_one<T: DocRecord>(
        &self,
        field: &str,
        equals: &str,
    ) -> Result<Option<Versioned<T>>, StoreError> {
        let docs = self
            .store
            .query(
                self.collection,
                Query::all().filter(field, Value::String(equals.to_string())).limit(1),
            )
            .await?;
        match docs.into_iter().next() {
            Some(doc) => Ok(Some(decode(doc)?)),
            None => Ok(None),
        }
    }

    async fn list<T: DocRecord>(&self, query: Query) -> Result<Vec<T>, StoreError> {
        decode_all(self.store.query(self.collection, query).await?)
    }

    async fn create_record<T: DocRecord>(&self, record: &T) -> Result<String, StoreError> {
        self.store.create(self.collection, encode(record)?).await
    }
}

// ============================================================================
// Profile repository (profiles and characters collections)
// ============================================================================

pub struct DocProfileRepo {
    inner: DocRepo,
}

impl DocProfileRepo {
    pub fn new(store: Arc<dyn DocumentStore>, collection: &'static str) -> Self {
        Self {
            inner: DocRepo::new(store, collection),
        }
    }
}

#[async_trait]
impl ProfileRepo for DocProfileRepo {
    async fn get(&self, id: &str) -> Result<Option<Versioned<Profile>>, StoreError> {
        self.inner.get_one(id).await
    }

    async fn get_by_user(&self, user_id: &str) -> Result<Option<Versioned<Profile>>, StoreError> {
        self.inner.find_one("user_id", user_id).await
    }

    async fn get_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Versioned<Profile>>, StoreError> {
        self.inner.find_one("username", username).await
    }

    async fn get_all(&self) -> Result<Vec<Profile>, StoreError> {
        self.inner.list(Query::all()).await
    }

    async fn top_by(&self, field: &str, limit: usize) -> Result<Vec<Profile>, StoreError> {
        self.inner
            .list(Query::all().order_desc(field).limit(limit))
            .await
    }

    async fn by_class(&self, class: &str, limit: usize) -> Result<Vec<Profile>, StoreError> {
        self.inner
            .list(
                Query::all()
                    .filter("class", Value::String(class.to_string()))
                    .order_desc("creature_kills")
                    .limit(limit),
            )
            .await
    }

    async fn create(&self, profile: &Profile) -> Result<String, StoreError> {
        self.inner.create_record(profile).await
    }

    async fn update(&self, id: &str, patch: Value) -> Result<(), StoreError> {
        self.inner.store.update(self.inner.collection, id, patch).await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.inner.store.delete(self.inner.collection, id).await
    }

    async fn count(&self) -> Result<usize, StoreError> {
        self.inner.store.count(self.inner.collection).await
    }
}

// ============================================================================
// Shop catalog repository
// ============================================================================

pub struct DocShopItemRepo {
    inner: DocRepo,
}

impl DocShopItemRepo {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            inner: DocRepo::new(store, collections::SHOP_ITEMS),
        }
    }
}

#[async_trait]
impl ShopItemRepo for DocShopItemRepo {
    async fn get(&self, id: &str) -> Result<Option<Versioned<ShopItem>>, StoreError> {
        self.inner.get_one(id).await
    }

    async fn get_all(&self) -> Result<Vec<ShopItem>, StoreError> {
        self.inner.list(Query::all().order_asc("name")).await
    }

    async fn create(&self, item: &ShopItem) -> Result<String, StoreError> {
        self.inner.create_record(item).await
    }

    async fn update(&self, id: &str, patch: Value) -> Result<(), StoreError> {
        self.inner.store.update(self.inner.collection, id, patch).await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.inner.store.delete(self.inner.collection, id).await
    }

    async fn count(&self) -> Result<usize, StoreError> {
        self.inner.store.count(self.inner.collection).await
    }
}

// ============================================================================
// Agent catalog repository
// ============================================================================

pub struct DocAgentRepo {
    inner: DocRepo,
}

impl DocAgentRepo {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            inner: DocRepo::new(store, collections::AGENTS),
        }
    }
}

#[async_trait]
impl AgentRepo for DocAgentRepo {
    async fn get(&self, id: &str) -> Result<Option<Versioned<Agent>>, StoreError> {
        self.inner.get_one(id).await
    }

    async fn get_all(&self) -> Result<Vec<Agent>, StoreError> {
        self.inner.list(Query::all().order_asc("name")).await
    }

    async fn create(&self, agent: &Agent) -> Result<String, StoreError> {
        self.inner.create_record(agent).await
    }

    async fn update(&self, id: &str, patch: Value) -> Result<(), StoreError> {
        self.inner.store.update(self.inner.collection, id, patch).await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.inner.store.delete(self.inner.collection, id).await
    }

    async fn count(&self) -> Result<usize, StoreError> {
        self.inner.store.count(self.inner.collection).await
    }
}

// ============================================================================
// Recruited roster repository
// ============================================================================

pub struct DocRecruitRepo {
    inner: DocRepo,
}

impl DocRecruitRepo {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            inner: DocRepo::new(store, collections::RECRUITS),
        }
    }
}

#[async_trait]
impl RecruitRepo for DocRecruitRepo {
    async fn get_for_user(&self, user_id: &str) -> Result<Vec<RecruitedAgent>, StoreError> {
        self.inner
            .list(
                Query::all()
                    .filter("user_id", Value::String(user_id.to_string()))
                    .order_asc("recruited_at"),
            )
            .await
    }

    async fn count(&self) -> Result<usize, StoreError> {
        self.inner.store.count(self.inner.collection).await
    }
}

// ============================================================================
// Mission repository
// ============================================================================

pub struct DocMissionRepo {
    inner: DocRepo,
}

impl DocMissionRepo {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            inner: DocRepo::new(store, collections::MISSIONS),
        }
    }
}

#[async_trait]
impl MissionRepo for DocMissionRepo {
    async fn get(&self, id: &str) -> Result<Option<Versioned<Mission>>, StoreError> {
        self.inner.get_one(id).await
    }

    async fn get_all(&self) -> Result<Vec<Mission>, StoreError> {
        self.inner.list(Query::all().order_asc("created_at")).await
    }

    async fn get_available(&self) -> Result<Vec<Mission>, StoreError> {
        self.inner
            .list(
                Query::all()
                    .filter("status", Value::String("available".to_string()))
                    .order_asc("created_at"),
            )
            .await
    }

    async fn create(&self, mission: &Mission) -> Result<String, StoreError> {
        self.inner.create_record(mission).await
    }

    async fn update(&self, id: &str, patch: Value) -> Result<(), StoreError> {
        self.inner.store.update(self.inner.collection, id, patch).await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.inner.store.delete(self.inner.collection, id).await
    }

    async fn count(&self) -> Result<usize, StoreError> {
        self.inner.store.count(self.inner.collection).await
    }
}

// ============================================================================
// Team repository
// ============================================================================

pub struct DocTeamRepo {
    inner: DocRepo,
}

impl DocTeamRepo {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            inner: DocRepo::new(store, collections::TEAMS),
        }
    }
}

#[async_trait]
impl TeamRepo for DocTeamRepo {
    async fn get(&self, id: &str) -> Result<Option<Versioned<Team>>, StoreError> {
        self.inner.get_one(id).await
    }

    async fn get_all(&self) -> Result<Vec<Team>, StoreError> {
        self.inner.list(Query::all().order_asc("created_at")).await
    }

    async fn create(&self, team: &Team) -> Result<String, StoreError> {
        self.inner.create_record(team).await
    }

    async fn update(&self, id: &str, patch: Value) -> Result<(), StoreError> {
        self.inner.store.update(self.inner.collection, id, patch).await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.inner.store.delete(self.inner.collection, id).await
    }

    async fn count(&self) -> Result<usize, StoreError> {
        self.inner.store.count(self.inner.collection).await
    }
}
