//! Storage layer - unified data access
//!
//! Implements the repository pattern over a document-store gateway:
//!
//! ```text
//! [Domain Services]
//!       ↓
//! [Repository Traits]  (typed, one per collection)
//!       ↓
//! [DocumentStore]      (JSON documents, versioned, atomic commit)
//! ```
//!
//! The in-memory backend serves tests and local development; a hosted
//! document database slots in behind the same trait.

pub mod doc_repo_adapter;
pub mod document_store;
pub mod memory;
pub mod repository;
pub mod seed_data;

use std::sync::Arc;

use tracing::info;

use crate::config::ServerConfig;
use self::doc_repo_adapter::{
    DocAgentRepo, DocMissionRepo, DocProfileRepo, DocRecruitRepo, DocShopItemRepo,
    DocTeamRepo,
};
use self::document_store::{DocumentStore, StoreError};
use self::memory::MemoryStore;
use self::repository::{collections, StorageManager};

/// Build a `StorageManager` over an existing gateway, optionally
/// seeding catalog data
pub async fn init_storage(
    store: Arc<dyn DocumentStore>,
    config: &ServerConfig,
) -> Result<StorageManager, StoreError> {
    if config.seed_on_init {
        seed_data::seed_all(store.as_ref()).await?;
    }

    let manager = StorageManager {
        profiles: Box::new(DocProfileRepo::new(store.clone(), collections::PROFILES)),
        characters: Box::new(DocProfileRepo::new(store.clone(), collections::CHARACTERS)),
        shop_items: Box::new(DocShopItemRepo::new(store.clone())),
        agents: Box::new(DocAgentRepo::new(store.clone())),
        recruits: Box::new(DocRecruitRepo::new(store.clone())),
        missions: Box::new(DocMissionRepo::new(store.clone())),
        teams: Box::new(DocTeamRepo::new(store.clone())),
        store,
    };

    info!("StorageManager initialized with 7 repositories");
    Ok(manager)
}

/// Convenience constructor over a fresh in-memory store
pub async fn init_memory_storage(config: &ServerConfig) -> Result<StorageManager, StoreError> {
    init_storage(Arc::new(MemoryStore::new()), config).await
}
