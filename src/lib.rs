//! Arcana Game Server Core
//!
//! Domain-rules layer for the Arcana RPG: profiles and progression,
//! shop economy and agent recruitment, mission lifecycle, team
//! membership and leaderboards, all over a pluggable document-store
//! gateway. Consumed in-process by a presentation layer; owns no wire
//! protocol or CLI.

pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod progression;
pub mod services;
pub mod storage;

// Re-export commonly used types
pub use auth::{IdentityGateway, MemoryIdentity, Role, Session};
pub use config::ServerConfig;
pub use error::{AuthError, DomainError};
pub use storage::document_store::{DocumentStore, StoreError};
pub use storage::memory::MemoryStore;
pub use storage::repository::StorageManager;
pub use storage::{init_memory_storage, init_storage};
