//! Document Store Gateway - abstraction over the hosted document database
//!
//! All persistence goes through the [`DocumentStore`] trait, making it
//! easy to swap backends (in-memory → Firestore-like hosted store).
//! Records are JSON objects grouped into named collections; every record
//! carries a store-managed `version` incremented on each write.
//!
//! Multi-record mutations use [`DocumentStore::commit`]: an
//! all-or-nothing batch where updates may carry an expected-version
//! guard. A guard mismatch fails the whole batch with
//! [`StoreError::Conflict`] and applies nothing, which closes the
//! read-then-write races a naive sequential-write port would inherit.

use async_trait::async_trait;
use serde_json::Value;

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Document '{id}' not found in '{collection}'")]
    NotFound { collection: String, id: String },

    #[error("Version conflict on '{collection}/{id}'")]
    Conflict { collection: String, id: String },

    #[error("Store permission denied: {0}")]
    PermissionDenied(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A stored record together with its storage metadata
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub version: u64,
    pub data: Value,
}

/// Sort direction for queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Field-equality filter
#[derive(Debug, Clone)]
pub struct Filter {
    pub field: String,
    pub equals: Value,
}

/// Query over one collection: equality filters, optional ordering, limit
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order_by: Option<(String, Direction)>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn filter(mut self, field: &str, equals: Value) -> Self {
        self.filters.push(Filter {
            field: field.to_string(),
            equals,
        });
        self
    }

    pub fn order_desc(mut self, field: &str) -> Self {
        self.order_by = Some((field.to_string(), Direction::Descending));
        self
    }

    pub fn order_asc(mut self, field: &str) -> Self {
        self.order_by = Some((field.to_string(), Direction::Ascending));
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }
}

/// One entry in an atomic write batch
#[derive(Debug, Clone)]
pub enum WriteOp {
    /// Insert with a store-minted id
    Create { collection: String, data: Value },
    /// Insert with a caller-chosen id (seeding, fixtures)
    Insert {
        collection: String,
        id: String,
        data: Value,
    },
    /// Shallow-merge `patch` into the document; `guard` is the expected
    /// current version, when the caller read-then-writes
    Update {
        collection: String,
        id: String,
        patch: Value,
        guard: Option<u64>,
    },
    Delete { collection: String, id: String },
}

impl WriteOp {
    pub fn update(collection: &str, id: &str, patch: Value) -> Self {
        Self::Update {
            collection: collection.to_string(),
            id: id.to_string(),
            patch,
            guard: None,
        }
    }

    pub fn update_guarded(collection: &str, id: &str, version: u64, patch: Value) -> Self {
        Self::Update {
            collection: collection.to_string(),
            id: id.to_string(),
            patch,
            guard: Some(version),
        }
    }

    pub fn create(collection: &str, data: Value) -> Self {
        Self::Create {
            collection: collection.to_string(),
            data,
        }
    }
}

/// Gateway to the document database
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create a document with a store-minted id, returning the id
    async fn create(&self, collection: &str, data: Value) -> Result<String, StoreError>;

    /// Create a document under a caller-chosen id
    async fn insert(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError>;

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Shallow-merge `patch` into an existing document
    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<(), StoreError>;

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    async fn query(&self, collection: &str, query: Query) -> Result<Vec<Document>, StoreError>;

    /// Apply a batch of writes atomically; any failed guard aborts the
    /// whole batch with `Conflict` and nothing is applied
    async fn commit(&self, ops: Vec<WriteOp>) -> Result<(), StoreError>;

    async fn count(&self, collection: &str) -> Result<usize, StoreError>;
}
