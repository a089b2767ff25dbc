//! In-memory document store
//!
//! Backs the gateway trait with a process-local map, used by tests and
//! local development. Semantics mirror the hosted store: shallow-merge
//! updates, equality filters, field ordering with limit, and atomic
//! `commit` batches with version guards.

use std::collections::{BTreeMap, HashMap};
use std::cmp::Ordering;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use super::document_store::{
    Direction, Document, DocumentStore, Query, StoreError, WriteOp,
};

#[derive(Debug, Clone)]
struct StoredDoc {
    version: u64,
    data: Value,
}

/// Process-local `DocumentStore` implementation
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, BTreeMap<String, StoredDoc>>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn mint_id(&self, collection: &str) -> String {
        let n = self.next_id.fetch_add(1, AtomicOrdering::Relaxed) + 1;
        format!("{}_{}", collection, n)
    }
}

/// Shallow-merge `patch` object fields into `target`
fn merge(target: &mut Value, patch: &Value) {
    if let (Value::Object(target_map), Value::Object(patch_map)) = (target, patch) {
        for (key, value) in patch_map {
            target_map.insert(key.clone(), value.clone());
        }
    }
}

/// Order two JSON values for `order_by`: numbers by magnitude, strings
/// lexicographically
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

impl MemoryStore {
    /// Apply one op against the maps; callers hold the write lock
    fn apply_op(
        collections: &mut HashMap<String, BTreeMap<String, StoredDoc>>,
        op: WriteOp,
        minted: &mut Vec<String>,
        mint: impl Fn() -> u64,
    ) -> Result<(), StoreError> {
        match op {
            WriteOp::Create { collection, data } => {
                let id = format!("{}_{}", collection, mint());
                collections
                    .entry(collection)
                    .or_default()
                    .insert(id.clone(), StoredDoc { version: 1, data });
                minted.push(id);
                Ok(())
            }
            WriteOp::Insert { collection, id, data } => {
                collections
                    .entry(collection)
                    .or_default()
                    .insert(id, StoredDoc { version: 1, data });
                Ok(())
            }
            WriteOp::Update {
                collection,
                id,
                patch,
                guard: _,
            } => {
                let doc = collections
                    .get_mut(&collection)
                    .and_then(|c| c.get_mut(&id))
                    .ok_or(StoreError::NotFound {
                        collection: collection.clone(),
                        id: id.clone(),
                    })?;
                merge(&mut doc.data, &patch);
                doc.version += 1;
                Ok(())
            }
            WriteOp::Delete { collection, id } => {
                let existed = collections
                    .get_mut(&collection)
                    .map(|c| c.remove(&id).is_some())
                    .unwrap_or(false);
                if existed {
                    Ok(())
                } else {
                    Err(StoreError::NotFound { collection, id })
                }
            }
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create(&self, collection: &str, data: Value) -> Result<String, StoreError> {
        let id = self.mint_id(collection);
        let mut collections = self.collections.write();
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), StoredDoc { version: 1, data });
        Ok(id)
    }

    async fn insert(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError> {
        let mut collections = self.collections.write();
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), StoredDoc { version: 1, data });
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read();
        Ok(collections.get(collection).and_then(|c| {
            c.get(id).map(|doc| Document {
                id: id.to_string(),
                version: doc.version,
                data: doc.data.clone(),
            })
        }))
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<(), StoreError> {
        let mut collections = self.collections.write();
        let doc = collections
            .get_mut(collection)
            .and_then(|c| c.get_mut(id))
            .ok_or(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        merge(&mut doc.data, &patch);
        doc.version += 1;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.write();
        let existed = collections
            .get_mut(collection)
            .map(|c| c.remove(id).is_some())
            .unwrap_or(false);
        if existed {
            Ok(())
        } else {
            Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })
        }
    }

    async fn query(&self, collection: &str, query: Query) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read();
        let mut docs: Vec<Document> = collections
            .get(collection)
            .map(|c| {
                c.iter()
                    .filter(|(_, doc)| {
                        query
                            .filters
                            .iter()
                            .all(|f| doc.data.get(&f.field) == Some(&f.equals))
                    })
                    .map(|(id, doc)| Document {
                        id: id.clone(),
                        version: doc.version,
                        data: doc.data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        if let Some((field, direction)) = &query.order_by {
            // Documents missing the field sort last either direction
            docs.sort_by(|a, b| match (a.data.get(field), b.data.get(field)) {
                (Some(x), Some(y)) => {
                    let ord = compare_values(x, y);
                    match direction {
                        Direction::Ascending => ord,
                        Direction::Descending => ord.reverse(),
                    }
                }
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            });
        }

        if let Some(limit) = query.limit {
            docs.truncate(limit);
        }

        Ok(docs)
    }

    async fn commit(&self, ops: Vec<WriteOp>) -> Result<(), StoreError> {
        let mut collections = self.collections.write();

        // Validate existence and guards before touching anything, so a
        // failed batch leaves every document untouched
        for op in &ops {
            let (collection, id, guard) = match op {
                WriteOp::Update {
                    collection,
                    id,
                    guard,
                    ..
                } => (collection, id, *guard),
                WriteOp::Delete { collection, id } => (collection, id, None),
                _ => continue,
            };
            let current = collections
                .get(collection)
                .and_then(|c| c.get(id))
                .ok_or(StoreError::NotFound {
                    collection: collection.clone(),
                    id: id.clone(),
                })?;
            if let Some(expected) = guard {
                if current.version != expected {
                    return Err(StoreError::Conflict {
                        collection: collection.clone(),
                        id: id.clone(),
                    });
                }
            }
        }

        let mut minted = Vec::new();
        for op in ops {
            Self::apply_op(&mut collections, op, &mut minted, || {
                self.next_id.fetch_add(1, AtomicOrdering::Relaxed) + 1
            })?;
        }
        Ok(())
    }

    async fn count(&self, collection: &str) -> Result<usize, StoreError> {
        let collections = self.collections.read();
        Ok(collections.get(collection).map(|c| c.len()).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn update_merges_and_bumps_version() {
        let store = MemoryStore::new();
        store
            .insert("profiles", "p1", json!({"gold": 100, "level": 1}))
            .await
            .unwrap();

        store
            .update("profiles", "p1", json!({"gold": 50}))
            .await
            .unwrap();

        let doc = store.get("profiles", "p1").await.unwrap().unwrap();
        assert_eq!(doc.version, 2);
        assert_eq!(doc.data["gold"], 50);
        assert_eq!(doc.data["level"], 1, "untouched fields survive a merge");
    }

    #[tokio::test]
    async fn commit_with_stale_guard_applies_nothing() {
        let store = MemoryStore::new();
        store.insert("a", "x", json!({"n": 1})).await.unwrap();
        store.insert("b", "y", json!({"n": 1})).await.unwrap();

        let result = store
            .commit(vec![
                WriteOp::update("a", "x", json!({"n": 2})),
                WriteOp::update_guarded("b", "y", 99, json!({"n": 2})),
            ])
            .await;

        assert!(matches!(result, Err(StoreError::Conflict { .. })));
        let a = store.get("a", "x").await.unwrap().unwrap();
        let b = store.get("b", "y").await.unwrap().unwrap();
        assert_eq!(a.data["n"], 1, "first write must not apply");
        assert_eq!(b.data["n"], 1);
    }

    #[tokio::test]
    async fn query_orders_and_limits() {
        let store = MemoryStore::new();
        for (id, kills) in [("p1", 5), ("p2", 30), ("p3", 12)] {
            store
                .insert("profiles", id, json!({"creature_kills": kills}))
                .await
                .unwrap();
        }

        let docs = store
            .query("profiles", Query::all().order_desc("creature_kills").limit(2))
            .await
            .unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].data["creature_kills"], 30);
        assert_eq!(docs[1].data["creature_kills"], 12);
    }
}
