//! Integration tests for catalog seeding

use std::sync::Arc;

use arcana_server::storage::seed_data;
use arcana_server::{init_memory_storage, MemoryStore, ServerConfig};
use arcana_server::storage::document_store::DocumentStore;

#[tokio::test]
async fn seeding_populates_all_catalogs() {
    let config = ServerConfig::default();
    let storage = init_memory_storage(&config).await.expect("storage init");

    let items = storage.shop_items.get_all().await.unwrap();
    assert!(!items.is_empty(), "shop catalog seeded");
    assert!(
        items.iter().all(|i| i.stock > 0),
        "seeded items carry positive stock"
    );

    let agents = storage.agents.get_all().await.unwrap();
    assert!(!agents.is_empty(), "agent roster seeded");

    let missions = storage.missions.get_available().await.unwrap();
    assert!(!missions.is_empty(), "mission board seeded");
}

#[tokio::test]
async fn seeding_is_idempotent() {
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
    let first = seed_data::seed_all(store.as_ref()).await.unwrap();
    assert!(first > 0);

    let second = seed_data::seed_all(store.as_ref()).await.unwrap();
    assert_eq!(second, 0, "non-empty collections are left untouched");
}

#[tokio::test]
async fn seeding_can_be_disabled() {
    let config = ServerConfig {
        seed_on_init: false,
        ..ServerConfig::default()
    };
    let storage = init_memory_storage(&config).await.expect("storage init");
    assert!(storage.shop_items.get_all().await.unwrap().is_empty());
}
