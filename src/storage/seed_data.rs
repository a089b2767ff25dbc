//! Seed data - starter catalog content
//!
//! Populates the shop, agent roster and mission board with baseline
//! content for testing and development. Seeding is idempotent: a
//! non-empty collection is left untouched.

use chrono::Utc;
use tracing::{debug, info};

use crate::model::{
    Agent, AgentRarity, AgentStats, Difficulty, ItemKind, ItemRarity, Mission,
    MissionRequirements, MissionReward, MissionStatus, ShopItem,
};
use super::doc_repo_adapter::encode;
use super::document_store::{DocumentStore, StoreError};
use super::repository::collections;

/// Seed all catalog collections with initial data
pub async fn seed_all(store: &dyn DocumentStore) -> Result<usize, StoreError> {
    let mut total = 0;
    total += seed_shop_items(store).await?;
    total += seed_agents(store).await?;
    total += seed_missions(store).await?;

    info!("Seeded {} total catalog records", total);
    Ok(total)
}

/// Seed the shop catalog
async fn seed_shop_items(store: &dyn DocumentStore) -> Result<usize, StoreError> {
    if store.count(collections::SHOP_ITEMS).await? > 0 {
        debug!("Shop catalog already populated, skipping seed");
        return Ok(0);
    }

    let items = vec![
        ShopItem {
            id: "iron_dagger".into(),
            name: "Iron Dagger".into(),
            kind: ItemKind::Weapon,
            rarity: ItemRarity::Common,
            description: "A plain sidearm, quick and reliable.".into(),
            price: 25,
            stock: 40,
            damage: Some(4),
            ..Default::default()
        },
        ShopItem {
            id: "hunting_rifle".into(),
            name: "Hunting Rifle".into(),
            kind: ItemKind::Weapon,
            rarity: ItemRarity::Uncommon,
            description: "Bolt-action rifle favored by field specialists.".into(),
            price: 120,
            stock: 15,
            damage: Some(12),
            ..Default::default()
        },
        ShopItem {
            id: "ritual_blade".into(),
            name: "Ritual Blade".into(),
            kind: ItemKind::Weapon,
            rarity: ItemRarity::Epic,
            description: "An occult edge that hums near the Other Side.".into(),
            price: 600,
            stock: 3,
            damage: Some(22),
            ..Default::default()
        },
        ShopItem {
            id: "leather_vest".into(),
            name: "Leather Vest".into(),
            kind: ItemKind::Armor,
            rarity: ItemRarity::Common,
            description: "Light protection that doesn't slow you down.".into(),
            price: 40,
            stock: 30,
            defense: Some(3),
            ..Default::default()
        },
        ShopItem {
            id: "warded_coat".into(),
            name: "Warded Coat".into(),
            kind: ItemKind::Armor,
            rarity: ItemRarity::Rare,
            description: "Stitched with protective sigils.".into(),
            price: 250,
            stock: 8,
            defense: Some(9),
            ..Default::default()
        },
        ShopItem {
            id: "field_medkit".into(),
            name: "Field Medkit".into(),
            kind: ItemKind::Consumable,
            rarity: ItemRarity::Common,
            description: "Restores health between encounters.".into(),
            price: 15,
            stock: 100,
            ..Default::default()
        },
        ShopItem {
            id: "sigil_fragment".into(),
            name: "Sigil Fragment".into(),
            kind: ItemKind::Quest,
            rarity: ItemRarity::Legendary,
            description: "A shard of something that should stay broken.".into(),
            price: 2000,
            stock: 1,
            ..Default::default()
        },
    ];

    let count = items.len();
    for item in &items {
        store
            .insert(collections::SHOP_ITEMS, &item.id, encode(item)?)
            .await?;
    }
    Ok(count)
}

/// Seed the recruitable agent roster
async fn seed_agents(store: &dyn DocumentStore) -> Result<usize, StoreError> {
    if store.count(collections::AGENTS).await? > 0 {
        debug!("Agent roster already populated, skipping seed");
        return Ok(0);
    }

    let now = Utc::now();
    let agents = vec![
        Agent {
            id: "agent_vega".into(),
            name: "Vega".into(),
            description: "Street informant with an ear on every block.".into(),
            price: 150,
            image_url: "/agents/vega.png".into(),
            stats: AgentStats {
                strength: 3,
                speed: 8,
                endurance: 4,
                intelligence: 7,
            },
            special_ability: "Rumor Network".into(),
            rarity: AgentRarity::Common,
            created_at: now,
        },
        Agent {
            id: "agent_moreau".into(),
            name: "Dr. Moreau".into(),
            description: "Forensic occultist, banned from three universities.".into(),
            price: 480,
            image_url: "/agents/moreau.png".into(),
            stats: AgentStats {
                strength: 2,
                speed: 4,
                endurance: 5,
                intelligence: 10,
            },
            special_ability: "Ritual Analysis".into(),
            rarity: AgentRarity::Epic,
            created_at: now,
        },
        Agent {
            id: "agent_bruta".into(),
            name: "Bruta".into(),
            description: "Ex-cage fighter. Doors are a suggestion.".into(),
            price: 320,
            image_url: "/agents/bruta.png".into(),
            stats: AgentStats {
                strength: 10,
                speed: 5,
                endurance: 9,
                intelligence: 3,
            },
            special_ability: "Breach".into(),
            rarity: AgentRarity::Rare,
            created_at: now,
        },
    ];

    let count = agents.len();
    for agent in &agents {
        store
            .insert(collections::AGENTS, &agent.id, encode(agent)?)
            .await?;
    }
    Ok(count)
}

/// Seed the mission board
async fn seed_missions(store: &dyn DocumentStore) -> Result<usize, StoreError> {
    if store.count(collections::MISSIONS).await? > 0 {
        debug!("Mission board already populated, skipping seed");
        return Ok(0);
    }

    let now = Utc::now();
    let missions = vec![
        Mission {
            id: "rats_in_the_walls".into(),
            title: "Rats in the Walls".into(),
            description: "Something is gnawing at the warehouse district.".into(),
            difficulty: Difficulty::Easy,
            status: MissionStatus::Available,
            reward: MissionReward {
                experience: 50,
                gold: 30,
            },
            requirements: None,
            accepted_by: Vec::new(),
            completed_by: Vec::new(),
            created_by: "system".into(),
            created_by_name: "Mission Board".into(),
            created_at: now,
            updated_at: now,
        },
        Mission {
            id: "midnight_procession".into(),
            title: "Midnight Procession".into(),
            description: "Track the hooded figures seen leaving the cemetery.".into(),
            difficulty: Difficulty::Medium,
            status: MissionStatus::Available,
            reward: MissionReward {
                experience: 120,
                gold: 80,
            },
            requirements: Some(MissionRequirements {
                min_level: Some(3),
                ..Default::default()
            }),
            accepted_by: Vec::new(),
            completed_by: Vec::new(),
            created_by: "system".into(),
            created_by_name: "Mission Board".into(),
            created_at: now,
            updated_at: now,
        },
        Mission {
            id: "the_sealed_floor".into(),
            title: "The Sealed Floor".into(),
            description: "The thirteenth floor isn't on the blueprints.".into(),
            difficulty: Difficulty::Legendary,
            status: MissionStatus::Available,
            reward: MissionReward {
                experience: 500,
                gold: 400,
            },
            requirements: Some(MissionRequirements {
                min_level: Some(8),
                required_classes: vec!["Ocultista".into()],
                ..Default::default()
            }),
            accepted_by: Vec::new(),
            completed_by: Vec::new(),
            created_by: "system".into(),
            created_by_name: "Mission Board".into(),
            created_at: now,
            updated_at: now,
        },
    ];

    let count = missions.len();
    for mission in &missions {
        store
            .insert(collections::MISSIONS, &mission.id, encode(mission)?)
            .await?;
    }
    Ok(count)
}
