//! Integration tests for the ranking aggregator
//!
//! Ordering, 1-based rank assignment, limits, class filtering and the
//! self-lookup path beyond the public cutoff.

use std::sync::Arc;

use arcana_server::auth::{Role, Session};
use arcana_server::model::{Attributes, CharacterClass};
use arcana_server::services::{
    NewProfile, ProfileService, ProfileUpdate, RankingService,
};
use arcana_server::{init_memory_storage, ServerConfig, StorageManager};

fn player_session(n: u32) -> Session {
    Session {
        user_id: format!("user_{}", n),
        email: format!("player{}@example.com", n),
        role: Role::Player,
    }
}

fn master_session() -> Session {
    Session {
        user_id: "user_gm".to_string(),
        email: "gm@example.com".to_string(),
        role: Role::Master,
    }
}

async fn setup() -> (Arc<StorageManager>, RankingService, ProfileService) {
    let config = ServerConfig {
        seed_on_init: false,
        ..ServerConfig::default()
    };
    let storage = Arc::new(init_memory_storage(&config).await.expect("storage init"));
    (
        storage.clone(),
        RankingService::new(storage.clone()),
        ProfileService::new(storage),
    )
}

async fn seed_profile(
    profiles: &ProfileService,
    n: u32,
    class: CharacterClass,
    kills: u32,
    deaths: u32,
    experience: u64,
) {
    let session = player_session(n);
    let profile = profiles
        .create_profile(
            &session,
            NewProfile {
                username: format!("hunter_{}", n),
                class,
                attributes: Attributes::default(),
                faction: None,
                description: None,
                image_url: None,
            },
        )
        .await
        .expect("profile creation");
    profiles
        .update_profile(
            &master_session(),
            &profile.id,
            ProfileUpdate {
                creature_kills: Some(kills),
                deaths: Some(deaths),
                experience: Some(experience),
                ..Default::default()
            },
        )
        .await
        .expect("stat edit");
}

// ============================================================================
// Orderings
// ============================================================================

#[tokio::test]
async fn kills_ranking_is_descending_with_sequential_ranks() {
    let (_, rankings, profiles) = setup().await;
    seed_profile(&profiles, 1, CharacterClass::Combatente, 5, 0, 0).await;
    seed_profile(&profiles, 2, CharacterClass::Ocultista, 30, 0, 0).await;
    seed_profile(&profiles, 3, CharacterClass::Especialista, 12, 0, 0).await;

    let board = rankings.top_by_kills(10).await.unwrap();

    assert_eq!(board.len(), 3);
    let kills: Vec<u32> = board.iter().map(|e| e.creature_kills).collect();
    assert_eq!(kills, vec![30, 12, 5], "descending by creature kills");
    let ranks: Vec<usize> = board.iter().map(|e| e.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3], "rank strictly increasing from 1");
}

#[tokio::test]
async fn limit_caps_the_board() {
    let (_, rankings, profiles) = setup().await;
    for n in 1..=5 {
        seed_profile(&profiles, n, CharacterClass::Combatente, n * 10, 0, 0).await;
    }

    let board = rankings.top_by_kills(3).await.unwrap();
    assert_eq!(board.len(), 3, "length bounded by the requested limit");
    assert_eq!(board[0].creature_kills, 50);
}

#[tokio::test]
async fn deaths_and_level_boards_order_on_their_own_fields() {
    let (_, rankings, profiles) = setup().await;
    seed_profile(&profiles, 1, CharacterClass::Combatente, 0, 7, 950).await;
    seed_profile(&profiles, 2, CharacterClass::Ocultista, 0, 2, 120).await;

    let deaths = rankings.top_by_deaths(10).await.unwrap();
    assert_eq!(deaths[0].deaths, 7);
    assert_eq!(deaths[1].deaths, 2);

    let levels = rankings.top_by_level(10).await.unwrap();
    assert_eq!(levels[0].level, 10, "950 experience implies level 10");
    assert_eq!(levels[1].level, 2);
}

#[tokio::test]
async fn class_board_filters_then_orders_by_kills() {
    let (_, rankings, profiles) = setup().await;
    seed_profile(&profiles, 1, CharacterClass::Ocultista, 8, 0, 0).await;
    seed_profile(&profiles, 2, CharacterClass::Combatente, 50, 0, 0).await;
    seed_profile(&profiles, 3, CharacterClass::Ocultista, 21, 0, 0).await;

    let board = rankings
        .top_by_class(&CharacterClass::Ocultista, 10)
        .await
        .unwrap();

    assert_eq!(board.len(), 2, "other classes filtered out");
    assert_eq!(board[0].creature_kills, 21);
    assert_eq!(board[1].creature_kills, 8);
    assert!(board.iter().all(|e| e.class == "Ocultista"));
}

// ============================================================================
// Self-lookup
// ============================================================================

#[tokio::test]
async fn username_lookup_ranks_against_the_full_ordering() {
    let (_, rankings, profiles) = setup().await;
    for n in 1..=12 {
        seed_profile(&profiles, n, CharacterClass::Combatente, n * 10, 0, 0).await;
    }

    // hunter_1 has the fewest kills: rank 12, beyond a top-10 cutoff
    let entry = rankings.find_by_username("hunter_1").await.unwrap();
    let entry = entry.expect("profile exists");
    assert_eq!(entry.rank, 12);
    assert_eq!(entry.creature_kills, 10);

    let missing = rankings.find_by_username("nobody").await.unwrap();
    assert!(missing.is_none());
}
