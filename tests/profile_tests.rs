//! Integration tests for profiles and progression
//!
//! Creation-time pool seeding, the experience/level invariant on every
//! automatic mutation path, and the owner/master permission split.

use std::sync::Arc;

use arcana_server::auth::{Role, Session};
use arcana_server::error::DomainError;
use arcana_server::model::{Attributes, CharacterClass};
use arcana_server::progression;
use arcana_server::services::{NewProfile, ProfileService, ProfileUpdate};
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

async fn setup() -> (Arc<StorageManager>, ProfileService) {
    let config = ServerConfig {
        seed_on_init: false,
        ..ServerConfig::default()
    };
    let storage = Arc::new(init_memory_storage(&config).await.expect("storage init"));
    (storage.clone(), ProfileService::new(storage))
}

fn occultist(n: u32, constitution: i32, intelligence: i32) -> NewProfile {
    NewProfile {
        username: format!("hunter_{}", n),
        class: CharacterClass::Ocultista,
        attributes: Attributes {
            constitution,
            intelligence,
            ..Attributes::default()
        },
        faction: None,
        description: None,
        image_url: None,
    }
}

// ============================================================================
// Creation
// ============================================================================

#[tokio::test]
async fn creation_seeds_pools_from_attributes() {
    let (_, profiles) = setup().await;
    let session = player_session(1);

    let profile = profiles
        .create_profile(&session, occultist(1, 16, 8))
        .await
        .unwrap();

    assert_eq!(profile.level, 1);
    assert_eq!(profile.experience, 0);
    assert_eq!(profile.max_health, 32, "20 + (16-10)*2");
    assert_eq!(profile.health, profile.max_health);
    assert_eq!(profile.max_mana, Some(6), "10 + (8-10)*2");
}

#[tokio::test]
async fn one_profile_per_user() {
    let (_, profiles) = setup().await;
    let session = player_session(1);

    profiles.create_profile(&session, occultist(1, 10, 10)).await.unwrap();
    let err = profiles
        .create_profile(&session, occultist(1, 10, 10))
        .await
        .expect_err("second profile must fail");
    assert!(matches!(err, DomainError::ProfileExists));
}

// ============================================================================
// Progression invariant
// ============================================================================

#[tokio::test]
async fn granting_250_experience_reaches_level_3() {
    let (_, profiles) = setup().await;
    let session = player_session(1);
    let profile = profiles
        .create_profile(&session, occultist(1, 10, 10))
        .await
        .unwrap();

    let (total, level) = profiles.grant_experience(&profile.id, 250).await.unwrap();
    assert_eq!(total, 250);
    assert_eq!(level, 3, "floor(250/100) + 1");

    let stored = profiles.get_profile(&profile.id).await.unwrap();
    assert_eq!(stored.level, 3);
    assert_eq!(stored.experience, 250);
}

#[tokio::test]
async fn kill_path_keeps_level_derivable_from_experience() {
    let (_, profiles) = setup().await;
    let session = player_session(1);
    let profile = profiles
        .create_profile(&session, occultist(1, 10, 10))
        .await
        .unwrap();

    for reward in [40u64, 40, 40, 130] {
        let after = profiles
            .record_creature_kill(&profile.id, reward, 5)
            .await
            .unwrap();
        assert_eq!(
            after.level,
            progression::level_for_experience(after.experience),
            "level must match the formula after every kill"
        );
    }

    let stored = profiles.get_profile(&profile.id).await.unwrap();
    assert_eq!(stored.creature_kills, 4);
    assert_eq!(stored.experience, 250);
    assert_eq!(stored.level, 3);
    assert_eq!(
        stored.gold,
        arcana_server::services::profiles::STARTING_GOLD + 20
    );
}

#[tokio::test]
async fn death_and_player_kill_counters_increment() {
    let (_, profiles) = setup().await;
    let session = player_session(1);
    let profile = profiles
        .create_profile(&session, occultist(1, 10, 10))
        .await
        .unwrap();

    profiles.record_player_kill(&profile.id).await.unwrap();
    profiles.record_death(&profile.id).await.unwrap();
    profiles.record_death(&profile.id).await.unwrap();

    let stored = profiles.get_profile(&profile.id).await.unwrap();
    assert_eq!(stored.player_kills, 1);
    assert_eq!(stored.deaths, 2);
}

// ============================================================================
// Permissions
// ============================================================================

#[tokio::test]
async fn owner_may_edit_self_service_fields_only() {
    let (_, profiles) = setup().await;
    let session = player_session(1);
    let profile = profiles
        .create_profile(&session, occultist(1, 10, 10))
        .await
        .unwrap();

    profiles
        .update_profile(
            &session,
            &profile.id,
            ProfileUpdate {
                description: Some("Keeps a journal of things that should not exist.".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("self-service edit succeeds");

    let err = profiles
        .update_profile(
            &session,
            &profile.id,
            ProfileUpdate {
                gold: Some(99_999),
                ..Default::default()
            },
        )
        .await
        .expect_err("privileged edit by owner must fail");
    assert!(matches!(err, DomainError::PermissionDenied(_)));
}

#[tokio::test]
async fn master_experience_edit_recomputes_level() {
    let (_, profiles) = setup().await;
    let session = player_session(1);
    let profile = profiles
        .create_profile(&session, occultist(1, 10, 10))
        .await
        .unwrap();

    profiles
        .update_profile(
            &master_session(),
            &profile.id,
            ProfileUpdate {
                experience: Some(420),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let stored = profiles.get_profile(&profile.id).await.unwrap();
    assert_eq!(stored.level, 5, "master experience edits keep the invariant");
}

#[tokio::test]
async fn mark_deceased_is_master_only() {
    let (_, profiles) = setup().await;
    let session = player_session(1);
    let profile = profiles
        .create_profile(&session, occultist(1, 10, 10))
        .await
        .unwrap();

    let err = profiles
        .mark_deceased(&session, &profile.id, Some("curiosity".to_string()))
        .await
        .expect_err("player deceased flag must fail");
    assert!(matches!(err, DomainError::PermissionDenied(_)));

    profiles
        .mark_deceased(&master_session(), &profile.id, Some("the thirteenth floor".to_string()))
        .await
        .unwrap();
    let stored = profiles.get_profile(&profile.id).await.unwrap();
    assert!(stored.is_deceased);
    assert_eq!(stored.cause_of_death.as_deref(), Some("the thirteenth floor"));
}

#[tokio::test]
async fn delete_requires_owner_or_master() {
    let (_, profiles) = setup().await;
    let owner = player_session(1);
    let stranger = player_session(2);
    let profile = profiles
        .create_profile(&owner, occultist(1, 10, 10))
        .await
        .unwrap();

    let err = profiles
        .delete_profile(&stranger, &profile.id)
        .await
        .expect_err("stranger delete must fail");
    assert!(matches!(err, DomainError::PermissionDenied(_)));

    profiles.delete_profile(&owner, &profile.id).await.unwrap();
    let err = profiles.get_profile(&profile.id).await.expect_err("gone");
    assert!(matches!(err, DomainError::NotFound { .. }));
}

// ============================================================================
// Character sheets
// ============================================================================

#[tokio::test]
async fn character_sheets_allow_free_text_classes() {
    let (_, profiles) = setup().await;

    let sheet = profiles
        .create_character(
            &master_session(),
            NewProfile {
                username: "The Archivist".to_string(),
                class: CharacterClass::Custom("Lich".to_string()),
                attributes: Attributes::default(),
                faction: None,
                description: Some("Do not lend him books.".to_string()),
                image_url: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(sheet.class.as_str(), "Lich");

    let listed = profiles.list_characters().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].class, CharacterClass::Custom("Lich".to_string()));

    let err = profiles
        .create_character(&player_session(1), occultist(1, 10, 10))
        .await
        .expect_err("player sheet creation must fail");
    assert!(matches!(err, DomainError::PermissionDenied(_)));
}
