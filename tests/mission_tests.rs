//! Integration tests for the mission lifecycle
//!
//! Accept/complete transitions per user, reward grant on completion,
//! and the admin surface.

use std::sync::Arc;

use arcana_server::auth::{Role, Session};
use arcana_server::error::DomainError;
use arcana_server::model::{Attributes, CharacterClass, Difficulty, MissionReward};
use arcana_server::services::{
    MissionService, MissionUpdate, NewMission, NewProfile, ProfileService,
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

async fn setup() -> (Arc<StorageManager>, MissionService, ProfileService) {
    let config = ServerConfig {
        seed_on_init: false,
        ..ServerConfig::default()
    };
    let storage = Arc::new(init_memory_storage(&config).await.expect("storage init"));
    (
        storage.clone(),
        MissionService::new(storage.clone()),
        ProfileService::new(storage),
    )
}

async fn create_profile(profiles: &ProfileService, session: &Session) -> String {
    profiles
        .create_profile(
            session,
            NewProfile {
                username: format!("hunter_{}", session.user_id),
                class: CharacterClass::Especialista,
                attributes: Attributes::default(),
                faction: None,
                description: None,
                image_url: None,
            },
        )
        .await
        .expect("profile creation")
        .id
}

async fn publish_mission(
    missions: &MissionService,
    experience: u64,
    gold: u64,
) -> String {
    missions
        .create_mission(
            &master_session(),
            NewMission {
                title: "Night Watch".to_string(),
                description: "Hold the line until dawn.".to_string(),
                difficulty: Difficulty::Medium,
                reward: MissionReward { experience, gold },
                requirements: None,
            },
        )
        .await
        .expect("mission creation")
        .id
}

// ============================================================================
// Accept / complete transitions
// ============================================================================

#[tokio::test]
async fn accept_then_complete_walks_the_lifecycle() {
    let (storage, missions, profiles) = setup().await;
    let session = player_session(1);
    create_profile(&profiles, &session).await;
    let mission_id = publish_mission(&missions, 120, 80).await;

    missions.accept(&session, &mission_id).await.expect("accept");
    missions.complete(&session, &mission_id).await.expect("complete");

    let mission = storage.missions.get(&mission_id).await.unwrap().unwrap();
    assert!(mission.value.is_accepted_by(&session.user_id));
    assert!(mission.value.is_completed_by(&session.user_id));
}

#[tokio::test]
async fn accepting_twice_fails() {
    let (_, missions, profiles) = setup().await;
    let session = player_session(1);
    create_profile(&profiles, &session).await;
    let mission_id = publish_mission(&missions, 50, 10).await;

    missions.accept(&session, &mission_id).await.unwrap();
    let err = missions
        .accept(&session, &mission_id)
        .await
        .expect_err("second accept must fail");
    assert!(matches!(err, DomainError::AlreadyAccepted));
}

#[tokio::test]
async fn completing_before_accepting_fails() {
    let (_, missions, profiles) = setup().await;
    let session = player_session(1);
    create_profile(&profiles, &session).await;
    let mission_id = publish_mission(&missions, 50, 10).await;

    let err = missions
        .complete(&session, &mission_id)
        .await
        .expect_err("complete without accept must fail");
    assert!(matches!(err, DomainError::NotAccepted));
}

#[tokio::test]
async fn completing_twice_fails() {
    let (_, missions, profiles) = setup().await;
    let session = player_session(1);
    create_profile(&profiles, &session).await;
    let mission_id = publish_mission(&missions, 50, 10).await;

    missions.accept(&session, &mission_id).await.unwrap();
    missions.complete(&session, &mission_id).await.unwrap();
    let err = missions
        .complete(&session, &mission_id)
        .await
        .expect_err("second complete must fail");
    assert!(matches!(err, DomainError::AlreadyCompleted));
}

#[tokio::test]
async fn completion_grants_the_reward_once() {
    let (_, missions, profiles) = setup().await;
    let session = player_session(1);
    let profile_id = create_profile(&profiles, &session).await;
    let mission_id = publish_mission(&missions, 250, 60).await;

    missions.accept(&session, &mission_id).await.unwrap();
    missions.complete(&session, &mission_id).await.unwrap();

    let profile = profiles.get_profile(&profile_id).await.unwrap();
    assert_eq!(profile.experience, 250);
    assert_eq!(profile.level, 3, "level recomputed from the new total");
    assert_eq!(
        profile.gold,
        arcana_server::services::profiles::STARTING_GOLD + 60
    );
}

#[tokio::test]
async fn two_users_progress_independently() {
    let (storage, missions, profiles) = setup().await;
    let alice = player_session(1);
    let bruno = player_session(2);
    create_profile(&profiles, &alice).await;
    create_profile(&profiles, &bruno).await;
    let mission_id = publish_mission(&missions, 50, 10).await;

    missions.accept(&alice, &mission_id).await.unwrap();
    missions.accept(&bruno, &mission_id).await.unwrap();
    missions.complete(&alice, &mission_id).await.unwrap();

    let mission = storage.missions.get(&mission_id).await.unwrap().unwrap();
    assert!(mission.value.is_completed_by(&alice.user_id));
    assert!(
        !mission.value.is_completed_by(&bruno.user_id),
        "completion is per user"
    );
}

// ============================================================================
// Browsing
// ============================================================================

#[tokio::test]
async fn available_listing_excludes_accepted_missions() {
    let (_, missions, profiles) = setup().await;
    let session = player_session(1);
    create_profile(&profiles, &session).await;
    let first = publish_mission(&missions, 50, 10).await;
    let _second = publish_mission(&missions, 80, 20).await;

    missions.accept(&session, &first).await.unwrap();

    let available = missions.list_available(&session).await.unwrap();
    assert_eq!(available.len(), 1);
    assert_ne!(available[0].id, first);

    let active = missions.active_for(&session.user_id).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, first);
}

// ============================================================================
// Administration
// ============================================================================

#[tokio::test]
async fn players_cannot_publish_missions() {
    let (_, missions, _) = setup().await;
    let session = player_session(1);

    let err = missions
        .create_mission(
            &session,
            NewMission {
                title: "Forbidden".to_string(),
                description: String::new(),
                difficulty: Difficulty::Easy,
                reward: MissionReward::default(),
                requirements: None,
            },
        )
        .await
        .expect_err("player mission creation must fail");
    assert!(matches!(err, DomainError::PermissionDenied(_)));
}

#[tokio::test]
async fn only_creator_or_master_may_edit() {
    let (_, missions, _) = setup().await;
    let mission_id = publish_mission(&missions, 50, 10).await;
    let stranger = player_session(7);

    let err = missions
        .update_mission(
            &stranger,
            &mission_id,
            MissionUpdate {
                title: Some("Hijacked".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect_err("non-creator edit must fail");
    assert!(matches!(err, DomainError::PermissionDenied(_)));

    missions
        .update_mission(
            &master_session(),
            &mission_id,
            MissionUpdate {
                title: Some("Renamed".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("master edit succeeds");
    let mission = missions.get_mission(&mission_id).await.unwrap();
    assert_eq!(mission.title, "Renamed");
}
