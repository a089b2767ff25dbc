//! Mission service - per-user accept/complete lifecycle
//!
//! Per (mission, user) the state walks not-accepted → accepted →
//! completed; `completed_by` stays a subset of `accepted_by`.
//! Completion grants the mission reward to the user's profile in the
//! same atomic commit that records the completion, so the reward can
//! neither double-pay nor go missing between the two writes.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::info;

use crate::auth::Session;
use crate::error::DomainError;
use crate::model::{
    Difficulty, Mission, MissionRequirements, MissionReward, MissionStatus,
};
use crate::progression;
use crate::storage::document_store::WriteOp;
use crate::storage::repository::{collections, StorageManager, Versioned};

/// Inputs for mission creation
#[derive(Debug, Clone)]
pub struct NewMission {
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub reward: MissionReward,
    pub requirements: Option<MissionRequirements>,
}

/// Partial update; `None` fields stay untouched
#[derive(Debug, Clone, Default)]
pub struct MissionUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub reward: Option<MissionReward>,
    pub status: Option<MissionStatus>,
}

pub struct MissionService {
    storage: Arc<StorageManager>,
}

impl MissionService {
    pub fn new(storage: Arc<StorageManager>) -> Self {
        Self { storage }
    }

    pub async fn get_mission(&self, id: &str) -> Result<Mission, DomainError> {
        self.require(id).await.map(|v| v.value)
    }

    pub async fn list_missions(&self) -> Result<Vec<Mission>, DomainError> {
        Ok(self.storage.missions.get_all().await?)
    }

    /// Missions open for browsing: admin status `available`, minus the
    /// ones the acting user already accepted. Level/class/team
    /// requirements are advisory and not enforced here.
    pub async fn list_available(&self, session: &Session) -> Result<Vec<Mission>, DomainError> {
        let missions = self.storage.missions.get_available().await?;
        Ok(missions
            .into_iter()
            .filter(|m| !m.is_accepted_by(&session.user_id))
            .collect())
    }

    /// Missions the user accepted but has not completed
    pub async fn active_for(&self, user_id: &str) -> Result<Vec<Mission>, DomainError> {
        let missions = self.storage.missions.get_all().await?;
        Ok(missions
            .into_iter()
            .filter(|m| m.is_accepted_by(user_id) && !m.is_completed_by(user_id))
            .collect())
    }

    pub async fn completed_for(&self, user_id: &str) -> Result<Vec<Mission>, DomainError> {
        let missions = self.storage.missions.get_all().await?;
        Ok(missions
            .into_iter()
            .filter(|m| m.is_completed_by(user_id))
            .collect())
    }

    /// Accept a mission for the acting user
    pub async fn accept(&self, session: &Session, mission_id: &str) -> Result<(), DomainError> {
        let current = self.require(mission_id).await?;
        if current.value.is_accepted_by(&session.user_id) {
            return Err(DomainError::AlreadyAccepted);
        }

        let mut accepted_by = current.value.accepted_by.clone();
        accepted_by.push(session.user_id.clone());
        let patch = json!({
            "accepted_by": accepted_by,
            "updated_at": Utc::now(),
        });
        self.storage
            .commit(vec![WriteOp::update_guarded(
                collections::MISSIONS,
                mission_id,
                current.version,
                patch,
            )])
            .await?;

        info!(mission = %current.value.title, user = %session.user_id, "Mission accepted");
        Ok(())
    }

    /// Complete a mission for the acting user and grant its reward
    pub async fn complete(&self, session: &Session, mission_id: &str) -> Result<(), DomainError> {
        let current = self.require(mission_id).await?;
        if !current.value.is_accepted_by(&session.user_id) {
            return Err(DomainError::NotAccepted);
        }
        if current.value.is_completed_by(&session.user_id) {
            return Err(DomainError::AlreadyCompleted);
        }

        let profile = self
            .storage
            .profiles
            .get_by_user(&session.user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                kind: "profile",
                id: session.user_id.clone(),
            })?;

        let mut completed_by = current.value.completed_by.clone();
        completed_by.push(session.user_id.clone());
        let mission_patch = json!({
            "completed_by": completed_by,
            "updated_at": Utc::now(),
        });

        let reward = current.value.reward;
        let (experience, level) =
            progression::apply_experience(profile.value.experience, reward.experience);
        let profile_patch = json!({
            "experience": experience,
            "level": level,
            "gold": profile.value.gold + reward.gold,
            "updated_at": Utc::now(),
        });

        self.storage
            .commit(vec![
                WriteOp::update_guarded(
                    collections::MISSIONS,
                    mission_id,
                    current.version,
                    mission_patch,
                ),
                WriteOp::update_guarded(
                    collections::PROFILES,
                    &profile.value.id,
                    profile.version,
                    profile_patch,
                ),
            ])
            .await?;

        info!(
            mission = %current.value.title,
            user = %session.user_id,
            experience = reward.experience,
            gold = reward.gold,
            "Mission completed, reward granted"
        );
        Ok(())
    }

    // ========================================================================
    // Mission administration
    // ========================================================================

    /// Master-only: publish a new mission
    pub async fn create_mission(
        &self,
        session: &Session,
        new: NewMission,
    ) -> Result<Mission, DomainError> {
        if !session.is_master() {
            return Err(DomainError::PermissionDenied(
                "mission creation requires the master role",
            ));
        }

        let now = Utc::now();
        let mut mission = Mission {
            id: String::new(),
            title: new.title,
            description: new.description,
            difficulty: new.difficulty,
            status: MissionStatus::Available,
            reward: new.reward,
            requirements: new.requirements,
            accepted_by: Vec::new(),
            completed_by: Vec::new(),
            created_by: session.user_id.clone(),
            created_by_name: session.email.clone(),
            created_at: now,
            updated_at: now,
        };
        mission.id = self.storage.missions.create(&mission).await?;
        info!(mission = %mission.title, "Mission published");
        Ok(mission)
    }

    /// Creator or master may edit
    pub async fn update_mission(
        &self,
        session: &Session,
        mission_id: &str,
        update: MissionUpdate,
    ) -> Result<(), DomainError> {
        let current = self.require(mission_id).await?;
        self.require_creator_or_master(session, &current.value)?;

        let mut patch = serde_json::Map::new();
        if let Some(title) = update.title {
            patch.insert("title".into(), json!(title));
        }
        if let Some(description) = update.description {
            patch.insert("description".into(), json!(description));
        }
        if let Some(difficulty) = update.difficulty {
            patch.insert("difficulty".into(), json!(difficulty));
        }
        if let Some(reward) = update.reward {
            patch.insert("reward".into(), json!(reward));
        }
        if let Some(status) = update.status {
            patch.insert("status".into(), json!(status));
        }
        patch.insert("updated_at".into(), json!(Utc::now()));

        self.storage
            .missions
            .update(mission_id, serde_json::Value::Object(patch))
            .await?;
        Ok(())
    }

    /// Creator or master may change the browse status
    pub async fn set_status(
        &self,
        session: &Session,
        mission_id: &str,
        status: MissionStatus,
    ) -> Result<(), DomainError> {
        self.update_mission(
            session,
            mission_id,
            MissionUpdate {
                status: Some(status),
                ..Default::default()
            },
        )
        .await
    }

    /// Creator or master may delete
    pub async fn delete_mission(
        &self,
        session: &Session,
        mission_id: &str,
    ) -> Result<(), DomainError> {
        let current = self.require(mission_id).await?;
        self.require_creator_or_master(session, &current.value)?;
        self.storage.missions.delete(mission_id).await?;
        info!(mission = %current.value.title, "Mission deleted");
        Ok(())
    }

    fn require_creator_or_master(
        &self,
        session: &Session,
        mission: &Mission,
    ) -> Result<(), DomainError> {
        if mission.created_by == session.user_id || session.is_master() {
            Ok(())
        } else {
            Err(DomainError::PermissionDenied("not the mission creator"))
        }
    }

    async fn require(&self, id: &str) -> Result<Versioned<Mission>, DomainError> {
        self.storage
            .missions
            .get(id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                kind: "mission",
                id: id.to_string(),
            })
    }
}
