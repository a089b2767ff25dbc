//! Profile service - character CRUD and progression mutations
//!
//! Every automatic experience change flows through
//! `progression::apply_experience`, so stored level stays derivable
//! from stored experience on all non-master paths. Master overrides
//! can set level directly; that is the one path able to desync the
//! pair and it logs a warning.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};

use crate::auth::Session;
use crate::error::DomainError;
use crate::model::{Attributes, CharacterClass, Profile, Skill};
use crate::progression;
use crate::storage::document_store::{StoreError, WriteOp};
use crate::storage::repository::{collections, StorageManager, Versioned};

/// Gold granted to every newly created profile
pub const STARTING_GOLD: u64 = 100;

/// Inputs for profile (or character sheet) creation
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub username: String,
    pub class: CharacterClass,
    pub attributes: Attributes,
    pub faction: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Partial update; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    // Self-service fields
    pub username: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub faction: Option<String>,
    pub skills: Option<Vec<Skill>>,
    // Privileged fields (master only)
    pub level: Option<u32>,
    pub experience: Option<u64>,
    pub attributes: Option<Attributes>,
    pub health: Option<i32>,
    pub max_health: Option<i32>,
    pub mana: Option<i32>,
    pub max_mana: Option<i32>,
    pub creature_kills: Option<u32>,
    pub player_kills: Option<u32>,
    pub deaths: Option<u32>,
    pub gold: Option<u64>,
}

impl ProfileUpdate {
    fn touches_privileged(&self) -> bool {
        self.level.is_some()
            || self.experience.is_some()
            || self.attributes.is_some()
            || self.health.is_some()
            || self.max_health.is_some()
            || self.mana.is_some()
            || self.max_mana.is_some()
            || self.creature_kills.is_some()
            || self.player_kills.is_some()
            || self.deaths.is_some()
            || self.gold.is_some()
    }
}

pub struct ProfileService {
    storage: Arc<StorageManager>,
}

impl ProfileService {
    pub fn new(storage: Arc<StorageManager>) -> Self {
        Self { storage }
    }

    fn build_profile(session_user: &str, new: NewProfile) -> Profile {
        let preview =
            progression::attribute_preview(new.attributes.constitution, new.attributes.intelligence);
        let now = Utc::now();
        Profile {
            id: String::new(),
            user_id: session_user.to_string(),
            username: new.username,
            class: new.class,
            level: progression::level_for_experience(0),
            experience: 0,
            health: preview.base_health,
            max_health: preview.base_health,
            mana: Some(preview.base_mana),
            max_mana: Some(preview.base_mana),
            attributes: new.attributes,
            creature_kills: 0,
            player_kills: 0,
            deaths: 0,
            gold: STARTING_GOLD,
            inventory: Vec::new(),
            skills: Vec::new(),
            faction: new.faction,
            description: new.description,
            image_url: new.image_url,
            is_deceased: false,
            cause_of_death: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create the acting user's profile; one per user
    pub async fn create_profile(
        &self,
        session: &Session,
        new: NewProfile,
    ) -> Result<Profile, DomainError> {
        if self
            .storage
            .profiles
            .get_by_user(&session.user_id)
            .await?
            .is_some()
        {
            return Err(DomainError::ProfileExists);
        }

        let mut profile = Self::build_profile(&session.user_id, new);
        profile.id = self.storage.profiles.create(&profile).await?;
        info!(
            username = %profile.username,
            class = profile.class.as_str(),
            "Profile created"
        );
        Ok(profile)
    }

    pub async fn get_profile(&self, id: &str) -> Result<Profile, DomainError> {
        self.require(id).await.map(|v| v.value)
    }

    pub async fn get_by_user(&self, user_id: &str) -> Result<Option<Profile>, DomainError> {
        Ok(self
            .storage
            .profiles
            .get_by_user(user_id)
            .await?
            .map(|v| v.value))
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<Profile>, DomainError> {
        Ok(self
            .storage
            .profiles
            .get_by_username(username)
            .await?
            .map(|v| v.value))
    }

    pub async fn list_profiles(&self) -> Result<Vec<Profile>, DomainError> {
        Ok(self.storage.profiles.get_all().await?)
    }

    /// Update a profile. Owners may edit self-service fields; privileged
    /// fields require the master role.
    pub async fn update_profile(
        &self,
        session: &Session,
        id: &str,
        update: ProfileUpdate,
    ) -> Result<(), DomainError> {
        let current = self.require(id).await?;

        let is_owner = current.value.user_id == session.user_id;
        if !is_owner && !session.is_master() {
            return Err(DomainError::PermissionDenied("not the profile owner"));
        }
        if update.touches_privileged() && !session.is_master() {
            return Err(DomainError::PermissionDenied(
                "field requires the master role",
            ));
        }

        let patch = Self::patch_for(&update, &current.value)?;
        self.storage
            .commit(vec![WriteOp::update_guarded(
                collections::PROFILES,
                id,
                current.version,
                patch,
            )])
            .await?;
        Ok(())
    }

    fn patch_for(
        update: &ProfileUpdate,
        current: &Profile,
    ) -> Result<serde_json::Value, DomainError> {
        let mut patch = serde_json::Map::new();

        if let Some(username) = &update.username {
            patch.insert("username".into(), json!(username));
        }
        if let Some(description) = &update.description {
            patch.insert("description".into(), json!(description));
        }
        if let Some(image_url) = &update.image_url {
            patch.insert("image_url".into(), json!(image_url));
        }
        if let Some(faction) = &update.faction {
            patch.insert("faction".into(), json!(faction));
        }
        if let Some(skills) = &update.skills {
            patch.insert(
                "skills".into(),
                serde_json::to_value(skills).map_err(StoreError::from)?,
            );
        }
        if let Some(attributes) = &update.attributes {
            patch.insert(
                "attributes".into(),
                serde_json::to_value(attributes).map_err(StoreError::from)?,
            );
        }
        for (field, value) in [
            ("health", update.health),
            ("max_health", update.max_health),
            ("mana", update.mana),
            ("max_mana", update.max_mana),
        ] {
            if let Some(v) = value {
                patch.insert(field.into(), json!(v));
            }
        }
        for (field, value) in [
            ("creature_kills", update.creature_kills),
            ("player_kills", update.player_kills),
            ("deaths", update.deaths),
        ] {
            if let Some(v) = value {
                patch.insert(field.into(), json!(v));
            }
        }
        if let Some(gold) = update.gold {
            patch.insert("gold".into(), json!(gold));
        }

        // A master experience edit recomputes level; an explicit level
        // override wins and may desync the pair
        if let Some(experience) = update.experience {
            patch.insert("experience".into(), json!(experience));
            patch.insert(
                "level".into(),
                json!(progression::level_for_experience(experience)),
            );
        }
        if let Some(level) = update.level {
            let implied = progression::level_for_experience(
                update.experience.unwrap_or(current.experience),
            );
            if level != implied {
                warn!(
                    username = %current.username,
                    level,
                    implied,
                    "Master level override desyncs level from experience"
                );
            }
            patch.insert("level".into(), json!(level));
        }

        patch.insert("updated_at".into(), json!(Utc::now()));
        Ok(serde_json::Value::Object(patch))
    }

    /// Delete a profile; owner or master only
    pub async fn delete_profile(&self, session: &Session, id: &str) -> Result<(), DomainError> {
        let current = self.require(id).await?;
        if current.value.user_id != session.user_id && !session.is_master() {
            return Err(DomainError::PermissionDenied("not the profile owner"));
        }
        self.storage.profiles.delete(id).await?;
        info!(username = %current.value.username, "Profile deleted");
        Ok(())
    }

    /// Record a creature kill and its spoils in one guarded write
    pub async fn record_creature_kill(
        &self,
        profile_id: &str,
        experience_reward: u64,
        gold_reward: u64,
    ) -> Result<Profile, DomainError> {
        let current = self.require(profile_id).await?;
        let profile = &current.value;

        let (experience, level) =
            progression::apply_experience(profile.experience, experience_reward);
        let patch = json!({
            "creature_kills": profile.creature_kills + 1,
            "experience": experience,
            "level": level,
            "gold": profile.gold + gold_reward,
            "updated_at": Utc::now(),
        });
        self.storage
            .commit(vec![WriteOp::update_guarded(
                collections::PROFILES,
                profile_id,
                current.version,
                patch,
            )])
            .await?;

        info!(
            username = %profile.username,
            experience_reward,
            level,
            "Creature kill recorded"
        );
        self.get_profile(profile_id).await
    }

    pub async fn record_player_kill(&self, profile_id: &str) -> Result<(), DomainError> {
        let current = self.require(profile_id).await?;
        let patch = json!({
            "player_kills": current.value.player_kills + 1,
            "updated_at": Utc::now(),
        });
        self.storage
            .commit(vec![WriteOp::update_guarded(
                collections::PROFILES,
                profile_id,
                current.version,
                patch,
            )])
            .await?;
        Ok(())
    }

    pub async fn record_death(&self, profile_id: &str) -> Result<(), DomainError> {
        let current = self.require(profile_id).await?;
        let patch = json!({
            "deaths": current.value.deaths + 1,
            "updated_at": Utc::now(),
        });
        self.storage
            .commit(vec![WriteOp::update_guarded(
                collections::PROFILES,
                profile_id,
                current.version,
                patch,
            )])
            .await?;
        Ok(())
    }

    /// Master-only: flag a profile as deceased
    pub async fn mark_deceased(
        &self,
        session: &Session,
        profile_id: &str,
        cause: Option<String>,
    ) -> Result<(), DomainError> {
        if !session.is_master() {
            return Err(DomainError::PermissionDenied(
                "deceased flag requires the master role",
            ));
        }
        let current = self.require(profile_id).await?;
        let patch = json!({
            "is_deceased": true,
            "cause_of_death": cause,
            "updated_at": Utc::now(),
        });
        self.storage
            .commit(vec![WriteOp::update_guarded(
                collections::PROFILES,
                profile_id,
                current.version,
                patch,
            )])
            .await?;
        info!(username = %current.value.username, "Profile marked deceased");
        Ok(())
    }

    /// Grant experience through the single level-recomputing path
    pub async fn grant_experience(
        &self,
        profile_id: &str,
        amount: u64,
    ) -> Result<(u64, u32), DomainError> {
        let current = self.require(profile_id).await?;
        let (experience, level) =
            progression::apply_experience(current.value.experience, amount);
        let patch = json!({
            "experience": experience,
            "level": level,
            "updated_at": Utc::now(),
        });
        self.storage
            .commit(vec![WriteOp::update_guarded(
                collections::PROFILES,
                profile_id,
                current.version,
                patch,
            )])
            .await?;
        Ok((experience, level))
    }

    async fn require(&self, id: &str) -> Result<Versioned<Profile>, DomainError> {
        self.storage
            .profiles
            .get(id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                kind: "profile",
                id: id.to_string(),
            })
    }

    // ========================================================================
    // Generic character sheets (master-authored, free-text class allowed)
    // ========================================================================

    pub async fn create_character(
        &self,
        session: &Session,
        new: NewProfile,
    ) -> Result<Profile, DomainError> {
        if !session.is_master() {
            return Err(DomainError::PermissionDenied(
                "character sheets require the master role",
            ));
        }
        let mut sheet = Self::build_profile(&session.user_id, new);
        sheet.id = self.storage.characters.create(&sheet).await?;
        Ok(sheet)
    }

    pub async fn list_characters(&self) -> Result<Vec<Profile>, DomainError> {
        Ok(self.storage.characters.get_all().await?)
    }

    pub async fn get_character(&self, id: &str) -> Result<Profile, DomainError> {
        self.storage
            .characters
            .get(id)
            .await?
            .map(|v| v.value)
            .ok_or_else(|| DomainError::NotFound {
                kind: "character",
                id: id.to_string(),
            })
    }

    pub async fn update_character(
        &self,
        session: &Session,
        id: &str,
        update: ProfileUpdate,
    ) -> Result<(), DomainError> {
        if !session.is_master() {
            return Err(DomainError::PermissionDenied(
                "character sheets require the master role",
            ));
        }
        let current = self
            .storage
            .characters
            .get(id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                kind: "character",
                id: id.to_string(),
            })?;
        let patch = Self::patch_for(&update, &current.value)?;
        self.storage.characters.update(id, patch).await?;
        Ok(())
    }

    pub async fn delete_character(&self, session: &Session, id: &str) -> Result<(), DomainError> {
        if !session.is_master() {
            return Err(DomainError::PermissionDenied(
                "character sheets require the master role",
            ));
        }
        Ok(self.storage.characters.delete(id).await?)
    }
}
