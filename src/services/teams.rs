//! Team service - bounded-capacity membership with one leader
//!
//! Leadership never transfers automatically: a leader wanting out must
//! be reassigned out-of-band or disband the team.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::info;

use crate::auth::Session;
use crate::error::DomainError;
use crate::model::team::{MAX_TEAM_CAPACITY, MIN_TEAM_CAPACITY};
use crate::model::{Team, TeamMember, TeamRole};
use crate::storage::document_store::{StoreError, WriteOp};
use crate::storage::repository::{collections, StorageManager, Versioned};

/// Inputs for team creation
#[derive(Debug, Clone)]
pub struct NewTeam {
    pub name: String,
    pub description: String,
    /// Clamped to [2, 20]
    pub max_members: u32,
}

pub struct TeamService {
    storage: Arc<StorageManager>,
}

impl TeamService {
    pub fn new(storage: Arc<StorageManager>) -> Self {
        Self { storage }
    }

    pub async fn get_team(&self, id: &str) -> Result<Team, DomainError> {
        self.require(id).await.map(|v| v.value)
    }

    pub async fn list_teams(&self) -> Result<Vec<Team>, DomainError> {
        Ok(self.storage.teams.get_all().await?)
    }

    /// The team the user currently belongs to, if any. Derived by a
    /// linear scan over all teams; O(teams) per lookup, acceptable at
    /// the scale this runs at.
    pub async fn team_of(&self, user_id: &str) -> Result<Option<Team>, DomainError> {
        let teams = self.storage.teams.get_all().await?;
        Ok(teams.into_iter().find(|t| t.has_member(user_id)))
    }

    /// Create a team with the acting user as its only member and leader
    pub async fn create_team(
        &self,
        session: &Session,
        new: NewTeam,
    ) -> Result<Team, DomainError> {
        let now = Utc::now();
        let leader_name = session.email.clone();
        let mut team = Team {
            id: String::new(),
            name: new.name,
            description: new.description,
            leader_id: session.user_id.clone(),
            leader_name: leader_name.clone(),
            members: vec![TeamMember {
                user_id: session.user_id.clone(),
                username: leader_name,
                role: TeamRole::Leader,
                joined_at: now,
            }],
            max_members: new.max_members.clamp(MIN_TEAM_CAPACITY, MAX_TEAM_CAPACITY),
            created_at: now,
            updated_at: now,
        };
        team.id = self.storage.teams.create(&team).await?;
        info!(team = %team.name, leader = %session.user_id, "Team created");
        Ok(team)
    }

    /// Join a team as a regular member
    pub async fn join(&self, session: &Session, team_id: &str) -> Result<(), DomainError> {
        let current = self.require(team_id).await?;
        let team = &current.value;
        if team.has_member(&session.user_id) {
            return Err(DomainError::AlreadyMember);
        }
        if team.is_full() {
            return Err(DomainError::TeamFull {
                capacity: team.max_members,
            });
        }

        let mut members = team.members.clone();
        members.push(TeamMember {
            user_id: session.user_id.clone(),
            username: session.email.clone(),
            role: TeamRole::Member,
            joined_at: Utc::now(),
        });
        self.commit_members(team_id, current.version, &members).await?;

        info!(team = %team.name, user = %session.user_id, "Member joined");
        Ok(())
    }

    /// Leave a team; the leader cannot leave
    pub async fn leave(&self, session: &Session, team_id: &str) -> Result<(), DomainError> {
        let current = self.require(team_id).await?;
        let team = &current.value;
        if team.leader_id == session.user_id {
            return Err(DomainError::LeaderCannotLeave);
        }
        if !team.has_member(&session.user_id) {
            return Err(DomainError::NotFound {
                kind: "team member",
                id: session.user_id.clone(),
            });
        }

        let members: Vec<TeamMember> = team
            .members
            .iter()
            .filter(|m| m.user_id != session.user_id)
            .cloned()
            .collect();
        self.commit_members(team_id, current.version, &members).await?;

        info!(team = %team.name, user = %session.user_id, "Member left");
        Ok(())
    }

    /// Delete the team outright; leader or master only. Members are not
    /// notified or migrated.
    pub async fn disband(&self, session: &Session, team_id: &str) -> Result<(), DomainError> {
        let current = self.require(team_id).await?;
        if current.value.leader_id != session.user_id && !session.is_master() {
            return Err(DomainError::NotLeader);
        }
        self.storage.teams.delete(team_id).await?;
        info!(team = %current.value.name, "Team disbanded");
        Ok(())
    }

    async fn commit_members(
        &self,
        team_id: &str,
        version: u64,
        members: &[TeamMember],
    ) -> Result<(), DomainError> {
        let patch = json!({
            "members": serde_json::to_value(members).map_err(StoreError::from)?,
            "updated_at": Utc::now(),
        });
        self.storage
            .commit(vec![WriteOp::update_guarded(
                collections::TEAMS,
                team_id,
                version,
                patch,
            )])
            .await?;
        Ok(())
    }

    async fn require(&self, id: &str) -> Result<Versioned<Team>, DomainError> {
        self.storage
            .teams
            .get(id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                kind: "team",
                id: id.to_string(),
            })
    }
}
