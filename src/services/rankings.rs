//! Ranking service - read-only leaderboard projections
//!
//! Every query returns the same normalized [`RankingEntry`] shape, no
//! matter which underlying ordering produced it. Rank is the 1-based
//! position in the result set; ties are broken by result order only.

use std::sync::Arc;

use crate::error::DomainError;
use crate::model::{CharacterClass, Profile};
use crate::storage::repository::StorageManager;

/// Public leaderboard cutoff used by the browse views
pub const DEFAULT_RANKING_LIMIT: usize = 10;

/// Lightweight rank-ordered projection of a profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingEntry {
    pub username: String,
    pub class: String,
    pub level: u32,
    pub creature_kills: u32,
    pub deaths: u32,
    pub gold: u64,
    pub rank: usize,
}

impl RankingEntry {
    fn from_profile(profile: Profile, rank: usize) -> Self {
        Self {
            username: profile.username,
            class: profile.class.as_str().to_string(),
            level: profile.level,
            creature_kills: profile.creature_kills,
            deaths: profile.deaths,
            gold: profile.gold,
            rank,
        }
    }
}

fn to_entries(profiles: Vec<Profile>) -> Vec<RankingEntry> {
    profiles
        .into_iter()
        .enumerate()
        .map(|(idx, p)| RankingEntry::from_profile(p, idx + 1))
        .collect()
}

pub struct RankingService {
    storage: Arc<StorageManager>,
}

impl RankingService {
    pub fn new(storage: Arc<StorageManager>) -> Self {
        Self { storage }
    }

    /// Top profiles by creature kills, descending
    pub async fn top_by_kills(&self, limit: usize) -> Result<Vec<RankingEntry>, DomainError> {
        let profiles = self.storage.profiles.top_by("creature_kills", limit).await?;
        Ok(to_entries(profiles))
    }

    /// Top profiles by deaths, descending
    pub async fn top_by_deaths(&self, limit: usize) -> Result<Vec<RankingEntry>, DomainError> {
        let profiles = self.storage.profiles.top_by("deaths", limit).await?;
        Ok(to_entries(profiles))
    }

    /// Top profiles by level, descending
    pub async fn top_by_level(&self, limit: usize) -> Result<Vec<RankingEntry>, DomainError> {
        let profiles = self.storage.profiles.top_by("level", limit).await?;
        Ok(to_entries(profiles))
    }

    /// Profiles of one class, ordered by creature kills descending
    pub async fn top_by_class(
        &self,
        class: &CharacterClass,
        limit: usize,
    ) -> Result<Vec<RankingEntry>, DomainError> {
        let profiles = self.storage.profiles.by_class(class.as_str(), limit).await?;
        Ok(to_entries(profiles))
    }

    /// Self-lookup beyond the public cutoff: the entry for one username
    /// with its rank computed against the full kills ordering
    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<RankingEntry>, DomainError> {
        let mut profiles = self.storage.profiles.get_all().await?;
        profiles.sort_by(|a, b| b.creature_kills.cmp(&a.creature_kills));
        Ok(profiles
            .into_iter()
            .enumerate()
            .find(|(_, p)| p.username == username)
            .map(|(idx, p)| RankingEntry::from_profile(p, idx + 1)))
    }
}
