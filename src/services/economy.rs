//! Economy service - shop purchases and agent recruitment
//!
//! Multi-record mutations (pay + stock, pay + roster row) go through a
//! single version-guarded commit, so concurrent buyers racing on the
//! same stock surface a conflict instead of driving stock negative.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::info;

use crate::auth::Session;
use crate::error::DomainError;
use crate::model::{Agent, InventoryItem, Profile, RecruitedAgent, ShopItem};
use crate::storage::doc_repo_adapter::encode;
use crate::storage::document_store::{StoreError, WriteOp};
use crate::storage::repository::{collections, StorageManager, Versioned};

/// Outcome of a successful purchase
#[derive(Debug, Clone)]
pub struct PurchaseReceipt {
    pub item_name: String,
    pub quantity: u32,
    pub total_cost: u64,
    pub remaining_gold: u64,
    pub remaining_stock: u32,
}

/// Partial update for catalog entries; `None` fields stay untouched
#[derive(Debug, Clone, Default)]
pub struct ShopItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<u64>,
    pub stock: Option<u32>,
}

pub struct EconomyService {
    storage: Arc<StorageManager>,
}

impl EconomyService {
    pub fn new(storage: Arc<StorageManager>) -> Self {
        Self { storage }
    }

    pub async fn list_shop(&self) -> Result<Vec<ShopItem>, DomainError> {
        Ok(self.storage.shop_items.get_all().await?)
    }

    pub async fn list_agents(&self) -> Result<Vec<Agent>, DomainError> {
        Ok(self.storage.agents.get_all().await?)
    }

    /// The acting user's recruited roster
    pub async fn roster(&self, user_id: &str) -> Result<Vec<RecruitedAgent>, DomainError> {
        Ok(self.storage.recruits.get_for_user(user_id).await?)
    }

    /// Buy `quantity` units of a catalog item for the acting user's
    /// profile. Gold deduction, inventory growth and stock decrement
    /// land in one atomic commit.
    pub async fn buy_item(
        &self,
        session: &Session,
        profile_id: &str,
        item_id: &str,
        quantity: u32,
    ) -> Result<PurchaseReceipt, DomainError> {
        if quantity < 1 {
            return Err(DomainError::InvalidQuantity);
        }

        let item = self
            .storage
            .shop_items
            .get(item_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                kind: "shop item",
                id: item_id.to_string(),
            })?;
        if item.value.stock < quantity {
            return Err(DomainError::OutOfStock {
                requested: quantity,
                available: item.value.stock,
            });
        }

        let profile = self.require_owned_profile(session, profile_id).await?;
        let total_cost = item.value.price * quantity as u64;
        if profile.value.gold < total_cost {
            return Err(DomainError::InsufficientFunds {
                have: profile.value.gold,
                need: total_cost,
            });
        }

        let inventory = Self::add_to_inventory(&profile, &item.value, quantity);
        let remaining_gold = profile.value.gold - total_cost;
        let remaining_stock = item.value.stock - quantity;

        let profile_patch = json!({
            "gold": remaining_gold,
            "inventory": serde_json::to_value(&inventory).map_err(StoreError::from)?,
            "updated_at": Utc::now(),
        });
        let item_patch = json!({ "stock": remaining_stock });

        self.storage
            .commit(vec![
                WriteOp::update_guarded(
                    collections::PROFILES,
                    profile_id,
                    profile.version,
                    profile_patch,
                ),
                WriteOp::update_guarded(
                    collections::SHOP_ITEMS,
                    item_id,
                    item.version,
                    item_patch,
                ),
            ])
            .await?;

        info!(
            buyer = %profile.value.username,
            item = %item.value.name,
            quantity,
            total_cost,
            "Purchase completed"
        );
        Ok(PurchaseReceipt {
            item_name: item.value.name,
            quantity,
            total_cost,
            remaining_gold,
            remaining_stock,
        })
    }

    /// Stack onto a matching entry or append a new one with a freshly
    /// minted inventory id (catalog ids are never reused as inventory
    /// ids, so unrelated catalog entries can never collide)
    fn add_to_inventory(
        profile: &Versioned<Profile>,
        item: &ShopItem,
        quantity: u32,
    ) -> Vec<InventoryItem> {
        let mut inventory = profile.value.inventory.clone();
        if let Some(existing) = inventory.iter_mut().find(|entry| entry.stacks_with(item)) {
            existing.quantity += quantity;
        } else {
            inventory.push(InventoryItem {
                id: format!("inv_{}_{}", profile.version, item.id),
                name: item.name.clone(),
                kind: item.kind,
                rarity: item.rarity,
                description: item.description.clone(),
                quantity,
                damage: item.damage,
                defense: item.defense,
            });
        }
        inventory
    }

    /// Recruit an agent for the acting user. Roster row creation and
    /// gold deduction land in one atomic commit; repeat recruits always
    /// append a new row.
    pub async fn recruit_agent(
        &self,
        session: &Session,
        profile_id: &str,
        agent_id: &str,
    ) -> Result<(), DomainError> {
        let agent = self
            .storage
            .agents
            .get(agent_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                kind: "agent",
                id: agent_id.to_string(),
            })?;

        let profile = self.require_owned_profile(session, profile_id).await?;
        if profile.value.gold < agent.value.price {
            return Err(DomainError::InsufficientFunds {
                have: profile.value.gold,
                need: agent.value.price,
            });
        }

        let recruit = RecruitedAgent {
            id: String::new(),
            user_id: profile.value.user_id.clone(),
            agent_id: agent.value.id.clone(),
            agent_name: agent.value.name.clone(),
            agent_image: agent.value.image_url.clone(),
            recruited_at: Utc::now(),
            level: 1,
            experience: 0,
        };
        let profile_patch = json!({
            "gold": profile.value.gold - agent.value.price,
            "updated_at": Utc::now(),
        });

        self.storage
            .commit(vec![
                WriteOp::create(
                    collections::RECRUITS,
                    encode(&recruit).map_err(DomainError::Store)?,
                ),
                WriteOp::update_guarded(
                    collections::PROFILES,
                    profile_id,
                    profile.version,
                    profile_patch,
                ),
            ])
            .await?;

        info!(
            recruiter = %profile.value.username,
            agent = %agent.value.name,
            price = agent.value.price,
            "Agent recruited"
        );
        Ok(())
    }

    async fn require_owned_profile(
        &self,
        session: &Session,
        profile_id: &str,
    ) -> Result<Versioned<Profile>, DomainError> {
        let profile = self
            .storage
            .profiles
            .get(profile_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                kind: "profile",
                id: profile_id.to_string(),
            })?;
        if profile.value.user_id != session.user_id && !session.is_master() {
            return Err(DomainError::PermissionDenied("not the profile owner"));
        }
        Ok(profile)
    }

    // ========================================================================
    // Catalog administration (master only)
    // ========================================================================

    pub async fn add_shop_item(
        &self,
        session: &Session,
        item: ShopItem,
    ) -> Result<String, DomainError> {
        self.require_master(session)?;
        let id = self.storage.shop_items.create(&item).await?;
        info!(item = %item.name, price = item.price, stock = item.stock, "Shop item added");
        Ok(id)
    }

    pub async fn update_shop_item(
        &self,
        session: &Session,
        item_id: &str,
        update: ShopItemUpdate,
    ) -> Result<(), DomainError> {
        self.require_master(session)?;
        let mut patch = serde_json::Map::new();
        if let Some(name) = update.name {
            patch.insert("name".into(), json!(name));
        }
        if let Some(description) = update.description {
            patch.insert("description".into(), json!(description));
        }
        if let Some(price) = update.price {
            patch.insert("price".into(), json!(price));
        }
        if let Some(stock) = update.stock {
            patch.insert("stock".into(), json!(stock));
        }
        self.storage
            .shop_items
            .update(item_id, serde_json::Value::Object(patch))
            .await?;
        Ok(())
    }

    pub async fn remove_shop_item(
        &self,
        session: &Session,
        item_id: &str,
    ) -> Result<(), DomainError> {
        self.require_master(session)?;
        Ok(self.storage.shop_items.delete(item_id).await?)
    }

    pub async fn add_agent(&self, session: &Session, agent: Agent) -> Result<String, DomainError> {
        self.require_master(session)?;
        let id = self.storage.agents.create(&agent).await?;
        info!(agent = %agent.name, price = agent.price, "Agent added to roster");
        Ok(id)
    }

    pub async fn remove_agent(&self, session: &Session, agent_id: &str) -> Result<(), DomainError> {
        self.require_master(session)?;
        Ok(self.storage.agents.delete(agent_id).await?)
    }

    fn require_master(&self, session: &Session) -> Result<(), DomainError> {
        if session.is_master() {
            Ok(())
        } else {
            Err(DomainError::PermissionDenied(
                "catalog changes require the master role",
            ))
        }
    }
}
