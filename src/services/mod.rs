//! Domain services
//!
//! The rules layer the presentation code calls into. Each service holds
//! the shared [`StorageManager`](crate::storage::repository::StorageManager)
//! and takes the acting [`Session`](crate::auth::Session) as an explicit
//! parameter; nothing here reads ambient auth state.

pub mod economy;
pub mod missions;
pub mod profiles;
pub mod rankings;
pub mod teams;

pub use economy::{EconomyService, PurchaseReceipt, ShopItemUpdate};
pub use missions::{MissionService, MissionUpdate, NewMission};
pub use profiles::{NewProfile, ProfileService, ProfileUpdate};
pub use rankings::{RankingEntry, RankingService, DEFAULT_RANKING_LIMIT};
pub use teams::{NewTeam, TeamService};
