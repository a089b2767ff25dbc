//! Domain and auth error types
//!
//! Domain services validate preconditions locally and fail fast with a
//! specific variant before touching storage. Storage failures propagate
//! unchanged through the `Store` variant; the presentation layer owns
//! user-visible messaging and retry policy.

use crate::storage::document_store::StoreError;

/// Error type for domain rule violations
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("Permission denied: {0}")]
    PermissionDenied(&'static str),

    #[error("Profile already exists for this user")]
    ProfileExists,

    #[error("Quantity must be at least 1")]
    InvalidQuantity,

    #[error("Insufficient funds: have {have}, need {need}")]
    InsufficientFunds { have: u64, need: u64 },

    #[error("Out of stock: requested {requested}, available {available}")]
    OutOfStock { requested: u32, available: u32 },

    #[error("Already a member of this team")]
    AlreadyMember,

    #[error("Team is full (capacity {capacity})")]
    TeamFull { capacity: u32 },

    #[error("Leader cannot leave the team")]
    LeaderCannotLeave,

    #[error("Only the team leader may do this")]
    NotLeader,

    #[error("Mission already accepted")]
    AlreadyAccepted,

    #[error("Mission has not been accepted")]
    NotAccepted,

    #[error("Mission already completed")]
    AlreadyCompleted,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DomainError {
    /// Gold missing to cover the attempted spend, zero for other errors
    pub fn shortfall(&self) -> u64 {
        match self {
            Self::InsufficientFunds { have, need } => need.saturating_sub(*have),
            _ => 0,
        }
    }
}

/// Error type for the identity gateway
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Email is already registered")]
    EmailTaken,

    #[error("Invalid email or password")]
    InvalidCredentials,
}
