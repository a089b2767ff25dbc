//! Identity gateway - collaborator contract for the auth provider
//!
//! The real provider is external; this module defines the narrow
//! interface the core consumes plus an in-memory implementation for
//! tests and local development. Domain services never read ambient
//! session state: the acting [`Session`] is an explicit parameter on
//! every operation, so the rules layer stays testable without a live
//! provider.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::AuthError;

/// Privilege level, resolved from the config allowlist at session
/// creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Player,
    Master,
}

/// The acting user for a core operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub email: String,
    pub role: Role,
}

impl Session {
    pub fn is_master(&self) -> bool {
        self.role == Role::Master
    }
}

/// Callback invoked with the new session (or `None` on sign-out)
pub type SessionListener = Box<dyn Fn(Option<&Session>) + Send + Sync>;

/// Narrow contract over the external auth provider
pub trait IdentityGateway: Send + Sync {
    fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError>;
    fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;
    fn sign_out(&self);
    fn current_user(&self) -> Option<Session>;
    fn on_session_change(&self, listener: SessionListener);
}

struct Account {
    user_id: String,
    password: String,
}

#[derive(Default)]
struct IdentityState {
    accounts: Vec<(String, Account)>,
    current: Option<Session>,
    listeners: Vec<SessionListener>,
    next_id: u64,
}

/// In-memory identity provider for tests and local development
#[derive(Default)]
pub struct MemoryIdentity {
    config: ServerConfig,
    state: Arc<Mutex<IdentityState>>,
}

impl MemoryIdentity {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            state: Arc::default(),
        }
    }

    fn role_for(&self, email: &str) -> Role {
        if self.config.is_master(email) {
            Role::Master
        } else {
            Role::Player
        }
    }

    fn set_current(state: &mut IdentityState, session: Option<Session>) {
        state.current = session;
        let current = state.current.clone();
        for listener in &state.listeners {
            listener(current.as_ref());
        }
    }
}

impl IdentityGateway for MemoryIdentity {
    fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = email.to_ascii_lowercase();
        let mut state = self.state.lock();
        if state.accounts.iter().any(|(e, _)| *e == email) {
            return Err(AuthError::EmailTaken);
        }

        state.next_id += 1;
        let user_id = format!("user_{}", state.next_id);
        state.accounts.push((
            email.clone(),
            Account {
                user_id: user_id.clone(),
                password: password.to_string(),
            },
        ));

        let session = Session {
            user_id,
            role: self.role_for(&email),
            email,
        };
        Self::set_current(&mut state, Some(session.clone()));
        info!(email = %session.email, "New account registered");
        Ok(session)
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = email.to_ascii_lowercase();
        let mut state = self.state.lock();
        let account = state
            .accounts
            .iter()
            .find(|(e, a)| *e == email && a.password == password)
            .map(|(_, a)| a.user_id.clone())
            .ok_or(AuthError::InvalidCredentials)?;

        let session = Session {
            user_id: account,
            role: self.role_for(&email),
            email,
        };
        Self::set_current(&mut state, Some(session.clone()));
        Ok(session)
    }

    fn sign_out(&self) {
        let mut state = self.state.lock();
        Self::set_current(&mut state, None);
    }

    fn current_user(&self) -> Option<Session> {
        self.state.lock().current.clone()
    }

    fn on_session_change(&self, listener: SessionListener) {
        self.state.lock().listeners.push(listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn duplicate_signup_is_rejected() {
        let identity = MemoryIdentity::new(ServerConfig::default());
        identity.sign_up("a@example.com", "pw").unwrap();
        assert!(matches!(
            identity.sign_up("A@example.com", "other"),
            Err(AuthError::EmailTaken)
        ));
    }

    #[test]
    fn wrong_password_is_rejected() {
        let identity = MemoryIdentity::new(ServerConfig::default());
        identity.sign_up("a@example.com", "pw").unwrap();
        identity.sign_out();
        assert!(matches!(
            identity.sign_in("a@example.com", "nope"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn allowlisted_email_gets_master_role() {
        let config = ServerConfig {
            admin_emails: vec!["gm@example.com".to_string()],
            ..ServerConfig::default()
        };
        let identity = MemoryIdentity::new(config);

        let master = identity.sign_up("gm@example.com", "pw").unwrap();
        assert_eq!(master.role, Role::Master);

        let player = identity.sign_up("p@example.com", "pw").unwrap();
        assert_eq!(player.role, Role::Player);
    }

    #[test]
    fn listeners_observe_sign_in_and_out() {
        let identity = MemoryIdentity::new(ServerConfig::default());
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        identity.on_session_change(Box::new(|_| {
            CALLS.fetch_add(1, Ordering::SeqCst);
        }));

        identity.sign_up("a@example.com", "pw").unwrap();
        identity.sign_out();
        assert_eq!(CALLS.load(Ordering::SeqCst), 2);
    }
}
