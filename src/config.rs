//! Server configuration from environment variables

use tracing::info;

/// Runtime configuration, read once at startup
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Emails granted the master role at session creation. This is
    /// client-side trust carried over from the observed system; real
    /// deployments need the check at the storage boundary as well.
    pub admin_emails: Vec<String>,
    /// Seed the shop/agent/mission catalogs when their collections are
    /// empty at startup
    pub seed_on_init: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            admin_emails: Vec::new(),
            seed_on_init: true,
        }
    }
}

impl ServerConfig {
    /// Read configuration from `ARCANA_*` environment variables,
    /// falling back to defaults
    pub fn from_env() -> Self {
        let admin_emails = std::env::var("ARCANA_ADMIN_EMAILS")
            .map(|raw| {
                raw.split(',')
                    .map(|e| e.trim().to_ascii_lowercase())
                    .filter(|e| !e.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let seed_on_init = std::env::var("ARCANA_SEED")
            .map(|v| v != "0" && v.to_ascii_lowercase() != "false")
            .unwrap_or(true);

        let config = Self {
            admin_emails,
            seed_on_init,
        };
        info!(
            admins = config.admin_emails.len(),
            seed = config.seed_on_init,
            "Configuration loaded"
        );
        config
    }

    pub fn is_master(&self, email: &str) -> bool {
        let email = email.to_ascii_lowercase();
        self.admin_emails.iter().any(|e| *e == email)
    }
}
