//! Structured logging via `tracing`
//!
//! Level filtering comes from `ARCANA_LOG` (falling back to `RUST_LOG`,
//! then `info`). Initialization is idempotent so library consumers and
//! tests can call it freely.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install the global tracing subscriber once
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = std::env::var("ARCANA_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string());

        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(filter))
            .with_target(false)
            .with_level(true)
            .try_init();
    });
}
