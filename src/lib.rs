pub mod config;
pub mod db;
pub mod events;
pub mod models;
pub mod reports; // recall queue + Barrett's report projections
pub mod surveillance; // Barrett's status, interval advice, plan reconciliation
pub mod validation;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for a host binary or test harness.
/// Honors RUST_LOG; falls back to the crate default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("GERD Center core v{}", config::APP_VERSION);
}
