//! Tracing subscriber setup

use stagehand_core::{StagehandError, StagehandResult};
use tracing_subscriber::EnvFilter;

use crate::LoggingConfig;

/// Install the global `fmt` subscriber.
///
/// `RUST_LOG` overrides the configured filter. Returns `Ok(false)` if a
/// global subscriber was already installed.
pub fn init_tracing(config: &LoggingConfig) -> StagehandResult<bool> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter)
            .map_err(|e| StagehandError::InvalidConfig(format!("log filter: {e}")))?,
    };

    let installed = if config.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init()
            .is_ok()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
            .is_ok()
    };

    if installed {
        tracing::debug!(filter = %config.filter, json = config.json, "tracing initialised");
    }
    Ok(installed)
}
