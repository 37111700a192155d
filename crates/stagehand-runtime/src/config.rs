//! Player configuration
//!
//! Durations are written as humantime strings (`"1s"`, `"100ms"`).

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use stagehand_core::{StagehandError, StagehandResult};

/// When to synthesize on-screen controls
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchControls {
    /// Only on touch-capable hosts
    #[default]
    Auto,
    Always,
    Never,
}

impl TouchControls {
    pub fn enabled(self, touch_capable: bool) -> bool {
        match self {
            TouchControls::Auto => touch_capable,
            TouchControls::Always => true,
            TouchControls::Never => false,
        }
    }
}

/// Logging configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` wins when set
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: "info".to_string(),
            json: false,
        }
    }
}

/// Player configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Run the VM at the fixed 30 TPS compatibility rate
    pub compatibility_mode: bool,
    /// Delay between program load and start + green flag
    #[serde(with = "duration_text")]
    pub start_delay: Duration,
    /// Status display refresh period
    #[serde(with = "duration_text")]
    pub status_poll_interval: Duration,
    /// Variable of the first target mirrored by the status display
    pub status_variable: String,
    pub touch_controls: TouchControls,
    pub logging: LoggingConfig,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            compatibility_mode: true,
            start_delay: Duration::from_secs(1),
            status_poll_interval: Duration::from_millis(100),
            status_variable: "hearts".to_string(),
            touch_controls: TouchControls::Auto,
            logging: LoggingConfig::default(),
        }
    }
}

impl PlayerConfig {
    pub fn from_json_str(json: &str) -> StagehandResult<Self> {
        serde_json::from_str(json).map_err(|e| StagehandError::InvalidConfig(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> StagehandResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| StagehandError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    /// Configuration for quick local runs: no start delay, debug logging
    pub fn development() -> Self {
        PlayerConfig {
            start_delay: Duration::ZERO,
            logging: LoggingConfig {
                filter: "debug".to_string(),
                json: false,
            },
            ..Self::default()
        }
    }
}

mod duration_text {
    use std::time::Duration;

    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&humantime::format_duration(*d).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let text = String::deserialize(deserializer)?;
        humantime::parse_duration(&text).map_err(D::Error::custom)
    }
}
