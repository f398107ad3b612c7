//! Load-time configuration
//!
//! Read once from `JNI_OnLoad`. Values come from an optional TOML file named by
//! `SFM_NATIVE_CONFIG`, then `SFM_NATIVE_LOG` overrides the log level.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::Level;

use crate::errors::{BridgeError, BridgeResult};
use crate::infrastructure::{parse_directives, LogFormat};

pub const CONFIG_PATH_ENV: &str = "SFM_NATIVE_CONFIG";
pub const LOG_LEVEL_ENV: &str = "SFM_NATIVE_LOG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,

    /// Logcat tag on Android
    #[serde(default = "default_tag")]
    pub tag: String,

    /// Extra filter directives, e.g. "sfm_native=debug"
    #[serde(default)]
    pub filter: Option<String>,

    /// Write daily-rotated log files here instead of the console
    #[serde(default)]
    pub directory: Option<String>,

    /// Emit span open/close events
    #[serde(default)]
    pub span_events: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
            tag: default_tag(),
            filter: None,
            directory: None,
            span_events: false,
        }
    }
}

fn default_level() -> String { "info".to_string() }
fn default_tag() -> String { "sfm_native".to_string() }

impl LoggingConfig {
    pub fn level(&self) -> BridgeResult<Level> {
        Level::from_str(self.level.trim())
            .map_err(|_| BridgeError::config(format!("unknown log level '{}'", self.level)))
    }
}

impl BridgeConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> BridgeResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            BridgeError::config(format!("failed to read {}: {}", path.display(), e))
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string
    pub fn parse(content: &str) -> BridgeResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> BridgeResult<()> {
        self.logging.level()?;
        if self.logging.tag.is_empty() {
            return Err(BridgeError::config("logging.tag must not be empty"));
        }
        if let Some(filter) = &self.logging.filter {
            parse_directives(filter)?;
        }
        Ok(())
    }

    /// Build the load-time configuration from the process environment.
    pub fn from_env() -> BridgeResult<Self> {
        Self::from_vars(
            std::env::var(CONFIG_PATH_ENV).ok().as_deref(),
            std::env::var(LOG_LEVEL_ENV).ok().as_deref(),
        )
    }

    fn from_vars(config_path: Option<&str>, level: Option<&str>) -> BridgeResult<Self> {
        let mut config = match config_path {
            Some(path) if !path.is_empty() => Self::load(Path::new(path))?,
            _ => Self::default(),
        };

        if let Some(level) = level.filter(|l| !l.is_empty()) {
            config.logging.level = level.to_string();
            config.validate()?;
        }

        Ok(config)
    }
}
