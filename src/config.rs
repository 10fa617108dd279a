//! Page configuration.
//!
//! Every field has a default, so an absent or partial JSON object still
//! yields a usable config.

use core::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageConfig {
    #[serde(default = "default_socket_path")]
    pub socket_path: String,
    #[serde(default = "default_container_id")]
    pub container_id: String,
    #[serde(default = "default_popup_class")]
    pub popup_class: String,
    #[serde(default = "default_popup_lifetime_ms")]
    pub popup_lifetime_ms: u32,
    #[serde(default = "default_promo_delay_ms")]
    pub promo_delay_ms: u32,
    #[serde(default = "default_alert_dismiss_ms")]
    pub alert_dismiss_ms: u32,
    #[serde(default = "default_alert_fade_ms")]
    pub alert_fade_ms: u32,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_socket_path() -> String {
    "/ws/lives/".to_string()
}

fn default_container_id() -> String {
    "live-notifications-container".to_string()
}

fn default_popup_class() -> String {
    "live-popup".to_string()
}

fn default_popup_lifetime_ms() -> u32 {
    5000
}

fn default_promo_delay_ms() -> u32 {
    1000
}

fn default_alert_dismiss_ms() -> u32 {
    5000
}

fn default_alert_fade_ms() -> u32 {
    300
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
            container_id: default_container_id(),
            popup_class: default_popup_class(),
            popup_lifetime_ms: default_popup_lifetime_ms(),
            promo_delay_ms: default_promo_delay_ms(),
            alert_dismiss_ms: default_alert_dismiss_ms(),
            alert_fade_ms: default_alert_fade_ms(),
            log_level: default_log_level(),
        }
    }
}

impl PageConfig {
    /// Parse and validate a JSON config object.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let cfg: PageConfig = serde_json::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.socket_path.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "socket_path must start with '/': {:?}",
                self.socket_path
            )));
        }
        if self.container_id.trim().is_empty() {
            return Err(ConfigError::Invalid("container_id is empty".to_string()));
        }
        if self.popup_class.trim().is_empty() {
            return Err(ConfigError::Invalid("popup_class is empty".to_string()));
        }
        if self.popup_lifetime_ms == 0 || self.alert_dismiss_ms == 0 {
            return Err(ConfigError::Invalid(
                "popup_lifetime_ms and alert_dismiss_ms must be non-zero".to_string(),
            ));
        }
        self.log_level
            .parse::<tracing::Level>()
            .map_err(|_| ConfigError::Invalid(format!("unknown log_level {:?}", self.log_level)))?;
        Ok(())
    }

    pub fn popup_lifetime(&self) -> Duration {
        Duration::from_millis(u64::from(self.popup_lifetime_ms))
    }

    pub fn promo_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.promo_delay_ms))
    }

    pub fn alert_dismiss_after(&self) -> Duration {
        Duration::from_millis(u64::from(self.alert_dismiss_ms))
    }

    pub fn alert_fade(&self) -> Duration {
        Duration::from_millis(u64::from(self.alert_fade_ms))
    }

    /// Falls back to `INFO` for levels that do not parse; `validate` rejects those.
    pub fn max_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }
}
