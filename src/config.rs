//! Client configuration.
//!
//! Loaded from a TOML file; every field has a default so an empty file (or
//! no file) is valid. `SOCIAL_CLIENT_*` environment variables override file
//! values.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub socket_url: String,
    pub locale: String,
    /// Countdown display tick.
    pub countdown_tick_ms: u64,
    /// Resend window used when the server does not send one.
    pub default_resend_secs: u64,
    /// Where persisted flags live.
    pub flags_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:4000/api".to_string(),
            socket_url: "ws://localhost:4000/socket".to_string(),
            locale: "en".to_string(),
            countdown_tick_ms: 1000,
            default_resend_secs: 60,
            flags_path: PathBuf::from(".social-client/flags.json"),
        }
    }
}

impl ClientConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Apply `SOCIAL_CLIENT_*` overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from any variable source.
    pub fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = var("SOCIAL_CLIENT_API_BASE_URL") {
            self.api_base_url = v;
        }
        if let Some(v) = var("SOCIAL_CLIENT_SOCKET_URL") {
            self.socket_url = v;
        }
        if let Some(v) = var("SOCIAL_CLIENT_LOCALE") {
            self.locale = v;
        }
        if let Some(v) = var("SOCIAL_CLIENT_FLAGS_PATH") {
            self.flags_path = PathBuf::from(v);
        }
        if let Some(v) = var("SOCIAL_CLIENT_COUNTDOWN_TICK_MS") {
            match v.parse() {
                Ok(ms) => self.countdown_tick_ms = ms,
                Err(_) => warn!(value = %v, "ignoring invalid SOCIAL_CLIENT_COUNTDOWN_TICK_MS"),
            }
        }
        if let Some(v) = var("SOCIAL_CLIENT_DEFAULT_RESEND_SECS") {
            match v.parse() {
                Ok(secs) => self.default_resend_secs = secs,
                Err(_) => warn!(value = %v, "ignoring invalid SOCIAL_CLIENT_DEFAULT_RESEND_SECS"),
            }
        }
        self
    }

    /// Countdown tick period, never below 10 ms.
    pub fn countdown_tick(&self) -> Duration {
        Duration::from_millis(self.countdown_tick_ms.max(10))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(ClientConfig::from_toml_str("").unwrap(), ClientConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let config = ClientConfig::from_toml_str(
            r#"
            locale = "es"
            countdown_tick_ms = 500
            "#,
        )
        .unwrap();
        assert_eq!(config.locale, "es");
        assert_eq!(config.countdown_tick(), Duration::from_millis(500));
        assert_eq!(config.default_resend_secs, 60);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(ClientConfig::from_toml_str("locale = ").is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("SOCIAL_CLIENT_LOCALE", "fr"),
            ("SOCIAL_CLIENT_COUNTDOWN_TICK_MS", "abc"),
            ("SOCIAL_CLIENT_DEFAULT_RESEND_SECS", "90"),
        ]
        .into_iter()
        .collect();

        let config = ClientConfig::default()
            .with_overrides(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(config.locale, "fr");
        assert_eq!(config.countdown_tick_ms, 1000);
        assert_eq!(config.default_resend_secs, 90);
    }

    #[test]
    fn test_missing_file_is_default() {
        let config = ClientConfig::load("/nonexistent/social-client.toml").unwrap();
        assert_eq!(config, ClientConfig::default());
    }
}
