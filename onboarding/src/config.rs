use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::session::{SessionContext, UserId};
use crate::util::{ClientError, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_ROUTING_LOOKUP_URL: &str = "https://www.routingnumbers.info/api/data.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RoutingLookupConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    pub user_id: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub routing: RoutingLookupConfig,
    pub session: SessionConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

impl Default for RoutingLookupConfig {
    fn default() -> Self {
        RoutingLookupConfig {
            base_url: DEFAULT_ROUTING_LOOKUP_URL.to_string(),
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl ClientConfig {
    /// Load configuration from `path` (when it exists) with environment
    /// variable overrides applied on top.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) if path.exists() => Self::load_from_file(path)?,
            Some(path) => {
                log::warn!("{} not found, using defaults", path.display());
                ClientConfig::default()
            }
            None => ClientConfig::default(),
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ClientError::Config(format!("Failed to read {}: {}", path.display(), e)))?;

        Self::from_toml(&content)
            .map_err(|e| ClientError::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("PAYMENT_API_URL") {
            self.api.base_url = url;
        }
        if let Some(timeout) = lookup("PAYMENT_API_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.api.request_timeout_secs = secs,
                Err(_) => log::warn!("ignoring PAYMENT_API_TIMEOUT_SECS={}", timeout),
            }
        }
        if let Some(url) = lookup("ROUTING_LOOKUP_URL") {
            self.routing.base_url = url;
        }
        if let Some(user_id) = lookup("PAYMENT_USER_ID") {
            match user_id.parse::<u32>() {
                Ok(id) => self.session.user_id = Some(id),
                Err(_) => log::warn!("ignoring PAYMENT_USER_ID={}", user_id),
            }
        }
    }

    /// Session context for the configured user, if one is known.
    pub fn session(&self) -> Option<SessionContext> {
        self.session.user_id.map(|id| SessionContext::new(UserId(id)))
    }
}
