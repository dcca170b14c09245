use crate::gateway::GatewayConfig;
use crate::layout::SectionNames;
use crate::sync::{CadenceConfig, ResponseOrdering};
use serde::{Deserialize, Serialize};

/// Environment variable that overrides the configured backend address.
pub const BASE_URL_ENV: &str = "PARKING_BASE_URL";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("base_url must not be empty")]
    EmptyBaseUrl,
    #[error("base_url `{0}` must start with http:// or https://")]
    UnsupportedScheme(String),
    #[error("timeout_ms must be greater than zero")]
    ZeroTimeout,
    #[error("cadence for {0} must be greater than zero")]
    ZeroCadence(&'static str),
}

/// Everything the client needs to talk to the backend and pace its consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    #[serde(flatten)]
    pub gateway: GatewayConfig,
    pub cadence: CadenceConfig,
    pub ordering: ResponseOrdering,
    pub section_names: SectionNames,
}

impl ClientConfig {
    /// Replaces the base URL when an override is present and non-blank.
    pub fn with_base_url_override(mut self, value: Option<String>) -> Self {
        if let Some(url) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
            self.gateway.base_url = url;
        }
        self
    }

    /// Applies [`BASE_URL_ENV`] from the process environment.
    pub fn with_env_overrides(self) -> Self {
        let value = std::env::var(BASE_URL_ENV).ok();
        self.with_base_url_override(value)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.gateway.base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::UnsupportedScheme(url.to_string()));
        }
        if self.gateway.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        for (name, value) in [
            ("summary", self.cadence.summary_ms),
            ("map", self.cadence.map_ms),
            ("directional", self.cadence.directional_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroCadence(name));
            }
        }
        Ok(())
    }
}
