//! Client configuration.
//!
//! Values come from the process environment (`TODO_BASE_URL`,
//! `TODO_COLLECTION`, `TODO_FIND_LIMIT`); anything unset falls back to the
//! defaults that match a locally running mock server.

use thiserror::Error;

use crate::types::DEFAULT_FIND_LIMIT;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_COLLECTION: &str = "items";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub collection: String,
    pub find_limit: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            find_limit: DEFAULT_FIND_LIMIT,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Empty values count as
    /// unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get("TODO_BASE_URL") {
            config.base_url = url;
        }
        if let Some(collection) = get("TODO_COLLECTION") {
            config.collection = collection;
        }
        if let Some(raw) = get("TODO_FIND_LIMIT") {
            config.find_limit = match raw.trim().parse::<u32>() {
                Ok(0) => {
                    return Err(ConfigError::InvalidValue {
                        key: "TODO_FIND_LIMIT",
                        value: raw,
                        reason: "must be greater than zero".to_string(),
                    })
                }
                Ok(limit) => limit,
                Err(e) => {
                    return Err(ConfigError::InvalidValue {
                        key: "TODO_FIND_LIMIT",
                        value: raw,
                        reason: e.to_string(),
                    })
                }
            };
        }
        Ok(config)
    }
}
