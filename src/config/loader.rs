//! Load router options from the environment or from JSON.

use crate::config::RouterOptions;
use crate::error::ConfigError;

/// Env var holding the base path (e.g. `/api`).
pub const BASE_PATH_ENV: &str = "RESOURCE_ROUTER_BASE_PATH";
/// Env var holding the base URL used for href generation.
pub const BASE_URL_ENV: &str = "RESOURCE_ROUTER_BASE_URL";

impl RouterOptions {
    /// Read options from `RESOURCE_ROUTER_BASE_PATH` and `RESOURCE_ROUTER_BASE_URL`. Empty values count as unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(|e| ConfigError::Load(e.to_string()))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        RouterOptions {
            base_path: read(BASE_PATH_ENV),
            base_url: read(BASE_URL_ENV),
        }
    }
}
