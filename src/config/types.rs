//! Router build options as loaded from env or JSON.

use serde::{Deserialize, Serialize};

/// Options fixed for a whole [`Router`](crate::Router).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterOptions {
    /// Prefix for every generated path. Defaults to `/`.
    #[serde(default)]
    pub base_path: Option<String>,
    /// Scheme and authority prepended by [`Router::href`](crate::Router::href).
    #[serde(default)]
    pub base_url: Option<String>,
}

impl RouterOptions {
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Base path used as the traversal root; an empty or absent value means `/`.
    pub fn root_path(&self) -> &str {
        match self.base_path.as_deref() {
            Some(p) if !p.is_empty() => p,
            _ => "/",
        }
    }
}
