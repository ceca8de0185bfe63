//! Inheritable node options: set, explicitly cleared, or left to the nearest ancestor.

use crate::controller::ControllerDesignation;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Three-state option slot. `Clear` shadows ancestors like `Set` but reads as absent.
#[derive(Clone, Debug, PartialEq)]
pub enum Setting<T> {
    Inherit,
    Clear,
    Set(T),
}

impl<T> Default for Setting<T> {
    fn default() -> Self {
        Setting::Inherit
    }
}

impl<T> Setting<T> {
    /// `None` while this node defers to its parent; `Some(value_or_none)` once it decides.
    pub fn decided(&self) -> Option<Option<&T>> {
        match self {
            Setting::Inherit => None,
            Setting::Clear => Some(None),
            Setting::Set(v) => Some(Some(v)),
        }
    }
}

/// Auth requirement forwarded to the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Auth {
    /// `false` turns auth off for the subtree.
    Flag(bool),
    Strategy(String),
    Config(Value),
}

impl Auth {
    pub fn strategy(name: impl Into<String>) -> Self {
        Auth::Strategy(name.into())
    }

    pub fn disabled() -> Self {
        Auth::Flag(false)
    }
}

impl From<&str> for Auth {
    fn from(name: &str) -> Self {
        Auth::strategy(name)
    }
}

/// Opaque schema document; the host's validation library interprets it.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Schema(Arc<Value>);

impl Schema {
    pub fn new(document: Value) -> Self {
        Schema(Arc::new(document))
    }

    pub fn document(&self) -> &Value {
        &self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationSlot {
    Params,
    Query,
    Response,
    Payload,
}

impl ValidationSlot {
    pub const ALL: [ValidationSlot; 4] = [
        ValidationSlot::Params,
        ValidationSlot::Query,
        ValidationSlot::Response,
        ValidationSlot::Payload,
    ];
}

#[derive(Clone, Debug, Default)]
pub struct ValidateOptions {
    pub params: Setting<Schema>,
    pub query: Setting<Schema>,
    pub response: Setting<Schema>,
    pub payload: Setting<Schema>,
}

impl ValidateOptions {
    pub fn slot(&self, slot: ValidationSlot) -> &Setting<Schema> {
        match slot {
            ValidationSlot::Params => &self.params,
            ValidationSlot::Query => &self.query,
            ValidationSlot::Response => &self.response,
            ValidationSlot::Payload => &self.payload,
        }
    }

    pub fn slot_mut(&mut self, slot: ValidationSlot) -> &mut Setting<Schema> {
        match slot {
            ValidationSlot::Params => &mut self.params,
            ValidationSlot::Query => &mut self.query,
            ValidationSlot::Response => &mut self.response,
            ValidationSlot::Payload => &mut self.payload,
        }
    }
}

/// Options a node sets for itself. Reads go through [`RouteTree`](crate::tree::RouteTree), which walks ancestors.
#[derive(Clone, Debug, Default)]
pub struct NodeOptions {
    pub auth: Setting<Auth>,
    pub controller: Setting<ControllerDesignation>,
    pub bind: Setting<Value>,
    pub validate: ValidateOptions,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_setting_decided() {
        assert_eq!(Setting::<u8>::Inherit.decided(), None);
        assert_eq!(Setting::<u8>::Clear.decided(), Some(None));
        assert_eq!(Setting::Set(3u8).decided(), Some(Some(&3)));
    }

    #[test]
    fn test_auth_serializes_like_host_config() {
        assert_eq!(serde_json::to_value(Auth::strategy("admin")).unwrap(), json!("admin"));
        assert_eq!(serde_json::to_value(Auth::disabled()).unwrap(), json!(false));
        let auth: Auth = serde_json::from_value(json!({"mode": "try"})).unwrap();
        assert_eq!(auth, Auth::Config(json!({"mode": "try"})));
    }

    #[test]
    fn test_schema_serializes_as_its_document() {
        let schema = Schema::new(json!({"type": "object", "required": ["name"]}));
        assert_eq!(
            serde_json::to_value(&schema).unwrap(),
            json!({"type": "object", "required": ["name"]})
        );
    }
}
