//! Leaf data: method, action, HTTP passthrough metadata, subscription config.

use crate::controller::{Handler, SubscriptionHook};
use crate::tree::Auth;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Http(HttpMethod),
    Subscription,
}

impl Method {
    /// Requests with these methods carry no body worth validating.
    pub fn skips_payload_validation(&self) -> bool {
        matches!(self, Method::Http(HttpMethod::Get | HttpMethod::Options))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Http(m) => m.as_str(),
            Method::Subscription => "SUBSCRIPTION",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a route runs: a method name on its controller, or a handler used as-is.
#[derive(Clone)]
pub enum Action {
    Named(String),
    Direct(Handler),
}

impl Action {
    pub fn name(&self) -> Option<&str> {
        match self {
            Action::Named(name) => Some(name),
            Action::Direct(_) => None,
        }
    }
}

impl From<&str> for Action {
    fn from(name: &str) -> Self {
        Action::Named(name.to_string())
    }
}

impl From<String> for Action {
    fn from(name: String) -> Self {
        Action::Named(name)
    }
}

impl From<Handler> for Action {
    fn from(handler: Handler) -> Self {
        Action::Direct(handler)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Action::Direct(_) => f.write_str("Direct(..)"),
        }
    }
}

/// Subscription callback reference: a controller method name or a hook used as-is.
#[derive(Clone)]
pub enum HookAction {
    Named(String),
    Direct(SubscriptionHook),
}

impl From<&str> for HookAction {
    fn from(name: &str) -> Self {
        HookAction::Named(name.to_string())
    }
}

impl From<SubscriptionHook> for HookAction {
    fn from(hook: SubscriptionHook) -> Self {
        HookAction::Direct(hook)
    }
}

impl fmt::Debug for HookAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookAction::Named(name) => f.debug_tuple("Named").field(name).finish(),
            HookAction::Direct(_) => f.write_str("Direct(..)"),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SubscriptionConfig {
    pub filter: Option<HookAction>,
    pub on_subscribe: Option<HookAction>,
    pub on_unsubscribe: Option<HookAction>,
    pub auth: Option<Auth>,
}

impl SubscriptionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, hook: impl Into<HookAction>) -> Self {
        self.filter = Some(hook.into());
        self
    }

    pub fn on_subscribe(mut self, hook: impl Into<HookAction>) -> Self {
        self.on_subscribe = Some(hook.into());
        self
    }

    pub fn on_unsubscribe(mut self, hook: impl Into<HookAction>) -> Self {
        self.on_unsubscribe = Some(hook.into());
        self
    }

    pub fn auth(mut self, auth: Auth) -> Self {
        self.auth = Some(auth);
        self
    }
}

/// HTTP metadata forwarded verbatim to the host.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cors: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsonp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugins: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Value>,
}

impl RouteMeta {
    /// `payload.maxBytes`, when the payload config carries one.
    pub fn payload_max_bytes(&self) -> Option<usize> {
        self.payload
            .as_ref()
            .and_then(|p| p.get("maxBytes"))
            .and_then(Value::as_u64)
            .map(|n| n as usize)
    }
}

/// Leaf payload of a route node.
#[derive(Clone, Debug)]
pub struct RouteSpec {
    pub method: Method,
    pub action: Action,
    pub meta: RouteMeta,
    pub subscription: Option<SubscriptionConfig>,
}

impl RouteSpec {
    pub fn http(method: HttpMethod, name: &str) -> Self {
        RouteSpec {
            method: Method::Http(method),
            action: Action::from(name),
            meta: RouteMeta::default(),
            subscription: None,
        }
    }

    pub fn subscription(name: &str, config: SubscriptionConfig) -> Self {
        RouteSpec {
            method: Method::Subscription,
            action: Action::from(name),
            meta: RouteMeta::default(),
            subscription: Some(config),
        }
    }
}
