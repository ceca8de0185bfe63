//! Controllers: handler-providing objects, the classes that build them, and the map they are looked up in.

mod object;
mod source;

pub use object::{ClassFn, ObjectController};
pub use source::{ControllerLoader, ControllerSource};

use crate::error::ConstructError;
use crate::tree::{Schema, ValidationSlot};
use axum::extract::Request;
use axum::http::{HeaderMap, Method, Uri};
use axum::response::{IntoResponse, Response};
use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Request handler handed to the host.
pub type Handler = Arc<dyn Fn(Request) -> BoxFuture<'static, Response> + Send + Sync>;

/// Subscription callback. For `filter` the result decides delivery; for `onSubscribe` it accepts the subscriber.
pub type SubscriptionHook = Arc<dyn Fn(SubscriptionEvent) -> BoxFuture<'static, bool> + Send + Sync>;

/// Pre-handler step. `Ok(value)` continues (and is stored under `assign`), `Err(response)` short-circuits.
pub type PreMethod = Arc<dyn Fn(RequestHead) -> BoxFuture<'static, Result<Option<Value>, Response>> + Send + Sync>;

/// Wrap an async fn into a [`Handler`].
pub fn handler<F, Fut, R>(f: F) -> Handler
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + 'static,
{
    Arc::new(move |req: Request| f(req).map(IntoResponse::into_response).boxed())
}

/// Wrap an async fn into a [`SubscriptionHook`].
pub fn hook<F, Fut>(f: F) -> SubscriptionHook
where
    F: Fn(SubscriptionEvent) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = bool> + Send + 'static,
{
    Arc::new(move |event: SubscriptionEvent| f(event).boxed())
}

/// What a subscription hook sees.
#[derive(Clone, Debug, Default)]
pub struct SubscriptionEvent {
    pub path: String,
    pub params: HashMap<String, String>,
    pub message: Option<Value>,
}

/// Owned copy of the request line and headers, given to pre-handler steps.
#[derive(Clone, Debug)]
pub struct RequestHead {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
}

/// Pre-handler step attached to a node; inherited by every route below it.
#[derive(Clone)]
pub struct PreHook {
    pub assign: Option<String>,
    pub method: PreMethod,
}

impl PreHook {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(RequestHead) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<Value>, Response>> + Send + 'static,
    {
        PreHook {
            assign: None,
            method: Arc::new(move |head: RequestHead| f(head).boxed()),
        }
    }

    pub fn assign(mut self, key: impl Into<String>) -> Self {
        self.assign = Some(key.into());
        self
    }
}

impl fmt::Debug for PreHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreHook").field("assign", &self.assign).finish_non_exhaustive()
    }
}

/// Per-slot validator record exposed by a controller.
#[derive(Clone, Default)]
pub struct Validate {
    pub params: Option<Validator>,
    pub query: Option<Validator>,
    pub response: Option<Validator>,
    pub payload: Option<Validator>,
}

impl Validate {
    pub fn slot(&self, slot: ValidationSlot) -> Option<&Validator> {
        match slot {
            ValidationSlot::Params => self.params.as_ref(),
            ValidationSlot::Query => self.query.as_ref(),
            ValidationSlot::Response => self.response.as_ref(),
            ValidationSlot::Payload => self.payload.as_ref(),
        }
    }

    pub fn with(mut self, slot: ValidationSlot, validator: Validator) -> Self {
        let target = match slot {
            ValidationSlot::Params => &mut self.params,
            ValidationSlot::Query => &mut self.query,
            ValidationSlot::Response => &mut self.response,
            ValidationSlot::Payload => &mut self.payload,
        };
        *target = Some(validator);
        self
    }
}

impl fmt::Debug for Validate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validate")
            .field("params", &self.params)
            .field("query", &self.query)
            .field("response", &self.response)
            .field("payload", &self.payload)
            .finish()
    }
}

/// One slot of a controller's validator record: a per-action table or a function of the action name.
#[derive(Clone)]
pub enum Validator {
    ByAction(HashMap<String, Schema>),
    Computed(Arc<dyn Fn(&str) -> Option<Schema> + Send + Sync>),
}

impl Validator {
    pub fn by_action<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Schema)>,
        K: Into<String>,
    {
        Validator::ByAction(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn computed(f: impl Fn(&str) -> Option<Schema> + Send + Sync + 'static) -> Self {
        Validator::Computed(Arc::new(f))
    }

    pub fn schema_for(&self, action: &str) -> Option<Schema> {
        match self {
            Validator::ByAction(map) => map.get(action).cloned(),
            Validator::Computed(f) => f(action),
        }
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validator::ByAction(map) => f.debug_tuple("ByAction").field(map).finish(),
            Validator::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// A handler-providing object. Handlers returned by [`Controller::action`] are bound to the instance.
pub trait Controller: Send + Sync {
    fn action(self: Arc<Self>, name: &str) -> Option<Handler>;

    fn hook(self: Arc<Self>, _name: &str) -> Option<SubscriptionHook> {
        None
    }

    /// Instance-level validator record.
    fn validate(&self) -> Option<&Validate> {
        None
    }
}

/// A constructible controller type registered in a [`ControllerMap`].
pub trait ControllerClass: Send + Sync {
    fn construct(&self, args: &[Value]) -> Result<Arc<dyn Controller>, ConstructError>;

    /// Type-level validator record, consulted when the instance has none.
    fn validate(&self) -> Option<&Validate> {
        None
    }
}

/// How a node names its controller.
#[derive(Clone)]
pub enum ControllerDesignation {
    Instance(Arc<dyn Controller>),
    Named { name: String, args: Vec<Value> },
}

impl ControllerDesignation {
    pub fn instance<C: Controller + 'static>(controller: C) -> Self {
        ControllerDesignation::Instance(Arc::new(controller))
    }

    pub fn named(name: impl Into<String>) -> Self {
        ControllerDesignation::Named {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// The `[name, ...args]` form: the class registered as `name` is constructed with `args`.
    pub fn with_args(name: impl Into<String>, args: Vec<Value>) -> Self {
        ControllerDesignation::Named {
            name: name.into(),
            args,
        }
    }
}

impl From<&str> for ControllerDesignation {
    fn from(name: &str) -> Self {
        ControllerDesignation::named(name)
    }
}

impl From<String> for ControllerDesignation {
    fn from(name: String) -> Self {
        ControllerDesignation::named(name)
    }
}

impl From<Arc<dyn Controller>> for ControllerDesignation {
    fn from(controller: Arc<dyn Controller>) -> Self {
        ControllerDesignation::Instance(controller)
    }
}

impl fmt::Debug for ControllerDesignation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerDesignation::Instance(_) => f.write_str("Instance(..)"),
            ControllerDesignation::Named { name, args } => f
                .debug_struct("Named")
                .field("name", name)
                .field("args", args)
                .finish(),
        }
    }
}

/// Map entry: a ready instance or a class to construct per designation.
#[derive(Clone)]
pub enum ControllerEntry {
    Instance(Arc<dyn Controller>),
    Class(Arc<dyn ControllerClass>),
}

/// Controllers by name, supplied once at startup.
#[derive(Clone, Default)]
pub struct ControllerMap {
    by_name: HashMap<String, ControllerEntry>,
}

impl ControllerMap {
    pub fn new() -> Self {
        ControllerMap {
            by_name: HashMap::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: ControllerEntry) {
        self.by_name.insert(name.into(), entry);
    }

    pub fn with_instance<C: Controller + 'static>(mut self, name: impl Into<String>, controller: C) -> Self {
        self.insert(name, ControllerEntry::Instance(Arc::new(controller)));
        self
    }

    pub fn with_class<C: ControllerClass + 'static>(mut self, name: impl Into<String>, class: C) -> Self {
        self.insert(name, ControllerEntry::Class(Arc::new(class)));
        self
    }

    pub fn get(&self, name: &str) -> Option<&ControllerEntry> {
        self.by_name.get(name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl fmt::Debug for ControllerMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.by_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ControllerMap").field("names", &names).finish()
    }
}

/// A controller after designation lookup, remembering the class it came from.
#[derive(Clone)]
pub struct ResolvedController {
    pub instance: Arc<dyn Controller>,
    pub class: Option<Arc<dyn ControllerClass>>,
}

impl ResolvedController {
    /// Instance record first, then the class record.
    pub fn validate(&self) -> Option<&Validate> {
        self.instance
            .validate()
            .or_else(|| self.class.as_ref().and_then(|c| c.validate()))
    }

    pub fn action(&self, name: &str) -> Option<Handler> {
        Arc::clone(&self.instance).action(name)
    }

    pub fn hook(&self, name: &str) -> Option<SubscriptionHook> {
        Arc::clone(&self.instance).hook(name)
    }
}

impl fmt::Debug for ResolvedController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedController")
            .field("from_class", &self.class.is_some())
            .finish_non_exhaustive()
    }
}
