//! Map-backed controllers and closure-backed classes.

use crate::controller::{Controller, ControllerClass, Handler, SubscriptionHook, Validate};
use crate::error::ConstructError;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Controller assembled from named handlers, hooks and an optional validator record.
#[derive(Clone, Default)]
pub struct ObjectController {
    actions: HashMap<String, Handler>,
    hooks: HashMap<String, SubscriptionHook>,
    validate: Option<Validate>,
}

impl ObjectController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_action(mut self, name: impl Into<String>, handler: Handler) -> Self {
        self.actions.insert(name.into(), handler);
        self
    }

    pub fn with_hook(mut self, name: impl Into<String>, hook: SubscriptionHook) -> Self {
        self.hooks.insert(name.into(), hook);
        self
    }

    pub fn with_validate(mut self, validate: Validate) -> Self {
        self.validate = Some(validate);
        self
    }

    pub fn has_action(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }
}

impl Controller for ObjectController {
    fn action(self: Arc<Self>, name: &str) -> Option<Handler> {
        self.actions.get(name).cloned()
    }

    fn hook(self: Arc<Self>, name: &str) -> Option<SubscriptionHook> {
        self.hooks.get(name).cloned()
    }

    fn validate(&self) -> Option<&Validate> {
        self.validate.as_ref()
    }
}

impl fmt::Debug for ObjectController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut actions: Vec<&str> = self.actions.keys().map(String::as_str).collect();
        actions.sort_unstable();
        f.debug_struct("ObjectController")
            .field("actions", &actions)
            .field("validate", &self.validate.is_some())
            .finish_non_exhaustive()
    }
}

type Constructor = dyn Fn(&[Value]) -> Result<Arc<dyn Controller>, ConstructError> + Send + Sync;

/// [`ControllerClass`] backed by a constructor closure.
pub struct ClassFn {
    construct: Box<Constructor>,
    validate: Option<Validate>,
}

impl ClassFn {
    pub fn new<F>(construct: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Arc<dyn Controller>, ConstructError> + Send + Sync + 'static,
    {
        ClassFn {
            construct: Box::new(construct),
            validate: None,
        }
    }

    pub fn with_validate(mut self, validate: Validate) -> Self {
        self.validate = Some(validate);
        self
    }
}

impl ControllerClass for ClassFn {
    fn construct(&self, args: &[Value]) -> Result<Arc<dyn Controller>, ConstructError> {
        (self.construct)(args)
    }

    fn validate(&self) -> Option<&Validate> {
        self.validate.as_ref()
    }
}

impl fmt::Debug for ClassFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassFn")
            .field("validate", &self.validate.is_some())
            .finish_non_exhaustive()
    }
}
