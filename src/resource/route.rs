//! Route handle: action selection and HTTP metadata.

use crate::resource::Scope;
use crate::tree::{Action, Method, NodeId, RouteMeta, RouteSpec, RouteTree, SubscriptionConfig};
use serde_json::Value;
use std::fmt;

/// A route or subscription under construction.
pub struct Route<'t> {
    tree: &'t mut RouteTree,
    id: NodeId,
}

impl<'t> Route<'t> {
    pub(crate) fn new(tree: &'t mut RouteTree, id: NodeId) -> Self {
        Route { tree, id }
    }

    fn spec(&self) -> &RouteSpec {
        match self.tree.route_spec(self.id) {
            Some(spec) => spec,
            None => unreachable!("route handle over a resource node"),
        }
    }

    fn spec_mut(&mut self) -> &mut RouteSpec {
        match self.tree.route_spec_mut(self.id) {
            Some(spec) => spec,
            None => unreachable!("route handle over a resource node"),
        }
    }

    pub fn method(&self) -> Method {
        self.spec().method
    }

    pub fn action(&self) -> &Action {
        &self.spec().action
    }

    /// Defaults to the route's name.
    pub fn set_action(&mut self, action: impl Into<Action>) -> &mut Self {
        self.spec_mut().action = action.into();
        self
    }

    pub fn subscription_config(&self) -> Option<&SubscriptionConfig> {
        self.spec().subscription.as_ref()
    }

    pub fn meta(&self) -> &RouteMeta {
        &self.spec().meta
    }

    pub fn meta_mut(&mut self) -> &mut RouteMeta {
        &mut self.spec_mut().meta
    }

    pub fn description(&mut self, description: impl Into<String>) -> &mut Self {
        self.meta_mut().description = Some(description.into());
        self
    }

    pub fn note(&mut self, note: impl Into<String>) -> &mut Self {
        self.meta_mut().notes.push(note.into());
        self
    }

    pub fn cache(&mut self, cache: Value) -> &mut Self {
        self.meta_mut().cache = Some(cache);
        self
    }

    pub fn cors(&mut self, cors: bool) -> &mut Self {
        self.meta_mut().cors = Some(cors);
        self
    }

    pub fn payload(&mut self, payload: Value) -> &mut Self {
        self.meta_mut().payload = Some(payload);
        self
    }

    pub fn response(&mut self, response: Value) -> &mut Self {
        self.meta_mut().response = Some(response);
        self
    }

    pub fn plugins(&mut self, plugins: Value) -> &mut Self {
        self.meta_mut().plugins = Some(plugins);
        self
    }

    pub fn timeout(&mut self, timeout: Value) -> &mut Self {
        self.meta_mut().timeout = Some(timeout);
        self
    }
}

impl Scope for Route<'_> {
    fn tree(&self) -> &RouteTree {
        self.tree
    }

    fn tree_mut(&mut self) -> &mut RouteTree {
        self.tree
    }

    fn id(&self) -> NodeId {
        self.id
    }
}

impl fmt::Debug for Route<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("name", &self.tree.name(self.id))
            .field("method", &self.method())
            .field("action", self.action())
            .finish()
    }
}
