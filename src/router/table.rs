//! The compiled route table and read-only views over its routes.

use crate::controller::{ControllerDesignation, PreHook};
use crate::error::RouterError;
use crate::tree::{
    Action, Auth, Method, NodeId, RouteMeta, RouteSpec, RouteTree, Schema, SubscriptionConfig, Visited,
    ValidationSlot,
};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteEntry {
    pub name: String,
    pub path: String,
    pub node: NodeId,
}

/// Canonical name → path and route node, in traversal order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    by_name: HashMap<String, usize>,
}

impl RouteTable {
    pub(crate) fn insert(&mut self, visited: Visited) -> Result<(), RouterError> {
        if self.by_name.contains_key(&visited.name) {
            return Err(RouterError::DuplicateRoute(visited.name));
        }
        self.by_name.insert(visited.name.clone(), self.entries.len());
        self.entries.push(RouteEntry {
            name: visited.name,
            path: visited.path,
            node: visited.node,
        });
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&RouteEntry> {
        self.by_name.get(name).map(|i| &self.entries[*i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A table entry joined with its route node; option reads resolve through ancestors.
#[derive(Clone, Copy)]
pub struct RouteRef<'a> {
    tree: &'a RouteTree,
    entry: &'a RouteEntry,
    spec: &'a RouteSpec,
}

impl<'a> RouteRef<'a> {
    pub(crate) fn new(tree: &'a RouteTree, entry: &'a RouteEntry) -> Option<Self> {
        let spec = tree.route_spec(entry.node)?;
        Some(RouteRef { tree, entry, spec })
    }

    /// Canonical name.
    pub fn name(&self) -> &'a str {
        &self.entry.name
    }

    pub fn path(&self) -> &'a str {
        &self.entry.path
    }

    pub fn node(&self) -> NodeId {
        self.entry.node
    }

    pub fn method(&self) -> Method {
        self.spec.method
    }

    pub fn action(&self) -> &'a Action {
        &self.spec.action
    }

    pub fn meta(&self) -> &'a RouteMeta {
        &self.spec.meta
    }

    pub fn subscription(&self) -> Option<&'a SubscriptionConfig> {
        self.spec.subscription.as_ref()
    }

    pub fn auth(&self) -> Option<&'a Auth> {
        self.tree.auth(self.entry.node)
    }

    pub fn controller(&self) -> Option<&'a ControllerDesignation> {
        self.tree.controller(self.entry.node)
    }

    pub fn bind(&self) -> Option<&'a Value> {
        self.tree.bind(self.entry.node)
    }

    pub fn validate(&self, slot: ValidationSlot) -> Option<&'a Schema> {
        self.tree.validate(self.entry.node, slot)
    }

    pub fn tags(&self) -> Vec<String> {
        self.tree.tags(self.entry.node)
    }

    pub fn pre(&self) -> Vec<PreHook> {
        self.tree.pre(self.entry.node)
    }
}

impl fmt::Debug for RouteRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteRef")
            .field("name", &self.entry.name)
            .field("path", &self.entry.path)
            .field("method", &self.spec.method)
            .field("action", &self.spec.action)
            .finish()
    }
}
