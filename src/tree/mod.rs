//! Arena-backed resource tree.
//!
//! Nodes live in one `Vec` and point at their parent by [`NodeId`]. The parent link is fixed when a
//! node is created, so option reads always walk the chain the node was built under. Children are kept
//! in insertion order; names are unique per parent. A duplicate name is recorded as the tree's
//! assembly error and the offending node is never attached.

mod list;
mod options;
mod route;

pub use list::InheritedList;
pub use options::*;
pub use route::*;

use crate::controller::{ControllerDesignation, PreHook};
use crate::error::RouterError;
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// URL contribution of a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    /// Contributes nothing: the node sits at its parent's path.
    Root,
    Named(String),
}

impl Segment {
    pub fn named(segment: impl Into<String>) -> Self {
        Segment::Named(segment.into())
    }

    pub fn join(&self, base: &str) -> String {
        match self {
            Segment::Root => base.to_string(),
            Segment::Named(segment) => join_path(base, segment),
        }
    }
}

fn join_path(base: &str, segment: &str) -> String {
    if base == "/" {
        format!("/{}", segment)
    } else {
        format!("{}/{}", base, segment)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceKind {
    Router,
    Namespace,
    Collection,
    Item,
    Group,
    CollectionItem,
    CollectionGroup,
    ItemGroup,
}

impl ResourceKind {
    /// Groups add nothing to names or paths.
    pub fn is_transparent(self) -> bool {
        matches!(self, ResourceKind::Group | ResourceKind::CollectionGroup | ResourceKind::ItemGroup)
    }
}

#[derive(Clone, Debug)]
pub(crate) enum NodeKind {
    Resource {
        kind: ResourceKind,
        children: Vec<(String, NodeId)>,
        /// Singleton item child created by `items`; visited after the named children.
        items: Option<NodeId>,
    },
    Route(RouteSpec),
}

#[derive(Clone, Debug)]
pub(crate) struct Node {
    parent: Option<NodeId>,
    name: String,
    segment: Segment,
    pub(crate) options: NodeOptions,
    pub(crate) tags: InheritedList<String>,
    pub(crate) pre: InheritedList<PreHook>,
    pub(crate) kind: NodeKind,
}

impl Node {
    fn join_name(&self, base: &str) -> String {
        match &self.kind {
            NodeKind::Resource { kind, .. } if kind.is_transparent() => base.to_string(),
            _ if base.is_empty() => self.name.clone(),
            _ => format!("{}.{}", base, self.name),
        }
    }

    fn join_path(&self, base: &str) -> String {
        match &self.kind {
            NodeKind::Resource { kind, .. } if kind.is_transparent() => base.to_string(),
            _ => self.segment.join(base),
        }
    }
}

/// One route reached by traversal, with its canonical name and full path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Visited {
    pub name: String,
    pub path: String,
    pub node: NodeId,
}

#[derive(Clone, Debug)]
pub struct RouteTree {
    nodes: Vec<Node>,
    root: NodeId,
    error: Option<RouterError>,
}

impl RouteTree {
    pub fn new(root_name: &str) -> Self {
        let root = Node {
            parent: None,
            name: root_name.to_string(),
            segment: Segment::Root,
            options: NodeOptions::default(),
            tags: InheritedList::default(),
            pre: InheritedList::default(),
            kind: NodeKind::Resource {
                kind: ResourceKind::Router,
                children: Vec::new(),
                items: None,
            },
        };
        RouteTree {
            nodes: vec![root],
            root: NodeId(0),
            error: None,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn name(&self, id: NodeId) -> &str {
        &self.node(id).name
    }

    pub fn segment(&self, id: NodeId) -> &Segment {
        &self.node(id).segment
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn resource_kind(&self, id: NodeId) -> Option<ResourceKind> {
        match &self.node(id).kind {
            NodeKind::Resource { kind, .. } => Some(*kind),
            NodeKind::Route(_) => None,
        }
    }

    pub fn route_spec(&self, id: NodeId) -> Option<&RouteSpec> {
        match &self.node(id).kind {
            NodeKind::Route(spec) => Some(spec),
            NodeKind::Resource { .. } => None,
        }
    }

    pub(crate) fn route_spec_mut(&mut self, id: NodeId) -> Option<&mut RouteSpec> {
        match &mut self.node_mut(id).kind {
            NodeKind::Route(spec) => Some(spec),
            NodeKind::Resource { .. } => None,
        }
    }

    /// Names of attached children in insertion order.
    pub fn children(&self, id: NodeId) -> Vec<&str> {
        match &self.node(id).kind {
            NodeKind::Resource { children, .. } => children.iter().map(|(n, _)| n.as_str()).collect(),
            NodeKind::Route(_) => Vec::new(),
        }
    }

    pub fn child(&self, id: NodeId, name: &str) -> Option<NodeId> {
        match &self.node(id).kind {
            NodeKind::Resource { children, .. } => children.iter().find(|(n, _)| n == name).map(|(_, c)| *c),
            NodeKind::Route(_) => None,
        }
    }

    pub fn items_child(&self, id: NodeId) -> Option<NodeId> {
        match &self.node(id).kind {
            NodeKind::Resource { items, .. } => *items,
            NodeKind::Route(_) => None,
        }
    }

    /// First assembly error, if any. A tree carrying one never builds.
    pub fn error(&self) -> Option<&RouterError> {
        self.error.as_ref()
    }

    /// Allocate a node under `parent`. It inherits from `parent` at once but is not yet a child.
    pub(crate) fn create(&mut self, parent: NodeId, name: &str, segment: Segment, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: Some(parent),
            name: name.to_string(),
            segment,
            options: NodeOptions::default(),
            tags: InheritedList::default(),
            pre: InheritedList::default(),
            kind,
        });
        id
    }

    /// Insert `child` into `parent`'s children under the child's name.
    pub(crate) fn attach(&mut self, parent: NodeId, child: NodeId) -> bool {
        let name = self.node(child).name.clone();
        let parent_name = self.node(parent).name.clone();
        let NodeKind::Resource { children, .. } = &mut self.node_mut(parent).kind else {
            return false;
        };
        if children.iter().any(|(n, _)| *n == name) {
            tracing::warn!(parent = %parent_name, name = %name, "duplicate resource name");
            if self.error.is_none() {
                self.error = Some(RouterError::DuplicateChild {
                    parent: parent_name,
                    name,
                });
            }
            return false;
        }
        children.push((name, child));
        true
    }

    /// The singleton item child of a collection-like node, created on first use.
    pub(crate) fn items(&mut self, parent: NodeId, name: &str) -> NodeId {
        if let NodeKind::Resource { items: Some(existing), .. } = &self.node(parent).kind {
            return *existing;
        }
        let id = self.create(
            parent,
            name,
            Segment::Root,
            NodeKind::Resource {
                kind: ResourceKind::CollectionItem,
                children: Vec::new(),
                items: None,
            },
        );
        if let NodeKind::Resource { items, .. } = &mut self.node_mut(parent).kind {
            *items = Some(id);
        }
        id
    }

    fn ancestors(&self, id: NodeId) -> impl Iterator<Item = &Node> + '_ {
        std::iter::successors(Some(self.node(id)), move |n| n.parent.map(|p| self.node(p)))
    }

    /// Nearest decided value of an option, walking from `id` up to the root.
    pub fn lookup<T>(&self, id: NodeId, field: impl Fn(&NodeOptions) -> &Setting<T>) -> Option<&T> {
        self.ancestors(id)
            .find_map(|n| field(&n.options).decided())
            .flatten()
    }

    pub fn auth(&self, id: NodeId) -> Option<&Auth> {
        self.lookup(id, |o| &o.auth)
    }

    pub fn controller(&self, id: NodeId) -> Option<&ControllerDesignation> {
        self.lookup(id, |o| &o.controller)
    }

    pub fn bind(&self, id: NodeId) -> Option<&Value> {
        self.lookup(id, |o| &o.bind)
    }

    pub fn validate(&self, id: NodeId, slot: ValidationSlot) -> Option<&Schema> {
        self.lookup(id, |o| o.validate.slot(slot))
    }

    pub fn tags(&self, id: NodeId) -> Vec<String> {
        InheritedList::compose(self.ancestors(id).map(|n| &n.tags))
    }

    pub fn pre(&self, id: NodeId) -> Vec<PreHook> {
        InheritedList::compose(self.ancestors(id).map(|n| &n.pre))
    }

    /// Depth-first walk below `id` in child order, then the items child. Routes are collected with
    /// their canonical name and path.
    pub(crate) fn visit(&self, id: NodeId, base_name: &str, base_path: &str, out: &mut Vec<Visited>) {
        let NodeKind::Resource { children, items, .. } = &self.node(id).kind else {
            return;
        };
        for (_, child_id) in children {
            let child = self.node(*child_id);
            let name = child.join_name(base_name);
            let path = child.join_path(base_path);
            match &child.kind {
                NodeKind::Route(_) => out.push(Visited {
                    name,
                    path,
                    node: *child_id,
                }),
                NodeKind::Resource { .. } => self.visit(*child_id, &name, &path, out),
            }
        }
        if let Some(items_id) = items {
            let item = self.node(*items_id);
            let name = format!("{}[{}]", base_name, item.name);
            let path = join_path(base_path, &format!("{{{}}}", item.name));
            self.visit(*items_id, &name, &path, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resource(kind: ResourceKind) -> NodeKind {
        NodeKind::Resource {
            kind,
            children: Vec::new(),
            items: None,
        }
    }

    #[test]
    fn test_segment_join() {
        assert_eq!(Segment::Root.join("/api"), "/api");
        assert_eq!(Segment::named("users").join("/"), "/users");
        assert_eq!(Segment::named("users").join("/api"), "/api/users");
    }

    #[test]
    fn test_lookup_override_and_clear() {
        let mut tree = RouteTree::new("ROUTER");
        let root = tree.root();
        let users = tree.create(root, "users", Segment::named("users"), resource(ResourceKind::Collection));
        let admin = tree.create(users, "admin", Segment::Root, resource(ResourceKind::Group));
        let public = tree.create(users, "public", Segment::Root, resource(ResourceKind::Group));

        tree.node_mut(root).options.auth = Setting::Set(Auth::strategy("session"));
        tree.node_mut(admin).options.auth = Setting::Set(Auth::strategy("admin"));
        tree.node_mut(public).options.auth = Setting::Clear;

        assert_eq!(tree.auth(users), Some(&Auth::strategy("session")));
        assert_eq!(tree.auth(admin), Some(&Auth::strategy("admin")));
        assert_eq!(tree.auth(public), None);
        assert_eq!(tree.bind(admin), None);

        tree.node_mut(users).options.bind = Setting::Set(json!({"db": "main"}));
        assert_eq!(tree.bind(admin), Some(&json!({"db": "main"})));
    }

    #[test]
    fn test_tags_accumulate() {
        let mut tree = RouteTree::new("ROUTER");
        let root = tree.root();
        let users = tree.create(root, "users", Segment::named("users"), resource(ResourceKind::Collection));
        let sibling = tree.create(root, "posts", Segment::named("posts"), resource(ResourceKind::Collection));
        tree.node_mut(root).tags.push("api".into());
        tree.node_mut(users).tags.push("users".into());

        assert_eq!(tree.tags(users), vec!["api".to_string(), "users".to_string()]);
        assert_eq!(tree.tags(sibling), vec!["api".to_string()]);
    }

    #[test]
    fn test_attach_rejects_duplicates() {
        let mut tree = RouteTree::new("ROUTER");
        let root = tree.root();
        let a = tree.create(root, "users", Segment::named("users"), resource(ResourceKind::Collection));
        let b = tree.create(root, "users", Segment::named("people"), resource(ResourceKind::Collection));
        assert!(tree.attach(root, a));
        assert!(!tree.attach(root, b));
        assert_eq!(tree.children(root), vec!["users"]);
        assert_eq!(
            tree.error(),
            Some(&RouterError::DuplicateChild {
                parent: "ROUTER".into(),
                name: "users".into()
            })
        );
    }

    #[test]
    fn test_items_is_singleton() {
        let mut tree = RouteTree::new("ROUTER");
        let root = tree.root();
        let users = tree.create(root, "users", Segment::named("users"), resource(ResourceKind::Collection));
        let first = tree.items(users, "user");
        let second = tree.items(users, "user");
        assert_eq!(first, second);
        assert_eq!(tree.resource_kind(first), Some(ResourceKind::CollectionItem));
    }
}
