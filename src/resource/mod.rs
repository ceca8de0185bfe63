//! Builder DSL over the resource tree.
//!
//! Every handle borrows the tree mutably for as long as its builder runs. Child builders run before
//! the child is attached to its parent, so a child's name is checked for uniqueness only once its
//! subtree is complete.

mod handles;
mod route;

pub use handles::*;
pub(crate) use handles::group_fn;
pub use route::Route;

use crate::controller::{ControllerDesignation, PreHook};
use crate::tree::{
    Auth, HttpMethod, NodeId, NodeKind, ResourceKind, RouteSpec, RouteTree, Schema, Segment, Setting,
    SubscriptionConfig, ValidationSlot,
};
use serde_json::Value;

/// Option setters and inherited getters shared by every node handle.
pub trait Scope {
    #[doc(hidden)]
    fn tree(&self) -> &RouteTree;
    #[doc(hidden)]
    fn tree_mut(&mut self) -> &mut RouteTree;
    fn id(&self) -> NodeId;

    fn name(&self) -> &str {
        self.tree().name(self.id())
    }

    fn set_auth(&mut self, auth: impl Into<Auth>) -> &mut Self {
        let id = self.id();
        self.tree_mut().node_mut(id).options.auth = Setting::Set(auth.into());
        self
    }

    fn clear_auth(&mut self) -> &mut Self {
        let id = self.id();
        self.tree_mut().node_mut(id).options.auth = Setting::Clear;
        self
    }

    fn auth(&self) -> Option<&Auth> {
        self.tree().auth(self.id())
    }

    fn set_controller(&mut self, controller: impl Into<ControllerDesignation>) -> &mut Self {
        let id = self.id();
        self.tree_mut().node_mut(id).options.controller = Setting::Set(controller.into());
        self
    }

    fn clear_controller(&mut self) -> &mut Self {
        let id = self.id();
        self.tree_mut().node_mut(id).options.controller = Setting::Clear;
        self
    }

    fn controller(&self) -> Option<&ControllerDesignation> {
        self.tree().controller(self.id())
    }

    fn set_bind(&mut self, bind: Value) -> &mut Self {
        let id = self.id();
        self.tree_mut().node_mut(id).options.bind = Setting::Set(bind);
        self
    }

    fn bind(&self) -> Option<&Value> {
        self.tree().bind(self.id())
    }

    fn set_validate(&mut self, slot: ValidationSlot, schema: Schema) -> &mut Self {
        let id = self.id();
        *self.tree_mut().node_mut(id).options.validate.slot_mut(slot) = Setting::Set(schema);
        self
    }

    /// Shadow an inherited schema for this subtree.
    fn clear_validate(&mut self, slot: ValidationSlot) -> &mut Self {
        let id = self.id();
        *self.tree_mut().node_mut(id).options.validate.slot_mut(slot) = Setting::Clear;
        self
    }

    fn validate(&self, slot: ValidationSlot) -> Option<&Schema> {
        self.tree().validate(self.id(), slot)
    }

    fn tag(&mut self, tag: impl Into<String>) -> &mut Self {
        let id = self.id();
        self.tree_mut().node_mut(id).tags.push(tag.into());
        self
    }

    /// Own tags appended to every ancestor's.
    fn tags(&self) -> Vec<String> {
        self.tree().tags(self.id())
    }

    fn pre(&mut self, hook: PreHook) -> &mut Self {
        let id = self.id();
        self.tree_mut().node_mut(id).pre.push(hook);
        self
    }

    fn pre_hooks(&self) -> Vec<PreHook> {
        self.tree().pre(self.id())
    }
}

fn resource_kind(kind: ResourceKind) -> NodeKind {
    NodeKind::Resource {
        kind,
        children: Vec::new(),
        items: None,
    }
}

/// Create a child resource under `parent`, run its builder, then attach it.
pub(crate) fn nest<F>(tree: &mut RouteTree, parent: NodeId, kind: ResourceKind, name: &str, segment: Segment, build: F) -> NodeId
where
    F: FnOnce(&mut RouteTree, NodeId),
{
    let id = tree.create(parent, name, segment, resource_kind(kind));
    build(tree, id);
    tree.attach(parent, id);
    id
}

fn add_route<'t>(tree: &'t mut RouteTree, parent: NodeId, name: &str, segment: Segment, spec: RouteSpec) -> Route<'t> {
    let id = tree.create(parent, name, segment, NodeKind::Route(spec));
    tree.attach(parent, id);
    Route::new(tree, id)
}

/// Child-creating DSL shared by every resource kind.
pub trait Resource: Scope {
    fn namespace<F>(&mut self, name: &str, build: F) -> Namespace<'_>
    where
        F: FnOnce(&mut Namespace<'_>),
    {
        self.namespace_at(name, name, build)
    }

    fn namespace_at<F>(&mut self, name: &str, path: &str, build: F) -> Namespace<'_>
    where
        F: FnOnce(&mut Namespace<'_>),
    {
        let parent = self.id();
        let tree = self.tree_mut();
        let id = nest(tree, parent, ResourceKind::Namespace, name, Segment::named(path), |tree, id| {
            build(&mut Namespace::new(tree, id))
        });
        Namespace::new(tree, id)
    }

    fn collection<F>(&mut self, name: &str, build: F) -> Collection<'_>
    where
        F: FnOnce(&mut Collection<'_>),
    {
        self.collection_at(name, name, build)
    }

    fn collection_at<F>(&mut self, name: &str, path: &str, build: F) -> Collection<'_>
    where
        F: FnOnce(&mut Collection<'_>),
    {
        let parent = self.id();
        let tree = self.tree_mut();
        let id = nest(tree, parent, ResourceKind::Collection, name, Segment::named(path), |tree, id| {
            build(&mut Collection::new(tree, id))
        });
        Collection::new(tree, id)
    }

    fn item<F>(&mut self, name: &str, build: F) -> Item<'_>
    where
        F: FnOnce(&mut Item<'_>),
    {
        self.item_at(name, name, build)
    }

    fn item_at<F>(&mut self, name: &str, path: &str, build: F) -> Item<'_>
    where
        F: FnOnce(&mut Item<'_>),
    {
        let parent = self.id();
        let tree = self.tree_mut();
        let id = nest(tree, parent, ResourceKind::Item, name, Segment::named(path), |tree, id| {
            build(&mut Item::new(tree, id))
        });
        Item::new(tree, id)
    }

    /// Route at `<resource path>/<name>`.
    fn route(&mut self, method: HttpMethod, name: &str) -> Route<'_> {
        self.route_at(method, name, name)
    }

    fn route_at(&mut self, method: HttpMethod, name: &str, path: &str) -> Route<'_> {
        let parent = self.id();
        add_route(self.tree_mut(), parent, name, Segment::named(path), RouteSpec::http(method, name))
    }

    /// Route at the resource's own path.
    fn root_route(&mut self, method: HttpMethod, name: &str) -> Route<'_> {
        let parent = self.id();
        add_route(self.tree_mut(), parent, name, Segment::Root, RouteSpec::http(method, name))
    }

    fn subscription(&mut self, name: &str, config: SubscriptionConfig) -> Route<'_> {
        let parent = self.id();
        add_route(self.tree_mut(), parent, name, Segment::Root, RouteSpec::subscription(name, config))
    }

    fn create(&mut self) -> Route<'_> {
        self.root_route(HttpMethod::Post, "create")
    }

    fn update(&mut self) -> Route<'_> {
        self.root_route(HttpMethod::Put, "update")
    }

    fn patch(&mut self) -> Route<'_> {
        self.root_route(HttpMethod::Patch, "patch")
    }

    fn destroy(&mut self) -> Route<'_> {
        self.root_route(HttpMethod::Delete, "destroy")
    }
}
