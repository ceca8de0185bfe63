//! Concrete resource handles. Each kind fixes its name/path contribution and which helpers it offers.

use crate::resource::{nest, Resource, Route, Scope};
use crate::tree::{HttpMethod, NodeId, ResourceKind, RouteTree, Segment};
use std::fmt;

macro_rules! resource_handle {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        pub struct $name<'t> {
            tree: &'t mut RouteTree,
            id: NodeId,
        }

        impl<'t> $name<'t> {
            pub(crate) fn new(tree: &'t mut RouteTree, id: NodeId) -> Self {
                $name { tree, id }
            }
        }

        impl Scope for $name<'_> {
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

        impl Resource for $name<'_> {}

        impl fmt::Debug for $name<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("name", &self.tree.name(self.id))
                    .field("children", &self.tree.children(self.id))
                    .finish()
            }
        }
    };
}

/// Expands to a `group` method creating a transparent child of the given handle type.
macro_rules! group_fn {
    ($group:ident, $kind:expr) => {
        /// Child that adds nothing to names or paths; it only scopes options for what it contains.
        pub fn group<F>(&mut self, name: &str, build: F) -> $group<'_>
        where
            F: FnOnce(&mut $group<'_>),
        {
            let parent = self.id();
            let tree = self.tree_mut();
            let id = nest(tree, parent, $kind, name, Segment::Root, |tree, id| {
                build(&mut $group::new(tree, id))
            });
            $group::new(tree, id)
        }
    };
}

pub(crate) use group_fn;

macro_rules! collection_fns {
    () => {
        pub fn index(&mut self) -> Route<'_> {
            self.root_route(HttpMethod::Get, "index")
        }

        /// The member resource, named `<collection>[name]` at `<collection path>/{name}`. Created on
        /// first call; later calls run `build` against the same node.
        pub fn items<F>(&mut self, name: &str, build: F) -> CollectionItem<'_>
        where
            F: FnOnce(&mut CollectionItem<'_>),
        {
            let id = self.tree.items(self.id, name);
            build(&mut CollectionItem::new(&mut *self.tree, id));
            CollectionItem::new(self.tree, id)
        }
    };
}

macro_rules! item_fns {
    () => {
        pub fn show(&mut self) -> Route<'_> {
            self.root_route(HttpMethod::Get, "show")
        }
    };
}

resource_handle!(
    /// Named container: contributes `.name` and `/segment`.
    Namespace
);
resource_handle!(
    /// REST collection: `index`, `create`, and a singleton member resource via `items`.
    Collection
);
resource_handle!(
    /// Singular resource: `show`, `update`, `patch`, `destroy`.
    Item
);
resource_handle!(
    /// Transparent container.
    Group
);
resource_handle!(
    /// Member of a collection, addressed by a path parameter.
    CollectionItem
);
resource_handle!(
    /// Transparent container inside a collection that can still declare `index` and `items`.
    CollectionGroup
);
resource_handle!(
    /// Transparent container inside an item that can still declare `show`.
    ItemGroup
);

impl Namespace<'_> {
    group_fn!(Group, ResourceKind::Group);
}

impl Group<'_> {
    group_fn!(Group, ResourceKind::Group);
}

impl Collection<'_> {
    group_fn!(CollectionGroup, ResourceKind::CollectionGroup);
    collection_fns!();
}

impl CollectionGroup<'_> {
    group_fn!(Group, ResourceKind::Group);
    collection_fns!();
}

impl Item<'_> {
    group_fn!(ItemGroup, ResourceKind::ItemGroup);
    item_fns!();
}

impl CollectionItem<'_> {
    group_fn!(ItemGroup, ResourceKind::ItemGroup);
    item_fns!();
}

impl ItemGroup<'_> {
    group_fn!(Group, ResourceKind::Group);
    item_fns!();
}
