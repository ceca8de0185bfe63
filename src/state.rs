//! Router lifecycle: assembling until a build succeeds, built until the tree is touched again.

/// Set by [`Router::build`](crate::Router::build); any tree mutation moves the router back to `Assembling`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Assembling,
    Built,
}
