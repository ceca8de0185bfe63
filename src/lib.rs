//! Resource router: a declarative resource tree compiled into a flat, name-addressable route table.
//!
//! Trees are assembled with the builder DSL on [`Router`], compiled with [`Router::build`], and
//! registered with a [`Host`] once the controller map is available.

pub mod config;
pub mod controller;
pub mod error;
pub mod host;
pub mod registration;
pub mod resource;
pub mod router;
pub mod service;
pub mod state;
pub mod tree;

pub use config::RouterOptions;
pub use controller::{
    handler, hook, ClassFn, Controller, ControllerClass, ControllerDesignation, ControllerLoader, ControllerMap,
    ControllerSource, Handler, ObjectController, PreHook, RequestHead, SubscriptionEvent, Validate, Validator,
};
pub use error::{ConfigError, ConstructError, RouterError};
pub use host::{AxumHost, PreResults, RouteId};
pub use registration::{register, register_with, Host, HttpRegistration, RegistrationSummary, SubscriptionRegistration};
pub use resource::{
    Collection, CollectionGroup, CollectionItem, Group, Item, ItemGroup, Namespace, Resource, Route, Scope,
};
pub use router::{RouteEntry, RouteRef, RouteTable, Router};
pub use service::{Resolver, Validation};
pub use state::Phase;
pub use tree::{Auth, HttpMethod, InheritedList, Method, RouteMeta, Schema, SubscriptionConfig, ValidationSlot};
