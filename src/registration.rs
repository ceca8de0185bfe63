//! Turns a built route table into host registrations.
//!
//! The controller source is awaited once, before any route is resolved. Every table entry is then
//! resolved in table order and handed to the [`Host`]. A missing controller aborts the whole pass, and
//! so does a router touched since its last build.

use crate::controller::{ControllerSource, Handler, PreHook, ResolvedController, SubscriptionHook};
use crate::error::RouterError;
use crate::router::{RouteRef, Router};
use crate::service::{Resolver, Validation, ValidationResolver};
use crate::state::Phase;
use crate::tree::{Auth, HttpMethod, Method, RouteMeta};
use serde_json::Value;
use std::fmt;

/// What the host receives for one HTTP route.
#[derive(Clone)]
pub struct HttpRegistration {
    /// Canonical route name.
    pub id: String,
    pub path: String,
    pub method: HttpMethod,
    /// `None` when a named action has no matching controller method.
    pub handler: Option<Handler>,
    pub auth: Option<Auth>,
    pub tags: Vec<String>,
    pub pre: Vec<PreHook>,
    pub bind: Option<Value>,
    pub meta: RouteMeta,
    pub validate: Validation,
    pub controller: Option<ResolvedController>,
}

impl fmt::Debug for HttpRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRegistration")
            .field("id", &self.id)
            .field("path", &self.path)
            .field("method", &self.method)
            .field("handler", &self.handler.is_some())
            .field("auth", &self.auth)
            .field("tags", &self.tags)
            .field("pre", &self.pre.len())
            .field("validate", &self.validate)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct SubscriptionRegistration {
    pub id: String,
    pub path: String,
    pub filter: Option<SubscriptionHook>,
    pub on_subscribe: Option<SubscriptionHook>,
    pub on_unsubscribe: Option<SubscriptionHook>,
    pub auth: Option<Auth>,
}

impl fmt::Debug for SubscriptionRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionRegistration")
            .field("id", &self.id)
            .field("path", &self.path)
            .field("filter", &self.filter.is_some())
            .field("on_subscribe", &self.on_subscribe.is_some())
            .field("on_unsubscribe", &self.on_unsubscribe.is_some())
            .field("auth", &self.auth)
            .finish()
    }
}

/// A server that accepts resolved routes.
pub trait Host {
    fn route(&mut self, registration: HttpRegistration) -> Result<(), RouterError>;

    /// Returns `false` when the host has no subscription support; the route is then skipped.
    fn subscription(&mut self, _registration: SubscriptionRegistration) -> Result<bool, RouterError> {
        Ok(false)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegistrationSummary {
    pub routes: usize,
    pub subscriptions: usize,
    /// Subscriptions the host declined.
    pub skipped: usize,
}

/// Load controllers from `source`, then register every built route with `host`.
pub async fn register<H: Host>(
    router: &Router,
    source: &ControllerSource,
    host: &mut H,
) -> Result<RegistrationSummary, RouterError> {
    let resolver = Resolver::load(source).await?;
    register_with(&resolver, router, host)
}

/// Register against an already loaded resolver.
pub fn register_with<H: Host>(
    resolver: &Resolver,
    router: &Router,
    host: &mut H,
) -> Result<RegistrationSummary, RouterError> {
    if router.phase() != Phase::Built {
        return Err(RouterError::NotBuilt);
    }

    let mut summary = RegistrationSummary::default();
    for route in router.iter() {
        let controller = resolver.resolve_designation(route.controller())?;
        match route.method() {
            Method::Http(method) => {
                host.route(http_registration(&route, method, controller))?;
                summary.routes += 1;
            }
            Method::Subscription => {
                if host.subscription(subscription_registration(&route, controller.as_ref()))? {
                    summary.subscriptions += 1;
                } else {
                    tracing::warn!(route = %route.name(), "host does not support subscriptions, skipping");
                    summary.skipped += 1;
                }
            }
        }
    }
    tracing::info!(
        routes = summary.routes,
        subscriptions = summary.subscriptions,
        skipped = summary.skipped,
        "routes registered"
    );
    Ok(summary)
}

fn http_registration(route: &RouteRef<'_>, method: HttpMethod, controller: Option<ResolvedController>) -> HttpRegistration {
    let handler = Resolver::resolve_handler(route.action(), controller.as_ref());
    if handler.is_none() {
        tracing::debug!(route = %route.name(), action = ?route.action(), "no handler for action");
    }
    HttpRegistration {
        id: route.name().to_string(),
        path: route.path().to_string(),
        method,
        handler,
        auth: route.auth().cloned(),
        tags: route.tags(),
        pre: route.pre(),
        bind: route.bind().cloned(),
        meta: route.meta().clone(),
        validate: ValidationResolver::resolve(route, controller.as_ref()),
        controller,
    }
}

fn subscription_registration(route: &RouteRef<'_>, controller: Option<&ResolvedController>) -> SubscriptionRegistration {
    let config = route.subscription().cloned().unwrap_or_default();
    SubscriptionRegistration {
        id: route.name().to_string(),
        path: route.path().to_string(),
        filter: Resolver::resolve_hook(config.filter.as_ref(), controller),
        on_subscribe: Resolver::resolve_hook(config.on_subscribe.as_ref(), controller),
        on_unsubscribe: Resolver::resolve_hook(config.on_unsubscribe.as_ref(), controller),
        auth: config.auth,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{
        handler, hook, ClassFn, Controller, ControllerDesignation, ControllerEntry, ControllerMap, ObjectController,
    };
    use crate::resource::{Resource, Scope};
    use crate::tree::{Schema, SubscriptionConfig, ValidationSlot};
    use serde_json::json;
    use std::sync::Arc;

    #[derive(Default)]
    struct RecordingHost {
        routes: Vec<HttpRegistration>,
        subscriptions: Vec<SubscriptionRegistration>,
        subscribable: bool,
    }

    impl Host for RecordingHost {
        fn route(&mut self, registration: HttpRegistration) -> Result<(), RouterError> {
            self.routes.push(registration);
            Ok(())
        }

        fn subscription(&mut self, registration: SubscriptionRegistration) -> Result<bool, RouterError> {
            if self.subscribable {
                self.subscriptions.push(registration);
            }
            Ok(self.subscribable)
        }
    }

    fn users_controller() -> ObjectController {
        ObjectController::new()
            .with_action("index", handler(|_req| async { "[]" }))
            .with_action("create", handler(|_req| async { "{}" }))
            .with_hook("visible", hook(|_event| async { true }))
    }

    fn users_router() -> Router {
        let mut router = Router::new();
        router
            .add(|r| {
                r.collection("users", |users| {
                    users.set_controller("users").tag("users");
                    users.set_validate(ValidationSlot::Payload, Schema::new(json!({"type": "object"})));
                    users.index();
                    users.create();
                    users.route(HttpMethod::Get, "export");
                    users.subscription("changes", SubscriptionConfig::new().filter("visible"));
                });
            })
            .unwrap();
        router
    }

    #[tokio::test]
    async fn test_register_resolves_in_table_order() {
        let router = users_router();
        let source = ControllerSource::from(ControllerMap::new().with_instance("users", users_controller()));
        let mut host = RecordingHost::default();

        let summary = register(&router, &source, &mut host).await.unwrap();
        assert_eq!(summary, RegistrationSummary { routes: 3, subscriptions: 0, skipped: 1 });

        let ids: Vec<&str> = host.routes.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["users.index", "users.create", "users.export"]);

        let index = &host.routes[0];
        assert_eq!(index.path, "/users");
        assert!(index.handler.is_some());
        assert_eq!(index.validate.payload, None);
        assert_eq!(index.tags, vec!["users".to_string()]);
        assert!(index.controller.is_some());

        assert!(host.routes[1].validate.payload.is_some());
        assert!(host.routes[2].handler.is_none());
    }

    #[tokio::test]
    async fn test_subscriptions_when_supported() {
        let router = users_router();
        let source = ControllerSource::from(ControllerMap::new().with_instance("users", users_controller()));
        let mut host = RecordingHost {
            subscribable: true,
            ..Default::default()
        };

        let summary = register(&router, &source, &mut host).await.unwrap();
        assert_eq!(summary.subscriptions, 1);
        let sub = &host.subscriptions[0];
        assert_eq!(sub.id, "users.changes");
        assert_eq!(sub.path, "/users");
        assert!(sub.filter.is_some());
        assert!(sub.on_subscribe.is_none());
    }

    #[tokio::test]
    async fn test_missing_controller_aborts() {
        let router = users_router();
        let mut host = RecordingHost::default();
        let err = register(&router, &ControllerSource::default(), &mut host).await.unwrap_err();
        assert_eq!(err, RouterError::MissingController("users".into()));
        assert!(host.routes.is_empty());
    }

    #[tokio::test]
    async fn test_modified_router_must_be_rebuilt() {
        let mut router = users_router();
        router.collection("admins", |admins| {
            admins.index();
        });
        let source = ControllerSource::from(ControllerMap::new().with_instance("users", users_controller()));
        let mut host = RecordingHost::default();

        let err = register(&router, &source, &mut host).await.unwrap_err();
        assert_eq!(err, RouterError::NotBuilt);
        assert!(host.routes.is_empty());

        router.build().unwrap();
        let summary = register(&router, &source, &mut host).await.unwrap();
        assert_eq!(summary.routes, 4);
        assert_eq!(host.routes.last().unwrap().id, "admins.index");
    }

    #[tokio::test]
    async fn test_tuple_designation_constructs_class() {
        let mut router = Router::new();
        router
            .add(|r| {
                r.collection("widgets", |w| {
                    w.set_controller(ControllerDesignation::with_args("widgets", vec![json!(42)]));
                    w.index();
                });
            })
            .unwrap();
        let class = Arc::new(ClassFn::new(|args: &[Value]| {
            let size = args.first().and_then(Value::as_u64).unwrap_or(0);
            let body = format!("{} widgets", size);
            Ok(Arc::new(ObjectController::new().with_action(
                "index",
                handler(move |_req| {
                    let body = body.clone();
                    async move { body }
                }),
            )) as Arc<dyn Controller>)
        }));
        let source = ControllerSource::loader(move || {
            let mut map = ControllerMap::new();
            map.insert("widgets", ControllerEntry::Class(class.clone()));
            async move { Ok::<_, RouterError>(map) }
        });
        let mut host = RecordingHost::default();
        register(&router, &source, &mut host).await.unwrap();
        assert!(host.routes[0].handler.is_some());
        assert!(host.routes[0].controller.as_ref().unwrap().class.is_some());
    }
}
