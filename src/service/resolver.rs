//! Registration-time controller and handler resolution.

use crate::controller::{
    ControllerDesignation, ControllerEntry, ControllerMap, ControllerSource, Handler, ResolvedController,
    SubscriptionHook,
};
use crate::error::RouterError;
use crate::tree::{Action, HookAction};
use serde_json::Value;
use std::sync::Arc;

/// Resolves controller designations against a loaded [`ControllerMap`].
#[derive(Clone, Debug, Default)]
pub struct Resolver {
    controllers: ControllerMap,
}

impl Resolver {
    pub fn new(controllers: ControllerMap) -> Self {
        Resolver { controllers }
    }

    /// Await the source once and resolve against the resulting map.
    pub async fn load(source: &ControllerSource) -> Result<Self, RouterError> {
        let controllers = source.resolve().await?;
        tracing::info!(controllers = controllers.len(), "controller map loaded");
        Ok(Self::new(controllers))
    }

    pub fn controllers(&self) -> &ControllerMap {
        &self.controllers
    }

    /// Look up `name`; a class entry is constructed with `args`, an instance entry is returned as-is.
    pub fn resolve_controller(&self, name: &str, args: &[Value]) -> Result<ResolvedController, RouterError> {
        match self.controllers.get(name) {
            None => Err(RouterError::MissingController(name.to_string())),
            Some(ControllerEntry::Instance(instance)) => Ok(ResolvedController {
                instance: Arc::clone(instance),
                class: None,
            }),
            Some(ControllerEntry::Class(class)) => {
                tracing::debug!(controller = %name, args = args.len(), "constructing controller");
                let instance = class
                    .construct(args)
                    .map_err(|source| RouterError::ControllerConstruction {
                        name: name.to_string(),
                        source,
                    })?;
                Ok(ResolvedController {
                    instance,
                    class: Some(Arc::clone(class)),
                })
            }
        }
    }

    pub fn resolve_designation(
        &self,
        designation: Option<&ControllerDesignation>,
    ) -> Result<Option<ResolvedController>, RouterError> {
        match designation {
            None => Ok(None),
            Some(ControllerDesignation::Instance(instance)) => Ok(Some(ResolvedController {
                instance: Arc::clone(instance),
                class: None,
            })),
            Some(ControllerDesignation::Named { name, args }) => self.resolve_controller(name, args).map(Some),
        }
    }

    /// A direct action is used as-is. A named action is looked up on the controller; `None` marks it absent.
    pub fn resolve_handler(action: &Action, controller: Option<&ResolvedController>) -> Option<Handler> {
        match action {
            Action::Direct(handler) => Some(Arc::clone(handler)),
            Action::Named(name) => controller?.action(name),
        }
    }

    pub fn resolve_hook(hook: Option<&HookAction>, controller: Option<&ResolvedController>) -> Option<SubscriptionHook> {
        match hook? {
            HookAction::Direct(hook) => Some(Arc::clone(hook)),
            HookAction::Named(name) => controller?.hook(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{handler, hook, ClassFn, Controller, ObjectController};
    use crate::error::ConstructError;
    use serde_json::json;
    use std::sync::Mutex;

    fn widgets(seen: Arc<Mutex<Vec<Value>>>) -> ClassFn {
        ClassFn::new(move |args: &[Value]| {
            seen.lock().unwrap().extend(args.iter().cloned());
            Ok(Arc::new(ObjectController::new().with_action("index", handler(|_req| async { "widgets" })))
                as Arc<dyn Controller>)
        })
    }

    #[test]
    fn test_class_constructed_with_args() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let resolver = Resolver::new(ControllerMap::new().with_class("widgets", widgets(seen.clone())));
        let designation = ControllerDesignation::with_args("widgets", vec![json!(42)]);

        let resolved = resolver.resolve_designation(Some(&designation)).unwrap().unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![json!(42)]);
        assert!(resolved.class.is_some());
        assert!(resolved.action("index").is_some());
        assert!(resolved.action("show").is_none());
    }

    #[test]
    fn test_instance_entry_returned_as_is() {
        let resolver = Resolver::new(ControllerMap::new().with_instance("home", ObjectController::new()));
        let resolved = resolver.resolve_controller("home", &[json!("ignored")]).unwrap();
        assert!(resolved.class.is_none());
    }

    #[test]
    fn test_missing_controller() {
        let resolver = Resolver::default();
        let err = resolver.resolve_designation(Some(&"users".into())).unwrap_err();
        assert_eq!(err, RouterError::MissingController("users".into()));
        assert!(resolver.resolve_designation(None).unwrap().is_none());
    }

    #[test]
    fn test_construction_failure() {
        let class = ClassFn::new(|_| Err(ConstructError("needs a tenant".into())));
        let resolver = Resolver::new(ControllerMap::new().with_class("tenants", class));
        let err = resolver.resolve_controller("tenants", &[]).unwrap_err();
        assert!(matches!(err, RouterError::ControllerConstruction { ref name, .. } if name == "tenants"));
    }

    #[test]
    fn test_handler_resolution() {
        let controller = ResolvedController {
            instance: Arc::new(ObjectController::new().with_action("show", handler(|_req| async { "user" }))),
            class: None,
        };
        assert!(Resolver::resolve_handler(&Action::from("show"), Some(&controller)).is_some());
        assert!(Resolver::resolve_handler(&Action::from("missing"), Some(&controller)).is_none());
        assert!(Resolver::resolve_handler(&Action::from("show"), None).is_none());

        let direct = Action::Direct(handler(|_req| async { "direct" }));
        assert!(Resolver::resolve_handler(&direct, None).is_some());
    }

    #[test]
    fn test_hook_resolution() {
        let controller = ResolvedController {
            instance: Arc::new(ObjectController::new().with_hook("allow", hook(|_event| async { true }))),
            class: None,
        };
        assert!(Resolver::resolve_hook(Some(&HookAction::from("allow")), Some(&controller)).is_some());
        assert!(Resolver::resolve_hook(Some(&HookAction::from("deny")), Some(&controller)).is_none());
        assert!(Resolver::resolve_hook(None, Some(&controller)).is_none());
    }

    #[tokio::test]
    async fn test_load_from_async_source() {
        let source = ControllerSource::loader(|| async {
            Ok::<_, RouterError>(ControllerMap::new().with_instance("home", ObjectController::new()))
        });
        let resolver = Resolver::load(&source).await.unwrap();
        assert_eq!(resolver.controllers().len(), 1);
    }
}
