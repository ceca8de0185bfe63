//! [`Host`] that mounts registrations on an `axum::Router`.

use crate::controller::{Handler, PreHook, RequestHead};
use crate::error::RouterError;
use crate::host::{PreResults, RouteId};
use crate::registration::{Host, HttpRegistration};
use crate::router::placeholders;
use crate::tree::HttpMethod;
use axum::extract::Request;
use axum::response::Response;
use axum::routing::{on, MethodFilter, MethodRouter};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;

/// Collects HTTP registrations and turns them into an `axum::Router`.
///
/// Paths are converted from `{param}` to `:param`. Routes without a handler are skipped. Subscriptions
/// are declined.
#[derive(Default)]
pub struct AxumHost {
    /// Axum path → method router, in first-registration order.
    paths: Vec<(String, MethodRouter)>,
    /// Path with parameter names erased → axum path, so two spellings of one shape cannot collide in axum.
    shapes: HashMap<String, String>,
    methods: HashSet<(HttpMethod, String)>,
    skipped: Vec<String>,
}

impl AxumHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route ids that were skipped because no handler resolved.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    pub fn into_router(self) -> axum::Router {
        self.paths
            .into_iter()
            .fold(axum::Router::new(), |router, (path, methods)| router.route(&path, methods))
    }

    fn mount(&mut self, path: String, method_router: MethodRouter) {
        match self.paths.iter_mut().find(|(p, _)| *p == path) {
            Some((_, existing)) => {
                let current = std::mem::take(existing);
                *existing = current.merge(method_router);
            }
            None => self.paths.push((path, method_router)),
        }
    }
}

impl Host for AxumHost {
    fn route(&mut self, registration: HttpRegistration) -> Result<(), RouterError> {
        let Some(handler) = registration.handler.clone() else {
            tracing::warn!(route = %registration.id, path = %registration.path, "no handler resolved, route skipped");
            self.skipped.push(registration.id);
            return Ok(());
        };

        let re = placeholders()?;
        let path = re.replace_all(&registration.path, ":$1").into_owned();
        let shape = re.replace_all(&registration.path, "{}").into_owned();
        let conflict = || RouterError::RouteConflict {
            method: registration.method.to_string(),
            path: registration.path.clone(),
        };
        if self.shapes.get(&shape).is_some_and(|existing| *existing != path) {
            return Err(conflict());
        }
        if !self.methods.insert((registration.method, path.clone())) {
            return Err(conflict());
        }
        self.shapes.insert(shape, path.clone());

        let endpoint = Endpoint {
            id: RouteId(registration.id.clone()),
            handler,
            pre: Arc::from(registration.pre),
        };
        let mut method_router: MethodRouter =
            on(method_filter(registration.method), move |req: Request| endpoint.clone().call(req));
        if let Some(limit) = registration.meta.payload_max_bytes() {
            method_router = method_router.layer(RequestBodyLimitLayer::new(limit));
        }
        tracing::debug!(route = %registration.id, method = %registration.method, path = %path, "mounted");
        self.mount(path, method_router);
        Ok(())
    }
}

impl fmt::Debug for AxumHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let paths: Vec<&str> = self.paths.iter().map(|(p, _)| p.as_str()).collect();
        f.debug_struct("AxumHost")
            .field("paths", &paths)
            .field("skipped", &self.skipped)
            .finish()
    }
}

fn method_filter(method: HttpMethod) -> MethodFilter {
    match method {
        HttpMethod::Get => MethodFilter::GET,
        HttpMethod::Post => MethodFilter::POST,
        HttpMethod::Put => MethodFilter::PUT,
        HttpMethod::Patch => MethodFilter::PATCH,
        HttpMethod::Delete => MethodFilter::DELETE,
        HttpMethod::Options => MethodFilter::OPTIONS,
    }
}

#[derive(Clone)]
struct Endpoint {
    id: RouteId,
    handler: Handler,
    pre: Arc<[PreHook]>,
}

impl Endpoint {
    /// Run pre steps in order, stopping at the first that answers, then the handler.
    async fn call(self, mut req: Request) -> Response {
        let mut results = PreResults::default();
        for step in self.pre.iter() {
            let head = RequestHead {
                method: req.method().clone(),
                uri: req.uri().clone(),
                headers: req.headers().clone(),
            };
            match (step.method)(head).await {
                Ok(value) => {
                    if let (Some(key), Some(value)) = (&step.assign, value) {
                        results.0.insert(key.clone(), value);
                    }
                }
                Err(response) => return response,
            }
        }
        req.extensions_mut().insert(self.id);
        req.extensions_mut().insert(results);
        (self.handler)(req).await
    }
}
