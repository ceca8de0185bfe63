//! Where the controller map comes from: a value, or an async loader awaited once.

use crate::controller::ControllerMap;
use crate::error::RouterError;
use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

#[async_trait]
pub trait ControllerLoader: Send + Sync {
    async fn load(&self) -> Result<ControllerMap, RouterError>;
}

#[async_trait]
impl<F, Fut> ControllerLoader for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<ControllerMap, RouterError>> + Send,
{
    async fn load(&self) -> Result<ControllerMap, RouterError> {
        (self)().await
    }
}

#[derive(Clone)]
pub enum ControllerSource {
    Map(ControllerMap),
    Loader(Arc<dyn ControllerLoader>),
}

impl ControllerSource {
    pub fn loader<L: ControllerLoader + 'static>(loader: L) -> Self {
        ControllerSource::Loader(Arc::new(loader))
    }

    /// Produce the map. A loader runs once per call; callers resolve before registering any route.
    pub async fn resolve(&self) -> Result<ControllerMap, RouterError> {
        match self {
            ControllerSource::Map(map) => Ok(map.clone()),
            ControllerSource::Loader(loader) => loader.load().await,
        }
    }
}

impl Default for ControllerSource {
    fn default() -> Self {
        ControllerSource::Map(ControllerMap::new())
    }
}

impl From<ControllerMap> for ControllerSource {
    fn from(map: ControllerMap) -> Self {
        ControllerSource::Map(map)
    }
}

impl fmt::Debug for ControllerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerSource::Map(map) => f.debug_tuple("Map").field(map).finish(),
            ControllerSource::Loader(_) => f.write_str("Loader(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::ObjectController;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_loader_closure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let source = ControllerSource::loader(move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, RouterError>(ControllerMap::new().with_instance("home", ObjectController::new()))
            }
        });
        let map = source.resolve().await.unwrap();
        assert!(map.get("home").is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_loader_error_propagates() {
        let source = ControllerSource::loader(|| async { Err::<ControllerMap, _>(RouterError::MissingController("db".into())) });
        assert_eq!(source.resolve().await.err(), Some(RouterError::MissingController("db".into())));
    }
}
