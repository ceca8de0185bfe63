//! Per-route request extensions set by [`AxumHost`](crate::host::AxumHost).

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use serde_json::Value;
use std::collections::HashMap;

/// Canonical name of the route that matched the request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteId(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for RouteId
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RouteId>()
            .cloned()
            .ok_or((StatusCode::INTERNAL_SERVER_ERROR, "request was not routed by a resource router"))
    }
}

/// Values returned by pre-handler steps, keyed by their `assign` name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PreResults(pub HashMap<String, Value>);

impl PreResults {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for PreResults
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<PreResults>().cloned().unwrap_or_default())
    }
}
