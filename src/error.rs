//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("config load: {0}")]
    Load(String),
    #[error("validation: {0}")]
    Validation(String),
}

/// Raised by a [`ControllerClass`](crate::controller::ControllerClass) that cannot be built from its arguments.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ConstructError(pub String);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("duplicate resource name found under '{parent}': {name}")]
    DuplicateChild { parent: String, name: String },
    #[error("duplicate route name: {0}")]
    DuplicateRoute(String),
    #[error("missing controller {0}")]
    MissingController(String),
    #[error("controller {name} could not be constructed: {source}")]
    ControllerConstruction {
        name: String,
        #[source]
        source: ConstructError,
    },
    #[error("unknown route: {0}")]
    UnknownRoute(String),
    #[error("route {route} requires parameter '{param}'")]
    MissingParam { route: String, param: String },
    #[error("conflicting registration: {method} {path}")]
    RouteConflict { method: String, path: String },
    #[error("router was modified after its last build")]
    NotBuilt,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for RouterError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            RouterError::Config(_) | RouterError::NotBuilt => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            RouterError::DuplicateChild { .. } | RouterError::DuplicateRoute(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "duplicate_name")
            }
            RouterError::MissingController(_) | RouterError::ControllerConstruction { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "controller_error")
            }
            RouterError::UnknownRoute(_) => (StatusCode::NOT_FOUND, "not_found"),
            RouterError::MissingParam { .. } => (StatusCode::BAD_REQUEST, "bad_request"),
            RouterError::RouteConflict { .. } => (StatusCode::CONFLICT, "conflict"),
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}
