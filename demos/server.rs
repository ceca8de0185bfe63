//! Example server: builds a small resource tree, registers it on axum, and serves it.
//!
//! `cargo run --example server`, then `curl localhost:3000/api/users/1`.

use axum::extract::{Path, Request};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, RequestExt};
use resource_router::{
    handler, register, AxumHost, ControllerMap, ControllerSource, HttpMethod, ObjectController, Resource, Router,
    RouterError, RouterOptions, Scope,
};
use serde_json::json;
use std::collections::HashMap;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("resource_router=info".parse()?))
        .init();

    let mut options = RouterOptions::from_env();
    if options.base_path.is_none() {
        options = options.with_base_path("/api");
    }
    let mut router = Router::from_options(options)?;
    router.add(|r| {
        r.set_controller("home");
        r.root_route(HttpMethod::Get, "home");
        r.collection("users", |users| {
            users.set_controller("users").tag("users");
            users.index().description("List users");
            users.items("user", |user| {
                user.show().description("Fetch one user");
            });
        });
    })?;

    let controllers = ControllerMap::new()
        .with_instance(
            "home",
            ObjectController::new().with_action("home", handler(|_req| async { Json(json!({"hello": "world"})) })),
        )
        .with_instance(
            "users",
            ObjectController::new()
                .with_action("index", handler(|_req| async { Json(json!([{"id": 1}, {"id": 2}])) }))
                .with_action("show", handler(show_user)),
        );

    let mut host = AxumHost::new();
    let source = ControllerSource::loader(move || {
        let controllers = controllers.clone();
        async move { Ok::<_, RouterError>(controllers) }
    });
    register(&router, &source, &mut host).await?;
    for route in router.iter() {
        tracing::info!("{} {} -> {}", route.method(), route.path(), route.name());
    }

    let listener = TcpListener::bind("0.0.0.0:3000").await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, host.into_router()).await?;
    Ok(())
}

async fn show_user(mut req: Request) -> axum::response::Response {
    match req.extract_parts::<Path<HashMap<String, String>>>().await {
        Ok(Path(params)) => Json(json!({ "id": params.get("user") })).into_response(),
        Err(rejection) => (StatusCode::BAD_REQUEST, rejection.to_string()).into_response(),
    }
}
