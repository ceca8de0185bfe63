//! Example consumer: a separate Rust project that uses resource-router as a dependency.
//!
//! Run from repo root: `cargo run -p example-consumer`
//! Or from this directory: `cargo run`
//!
//! Reads `RESOURCE_ROUTER_BASE_PATH` and `RESOURCE_ROUTER_BASE_URL` from the environment (or `.env`).

use axum::Json;
use resource_router::{
    handler, register, AxumHost, ClassFn, Controller, ControllerDesignation, ControllerMap, ControllerSource,
    HttpMethod, ObjectController, Resource, Router, RouterOptions, Scope,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;

/// A controller class: each designation `["greeter", "<greeting>"]` builds its own instance.
fn greeter() -> ClassFn {
    ClassFn::new(|args: &[Value]| {
        let greeting = args
            .first()
            .and_then(Value::as_str)
            .unwrap_or("hello")
            .to_string();
        let controller = ObjectController::new().with_action(
            "greet",
            handler(move |_req| {
                let greeting = greeting.clone();
                async move { Json(json!({ "greeting": greeting })) }
            }),
        );
        Ok(Arc::new(controller) as Arc<dyn Controller>)
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("resource_router=info")),
        )
        .init();

    let mut router = Router::from_options(RouterOptions::from_env())?;
    router.add(|r| {
        r.namespace("en", |ns| {
            ns.set_controller(ControllerDesignation::with_args("greeter", vec![json!("hello")]));
            ns.route(HttpMethod::Get, "greet");
        });
        r.namespace("fr", |ns| {
            ns.set_controller(ControllerDesignation::with_args("greeter", vec![json!("bonjour")]));
            ns.route(HttpMethod::Get, "greet");
        });
    })?;

    let source = ControllerSource::from(ControllerMap::new().with_class("greeter", greeter()));
    let mut host = AxumHost::new();
    let summary = register(&router, &source, &mut host).await?;
    tracing::info!("registered {} routes", summary.routes);
    if let Ok(url) = router.href("fr.greet", Vec::<(String, String)>::new()) {
        tracing::info!("try {}", url);
    }

    let listener = TcpListener::bind("127.0.0.1:3000").await?;
    let port = listener.local_addr()?.port();
    tracing::info!("Example consumer listening on http://127.0.0.1:{}", port);
    axum::serve(listener, host.into_router()).await?;
    Ok(())
}
