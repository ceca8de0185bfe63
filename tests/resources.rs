//! End-to-end: build the users API, register it on axum, and drive requests through it.

use axum::body::{to_bytes, Body};
use axum::extract::Request;
use axum::http::StatusCode;
use resource_router::{
    register, AxumHost, ControllerSource, HttpMethod, Method, Router, RouterError, RouterOptions, ValidationSlot,
};
use serde_json::Value;
use tower::ServiceExt;

mod common;

fn api() -> Router {
    let mut router = Router::from_options(RouterOptions::default().with_base_path("/api")).unwrap();
    router.add(common::resources).unwrap();
    router
}

async fn app() -> axum::Router {
    let router = api();
    let mut host = AxumHost::new();
    register(&router, &ControllerSource::from(common::controllers()), &mut host)
        .await
        .unwrap();
    host.into_router()
}

async fn send(app: &axum::Router, method: &str, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

#[test]
fn test_route_table() {
    let router = api();
    let table: Vec<(&str, &str)> = router
        .routes()
        .iter()
        .map(|e| (e.name.as_str(), e.path.as_str()))
        .collect();
    assert_eq!(
        table,
        vec![
            ("home", "/api"),
            ("banana", "/api/banana"),
            ("users.index", "/api/users"),
            ("users.create", "/api/users"),
            ("users[user].show", "/api/users/{user}"),
            ("users[user].update", "/api/users/{user}"),
            ("users[user].destroy", "/api/users/{user}"),
        ]
    );
    assert_eq!(router.get("users[user].destroy").unwrap().method(), Method::Http(HttpMethod::Delete));
}

#[test]
fn test_payload_schema_inheritance() {
    let router = api();
    let payload = |name: &str| router.get(name).unwrap().validate(ValidationSlot::Payload).cloned();
    assert_eq!(payload("users.create"), Some(common::user_schema()));
    assert_eq!(payload("users[user].update"), Some(common::user_schema()));
    assert_eq!(payload("users[user].destroy"), None);
    assert_eq!(payload("home"), None);
}

#[test]
fn test_href() {
    let router = api();
    assert_eq!(router.href("users[user].show", [("user", 2)]).unwrap(), "/api/users/2");
    assert!(matches!(
        router.href("users[user].show", Vec::<(String, String)>::new()),
        Err(RouterError::MissingParam { .. })
    ));
}

#[tokio::test]
async fn test_requests() {
    let app = app().await;

    let (status, body) = send(&app, "GET", "/api").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_slice::<Value>(&body).unwrap(), serde_json::json!({"hello": "world"}));

    let (_, body) = send(&app, "GET", "/api/banana").await;
    assert_eq!(body, b"banana!");

    let (_, body) = send(&app, "GET", "/api/users/1").await;
    assert_eq!(body, b"yes");

    let (status, body) = send(&app, "DELETE", "/api/users/1").await;
    assert_eq!(status, StatusCode::OK);
    let remaining: Vec<Value> = serde_json::from_slice(&body).unwrap();
    let ids: Vec<u64> = remaining.iter().filter_map(|u| u["id"].as_u64()).collect();
    assert_eq!(ids, vec![2, 3]);

    let (status, _) = send(&app, "DELETE", "/api/users/9").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_controller_fails_registration() {
    let router = api();
    let mut host = AxumHost::new();
    let err = register(&router, &ControllerSource::default(), &mut host)
        .await
        .unwrap_err();
    assert_eq!(err, RouterError::MissingController("users".into()));
}
