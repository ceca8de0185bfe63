//! Shared fixtures: a small users API with a home controller.

use axum::extract::{Path, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, RequestExt};
use resource_router::{
    handler, ControllerDesignation, ControllerMap, HttpMethod, ObjectController, Resource, Router, Schema, Scope,
    ValidationSlot,
};
use serde_json::{json, Value};
use std::collections::HashMap;

pub fn users() -> Vec<Value> {
    vec![
        json!({"id": 1, "first_name": "Arthas", "last_name": "Menethil"}),
        json!({"id": 2, "first_name": "Jaina", "last_name": "Proudmoore"}),
        json!({"id": 3, "first_name": "Thrall", "last_name": "Son of Durotan"}),
    ]
}

pub fn user_schema() -> Schema {
    Schema::new(json!({
        "type": "object",
        "properties": {"first_name": {"type": "string"}, "last_name": {"type": "string"}}
    }))
}

async fn user_id(req: &mut Request) -> Option<String> {
    let Path(params): Path<HashMap<String, String>> = req.extract_parts().await.ok()?;
    params.get("user").cloned()
}

fn find(id: &str) -> Option<Value> {
    users().into_iter().find(|u| u["id"].to_string() == id)
}

async fn show(mut req: Request) -> Response {
    match user_id(&mut req).await.and_then(|id| find(&id)) {
        Some(user) => Json(user).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn destroy(mut req: Request) -> Response {
    let Some(id) = user_id(&mut req).await else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if find(&id).is_none() {
        return StatusCode::NOT_FOUND.into_response();
    }
    let remaining: Vec<Value> = users().into_iter().filter(|u| u["id"].to_string() != id).collect();
    Json(remaining).into_response()
}

pub fn users_controller() -> ObjectController {
    ObjectController::new()
        .with_action("index", handler(|_req| async { Json(users()) }))
        .with_action("show", handler(show))
        .with_action("create", handler(|_req| async { (StatusCode::CREATED, Json(json!({"id": 4}))) }))
        .with_action("update", handler(show))
        .with_action("destroy", handler(destroy))
}

pub fn home_controller() -> ObjectController {
    ObjectController::new()
        .with_action("home", handler(|_req| async { Json(json!({"hello": "world"})) }))
        .with_action("getBanana", handler(|_req| async { "banana!" }))
}

pub fn controllers() -> ControllerMap {
    ControllerMap::new().with_instance("users", users_controller())
}

/// The users API: a home route, a renamed action, and a users collection with an admin group.
pub fn resources(r: &mut Router) {
    r.set_controller(ControllerDesignation::instance(home_controller()));
    r.root_route(HttpMethod::Get, "home");
    r.route(HttpMethod::Get, "banana").set_action("getBanana");
    r.collection("users", |users| {
        users.set_controller("users");
        users.set_validate(ValidationSlot::Payload, user_schema());
        users.index();
        users.create();
        users.items("user", |user| {
            user.show().set_controller(ControllerDesignation::instance(
                ObjectController::new().with_action("show", handler(|_req| async { "yes" })),
            ));
            user.group("admin", |admin| {
                admin.update();
                admin.destroy().clear_validate(ValidationSlot::Payload);
            });
        });
    });
}
