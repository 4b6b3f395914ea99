//! Shared plumbing for the HTTP integration suites.

use axum::body::{to_bytes, Body};
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use rodo_assess::server::Services;

pub fn router() -> (Router, Services) {
    let services = Services::in_memory("integration-seed");
    (services.api_router(), services)
}

pub async fn dispatch(app: &Router, request: Request<Body>) -> Response<axum::body::Body> {
    app.clone().oneshot(request).await.expect("router dispatch")
}

pub async fn body_json(response: Response<axum::body::Body>) -> Value {
    let bytes = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

pub async fn register(app: &Router, username: &str, email: &str) -> String {
    let payload = json!({
        "userName": username,
        "password": "Tajne!Haslo1",
        "firstName": "Jan",
        "lastName": "Kowalski",
        "email": email,
    });
    let request = Request::builder()
        .method("POST")
        .uri("/register")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request");

    let response = dispatch(app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    body["token"].as_str().expect("session token").to_string()
}

pub async fn get(app: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request");
    let response = dispatch(app, request).await;
    let status = response.status();
    (status, body_json(response).await)
}

pub async fn post_json(app: &Router, uri: &str, token: &str, payload: &Value) -> (StatusCode, Value) {
    send_json(app, "POST", uri, token, payload).await
}

pub async fn put_json(app: &Router, uri: &str, token: &str, payload: &Value) -> (StatusCode, Value) {
    send_json(app, "PUT", uri, token, payload).await
}

async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: &str,
    payload: &Value,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(payload.to_string()))
        .expect("request");
    let response = dispatch(app, request).await;
    let status = response.status();
    (status, body_json(response).await)
}
