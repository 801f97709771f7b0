use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::helpers::TestApp;

fn expected_index() -> serde_json::Value {
    json!({
        "message": "Backend server is running",
        "endpoints": {
            "appointment": "/api/book-appointment",
            "contact": "/api/contact-us"
        }
    })
}

#[tokio::test]
async fn root_lists_available_endpoints() {
    // Arrange
    let app = TestApp::new();
    let request = Request::builder()
        .method(Method::GET)
        .uri("/")
        .body(Body::empty())
        .unwrap();

    // Act
    let (status, body) = app.call(request).await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, expected_index());
}

#[tokio::test]
async fn root_ignores_request_headers_and_body() {
    let app = TestApp::new();
    let request = Request::builder()
        .method(Method::GET)
        .uri("/")
        .header("Accept", "text/plain")
        .header("X-Anything", "value")
        .body(Body::from("{\"name\": \"ignored\"}"))
        .unwrap();

    let (status, body) = app.call(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, expected_index());
    assert_eq!(app.appointment.attempts() + app.contact.attempts(), 0);
}

#[tokio::test]
async fn cors_preflight_is_allowed_from_any_origin() {
    let app = TestApp::new();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/contact-us")
        .header("Origin", "https://clinic.example")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
}
