use axum::Router;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, Method};
use axum::response::{AppendHeaders, IntoResponse};
use axum::routing::post;
use serde_json::json;

use super::*;
use crate::state::test_helpers::{
    TEST_SECRET, body_json, request, serve_backend, set_cookie, set_cookies, signed_token, test_app_state,
};

fn admin_json() -> serde_json::Value {
    json!({
        "id": 1,
        "username": "root",
        "email": "root@example.com",
        "first_name": "Root",
        "created_at": "2025-01-01T00:00:00",
        "updated_at": "2025-01-01T00:00:00",
        "role": "ADMIN"
    })
}

#[tokio::test]
async fn login_sets_access_cookie_and_relays_refresh_cookie() {
    let token = signed_token(TEST_SECRET, 1, "ADMIN", 600);
    let issued = token.clone();
    let backend = serve_backend(Router::new().route(
        "/auth/login",
        post(move || {
            let issued = issued.clone();
            async move {
                (
                    AppendHeaders([(SET_COOKIE, "refresh_token=r-new; HttpOnly; Path=/")]),
                    axum::Json(json!({ "access_token": issued, "user": admin_json() })),
                )
            }
        }),
    ))
    .await;

    let response = request(
        test_app_state(&backend),
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": "root", "password": "pw" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let access = set_cookie(&response, "access_token").expect("access cookie");
    assert!(access.starts_with(&format!("access_token={token}")), "{access}");
    assert_eq!(
        set_cookie(&response, "refresh_token").as_deref(),
        Some("refresh_token=r-new; HttpOnly; Path=/")
    );

    let body = body_json(response).await;
    assert_eq!(body["redirect"], "/dashboard");
    assert_eq!(body["notice"]["level"], "success");
    assert_eq!(body["user"]["username"], "root");
}

#[tokio::test]
async fn rejected_login_keeps_user_on_form() {
    let backend = serve_backend(Router::new().route(
        "/auth/login",
        post(|| async { (StatusCode::UNAUTHORIZED, axum::Json(json!({"detail": "Incorrect username or password"}))) }),
    ))
    .await;

    let response = request(
        test_app_state(&backend),
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": "root", "password": "wrong" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookies(&response).is_empty());
    let body = body_json(response).await;
    assert!(body["redirect"].is_null());
    assert_eq!(body["notice"]["level"], "error");
    assert_eq!(body["notice"]["message"], "Invalid credentials");
}

#[tokio::test]
async fn blank_credentials_are_rejected_locally() {
    let response = request(
        test_app_state("http://127.0.0.1:9"),
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": " ", "password": "pw" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["notice"]["message"], "Username is required");
}

#[tokio::test]
async fn logout_clears_access_cookie_and_forwards_refresh_cookie() {
    let backend = serve_backend(Router::new().route(
        "/auth/logout",
        post(|headers: HeaderMap| async move {
            let cookie = headers
                .get("cookie")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_owned();
            if cookie == "refresh_token=r1" {
                (
                    AppendHeaders([(SET_COOKIE, "refresh_token=; Max-Age=0; Path=/")]),
                    axum::Json(json!({"message": "ok"})),
                )
                    .into_response()
            } else {
                StatusCode::BAD_REQUEST.into_response()
            }
        }),
    ))
    .await;

    let token = signed_token(TEST_SECRET, 1, "ADMIN", 600);
    let cookies = format!("access_token={token}; refresh_token=r1");
    let response = request(test_app_state(&backend), Method::POST, "/api/auth/logout", Some(&cookies), None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let access = set_cookie(&response, "access_token").expect("access cookie cleared");
    assert!(access.contains("Max-Age=0"), "{access}");
    assert_eq!(
        set_cookie(&response, "refresh_token").as_deref(),
        Some("refresh_token=; Max-Age=0; Path=/")
    );

    let body = body_json(response).await;
    assert_eq!(body["redirect"], "/login");
    assert_eq!(body["notice"]["message"], "Signed out");
}

#[tokio::test]
async fn failed_logout_still_signs_out_locally() {
    let backend = serve_backend(Router::new().route(
        "/auth/logout",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    ))
    .await;

    let token = signed_token(TEST_SECRET, 1, "ADMIN", 600);
    let cookies = format!("access_token={token}; refresh_token=r1");
    let response = request(test_app_state(&backend), Method::POST, "/api/auth/logout", Some(&cookies), None).await;

    assert!(set_cookie(&response, "access_token").is_some_and(|c| c.contains("Max-Age=0")));
    let body = body_json(response).await;
    assert_eq!(body["redirect"], "/login");
    assert_eq!(body["notice"]["level"], "error");
    assert_eq!(body["notice"]["message"], "Sign-out failed");
}
