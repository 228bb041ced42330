use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::RawQuery;
use axum::http::Method;
use axum::routing::get;

use super::*;
use crate::state::test_helpers::{TEST_SECRET, body_json, request, serve_backend, signed_token, test_app_state};

fn cookies(id: i64, role: &str) -> String {
    format!("access_token={}; refresh_token=r1", signed_token(TEST_SECRET, id, role, 600))
}

fn empty_page() -> serde_json::Value {
    json!({ "items": [], "total": 0, "page": 1, "page_size": 20 })
}

#[tokio::test]
async fn page_view_carries_session_and_ready_data() {
    let backend = serve_backend(Router::new().route("/admin/users", get(|| async { Json(empty_page()) }))).await;

    let response = request(test_app_state(&backend), Method::GET, "/dashboard/users", Some(&cookies(3, "ADMIN")), None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["page"], "/dashboard/users");
    assert_eq!(body["session"]["subject_id"], 3);
    assert_eq!(body["data"]["status"], "ready");
    assert_eq!(body["data"]["data"]["total"], 0);
}

#[tokio::test]
async fn failed_read_renders_inline_error() {
    let backend = serve_backend(Router::new().route(
        "/admin/users",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"detail": "Database unavailable"}))) }),
    ))
    .await;

    let response = request(test_app_state(&backend), Method::GET, "/dashboard/users", Some(&cookies(3, "ADMIN")), None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "error");
    assert_eq!(body["data"]["message"], "Database unavailable");
}

#[tokio::test]
async fn partner_lists_are_restricted_to_the_partner() {
    let seen = Arc::new(Mutex::new(None::<String>));
    let captured = seen.clone();
    let backend = serve_backend(Router::new().route(
        "/admin/payments",
        get(move |RawQuery(query): RawQuery| {
            let captured = captured.clone();
            async move {
                *captured.lock().unwrap() = query;
                Json(empty_page())
            }
        }),
    ))
    .await;

    let response = request(
        test_app_state(&backend),
        Method::GET,
        "/profile/payments?page=2&partner_id=99",
        Some(&cookies(5, "PARTNER")),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let query = seen.lock().unwrap().clone().expect("backend called");
    assert!(query.contains("page=2"), "{query}");
    assert!(query.contains("partner_id=5"), "{query}");
    assert!(!query.contains("99"), "{query}");
}

#[tokio::test]
async fn repeated_views_reuse_cached_reads() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let backend = serve_backend(Router::new().route(
        "/admin/users",
        get(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Json(empty_page())
            }
        }),
    ))
    .await;

    let state = test_app_state(&backend);
    let admin = cookies(3, "ADMIN");
    for _ in 0..2 {
        let response = request(state.clone(), Method::GET, "/dashboard/users", Some(&admin), None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    let other = request(state.clone(), Method::GET, "/dashboard/users?page=2", Some(&admin), None).await;
    assert_eq!(other.status(), StatusCode::OK);
    assert_eq!(hits.load(Ordering::SeqCst), 2);

    state.queries.invalidate(resource::USERS);
    request(state, Method::GET, "/dashboard/users", Some(&admin), None).await;
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn partner_home_combines_profile_and_statistics() {
    let backend = serve_backend(
        Router::new()
            .route(
                "/admin/profile",
                get(|| async {
                    Json(json!({
                        "id": 5,
                        "username": "p5",
                        "email": "p5@example.com",
                        "first_name": "Pat",
                        "created_at": "2025-01-01T00:00:00",
                        "updated_at": "2025-01-01T00:00:00",
                        "role": "PARTNER",
                        "partner_code": "P5"
                    }))
                }),
            )
            .route(
                "/statistics/partner",
                get(|| async { (StatusCode::BAD_GATEWAY, Json(json!({"message": "Stats offline"}))) }),
            ),
    )
    .await;

    let response = request(test_app_state(&backend), Method::GET, "/profile", Some(&cookies(5, "PARTNER")), None).await;

    let body = body_json(response).await;
    assert_eq!(body["data"]["profile"]["status"], "ready");
    assert_eq!(body["data"]["profile"]["data"]["partner_code"], "P5");
    assert_eq!(body["data"]["statistics"]["status"], "error");
    assert_eq!(body["data"]["statistics"]["message"], "Stats offline");
}

fn withdrawal_json(id: i64, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "partner_id": 5,
        "stars_amount": 100.0,
        "ton_stars_rate": 0.01,
        "ton_amount": 1.0,
        "ton_wallet_address": "UQabc",
        "status": status,
        "ton_transaction_hash": "0xabc",
        "created_at": "2025-01-01T00:00:00",
        "updated_at": "2025-01-01T00:00:00"
    })
}

#[tokio::test]
async fn payout_changes_refresh_statistics_views() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let backend = serve_backend(
        Router::new()
            .route(
                "/statistics/dashboard",
                get(move || {
                    let counter = counter.clone();
                    async move {
                        let total = counter.fetch_add(1, Ordering::SeqCst) + 1;
                        Json(json!({
                            "total_revenue": 10.0,
                            "total_withdrawn_to_partners": 2.0,
                            "net_profit": 8.0,
                            "new_users_last_30_days": 3,
                            "total_users": total
                        }))
                    }
                }),
            )
            .route(
                "/withdrawals/{id}",
                axum::routing::put(|| async { Json(withdrawal_json(7, "COMPLETED")) }),
            )
            .route(
                "/withdrawals/{id}/cancel",
                axum::routing::post(|| async { StatusCode::NO_CONTENT }),
            ),
    )
    .await;

    let state = test_app_state(&backend);
    let admin = cookies(1, "ADMIN");
    let dashboard = |state: AppState| {
        let admin = admin.clone();
        async move {
            let response = request(state, Method::GET, "/dashboard", Some(&admin), None).await;
            body_json(response).await["data"]["data"]["total_users"].clone()
        }
    };

    let first = dashboard(state.clone()).await;
    let completed = request(
        state.clone(),
        Method::PUT,
        "/api/withdrawals/7",
        Some(&admin),
        Some(json!({ "status": "COMPLETED", "ton_transaction_hash": "0xabc" })),
    )
    .await;
    assert_eq!(completed.status(), StatusCode::OK);
    let second = dashboard(state.clone()).await;
    assert_ne!(first, second);

    let cancelled = request(state.clone(), Method::POST, "/api/withdrawals/8/cancel", Some(&admin), None).await;
    assert_eq!(cancelled.status(), StatusCode::NO_CONTENT);
    let third = dashboard(state).await;
    assert_ne!(second, third);
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}
