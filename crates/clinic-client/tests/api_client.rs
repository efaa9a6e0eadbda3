mod common;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use futures::future::join_all;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use clinic_client::router::RouteName;
use clinic_client::ApiError;

use common::TestClient;

fn echo_auth_backend() -> Router {
    Router::new().route(
        "/api/echo/",
        get(|headers: HeaderMap| async move {
            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(String::from);
            Json(json!({ "authorization": auth }))
        }),
    )
}

#[tokio::test]
async fn test_attaches_token_header() {
    let client = TestClient::with_token(echo_auth_backend(), Some("abc123")).await;

    let body = client.state.api.get_value("/echo/").await.unwrap();
    assert_eq!(body["authorization"], "Token abc123");
}

#[tokio::test]
async fn test_no_header_without_token() {
    let client = TestClient::new(echo_auth_backend()).await;

    let body = client.state.api.get_value("echo/").await.unwrap();
    assert_eq!(body["authorization"], Value::Null);
}

#[tokio::test]
async fn test_concurrent_unauthorized_redirect_once_each() {
    let app = Router::new().route(
        "/api/profile/",
        get(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "detail": "Invalid token." })),
            )
        }),
    );
    let mut client = TestClient::with_token(app, Some("stale")).await;
    let api = client.state.api.clone();

    let results = join_all((0..3).map(|_| api.get_value("/profile/"))).await;

    for result in results {
        assert_eq!(
            result.unwrap_err(),
            ApiError::Unauthorized {
                message: Some("Invalid token.".into())
            }
        );
    }
    assert_eq!(client.stored_token(), None);

    let redirects = client.drain_navigations();
    assert_eq!(redirects.len(), 3);
    assert!(redirects.iter().all(|n| n.route == RouteName::Login));
}

#[tokio::test]
async fn test_field_errors_keep_server_order() {
    let app = Router::new().route(
        "/api/echo/",
        get(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "school_id": ["This field is required."],
                    "password": ["Too short.", "Too common."]
                })),
            )
        }),
    );
    let client = TestClient::new(app).await;

    let err = client.state.api.get_value("/echo/").await.unwrap_err();
    match &err {
        ApiError::FieldErrors { status, fields } => {
            assert_eq!(*status, 400);
            assert_eq!(fields[0].0, "school_id");
            assert_eq!(fields[1].1.len(), 2);
        }
        other => panic!("expected field errors, got {other:?}"),
    }
    assert_eq!(err.user_message("Login failed"), "This field is required.");
}

#[tokio::test]
async fn test_general_error_and_empty_body() {
    let app = Router::new()
        .route(
            "/api/boom/",
            get(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Prediction service unavailable" })),
                )
            }),
        )
        .route("/api/gone/", get(|| async { StatusCode::NOT_FOUND }));
    let client = TestClient::new(app).await;

    let err = client.state.api.get_value("/boom/").await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.user_message("x"), "Prediction service unavailable");

    let err = client.state.api.get_value("/gone/").await.unwrap_err();
    assert_eq!(
        err,
        ApiError::General {
            status: 404,
            message: None
        }
    );
    assert_eq!(err.user_message("Not here"), "Not here");
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut client = TestClient::connect(&format!("http://{addr}/api"), Some("keep"));

    let err = client.state.api.get_value("/profile/").await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(client.stored_token().as_deref(), Some("keep"));
    assert!(client.drain_navigations().is_empty());
}
