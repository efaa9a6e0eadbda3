mod common;

use std::collections::HashMap;
use std::time::Duration;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use uuid::Uuid;

use clinic_shared::followup::{FollowUpResponse, FollowUpReview, FollowUpStatus, Outcome};

use common::{followup_json, TestClient};

const FU_1: &str = "a1a1a1a1-3333-4c3c-8c3c-000000000001";
const FU_2: &str = "a1a1a1a1-3333-4c3c-8c3c-000000000002";
const FU_3: &str = "a1a1a1a1-3333-4c3c-8c3c-000000000003";

fn backend() -> Router {
    Router::new()
        .route(
            "/api/followups/",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let mut list = vec![
                    followup_json(FU_1, "pending", true),
                    followup_json(FU_3, "completed", false),
                ];
                if let Some(status) = params.get("status") {
                    list.retain(|f| f["status"] == status.as_str());
                }
                Json(json!({ "followups": list }))
            }),
        )
        .route(
            "/api/followups/pending/",
            get(|| async {
                Json(json!([
                    followup_json(FU_1, "pending", true),
                    followup_json(FU_2, "pending", false)
                ]))
            }),
        )
        .route(
            "/api/followups/:id/respond/",
            post(|Path(id): Path<String>| async move {
                let mut followup = followup_json(&id, "completed", false);
                followup["outcome"] = json!("improved");
                Json(json!({ "message": "Response recorded", "followup": followup }))
            }),
        )
        .route(
            "/api/followups/needs-review/",
            get(|| async { Json(json!({ "followups": [followup_json(FU_3, "completed", false)] })) }),
        )
        .route(
            "/api/followups/:id/review/",
            post(|Path(id): Path<String>| async move {
                let mut followup = followup_json(&id, "completed", false);
                followup["review_notes"] = json!("Come in on Monday");
                followup["requires_appointment"] = json!(true);
                Json(json!({ "followup": followup }))
            }),
        )
}

#[tokio::test]
async fn test_pending_partitions_into_overdue_and_upcoming() {
    let client = TestClient::new(backend()).await;
    let store = &client.state.followups;

    store.fetch_pending_follow_ups().await;

    assert_eq!(store.total_pending(), 2);
    assert_eq!(store.total_overdue(), 1);
    assert_eq!(store.overdue()[0].id, Uuid::parse_str(FU_1).unwrap());
    assert_eq!(store.upcoming()[0].id, Uuid::parse_str(FU_2).unwrap());
}

#[tokio::test]
async fn test_status_filter_is_sent_to_server() {
    let client = TestClient::new(backend()).await;
    let store = &client.state.followups;

    store.fetch_follow_ups(Some(FollowUpStatus::Completed)).await;
    assert_eq!(store.follow_ups().len(), 1);
    assert_eq!(store.completed().len(), 1);

    store.fetch_follow_ups(None).await;
    assert_eq!(store.follow_ups().len(), 2);
}

#[tokio::test]
async fn test_respond_moves_followup_out_of_pending() {
    let client = TestClient::new(backend()).await;
    let store = &client.state.followups;
    let id = Uuid::parse_str(FU_1).unwrap();

    store.fetch_follow_ups(None).await;
    store.fetch_pending_follow_ups().await;

    let response = FollowUpResponse {
        outcome: Outcome::Improved,
        notes: Some("Fever is gone".into()),
        still_experiencing_symptoms: false,
        new_symptoms: Vec::new(),
    };
    let updated = store.respond_to_follow_up(id, &response).await.unwrap();

    assert_eq!(updated.outcome, Some(Outcome::Improved));
    assert!(store.pending().iter().all(|f| f.id != id));
    let matches: Vec<_> = store.follow_ups().into_iter().filter(|f| f.id == id).collect();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].status, FollowUpStatus::Completed);
    assert_eq!(store.total_overdue(), 0);
}

#[tokio::test]
async fn test_review_clears_queue_entry() {
    let client = TestClient::new(backend()).await;
    let store = &client.state.followups;
    let id = Uuid::parse_str(FU_3).unwrap();

    store.fetch_needs_review().await;
    assert_eq!(store.needs_review().len(), 1);

    let review = FollowUpReview {
        review_notes: "Come in on Monday".into(),
        requires_appointment: true,
    };
    store.review_follow_up(id, &review).await.unwrap();

    assert!(store.needs_review().is_empty());
    let reviewed = store.follow_ups();
    assert_eq!(reviewed.len(), 1);
    assert!(reviewed[0].requires_appointment);
}

#[tokio::test]
async fn test_failed_response_keeps_pending_list() {
    let app = Router::new()
        .route(
            "/api/followups/pending/",
            get(|| async {
                Json(json!([
                    followup_json(FU_1, "pending", true),
                    followup_json(FU_2, "pending", false)
                ]))
            }),
        )
        .route(
            "/api/followups/:id/respond/",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Follow-up already completed" })),
                )
            }),
        );
    let client = TestClient::new(app).await;
    let store = &client.state.followups;

    store.fetch_pending_follow_ups().await;
    let response = FollowUpResponse {
        outcome: Outcome::Same,
        notes: None,
        still_experiencing_symptoms: true,
        new_symptoms: vec!["cough".into()],
    };
    let result = store
        .respond_to_follow_up(Uuid::parse_str(FU_2).unwrap(), &response)
        .await;

    assert!(result.is_err());
    assert_eq!(store.total_pending(), 2);
    assert_eq!(store.error().as_deref(), Some("Follow-up already completed"));
}

#[tokio::test]
async fn test_answer_survives_slow_pending_fetch() {
    let app = Router::new()
        .route(
            "/api/followups/pending/",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(300)).await;
                Json(json!([
                    followup_json(FU_1, "pending", true),
                    followup_json(FU_2, "pending", false)
                ]))
            }),
        )
        .route(
            "/api/followups/:id/respond/",
            post(|Path(id): Path<String>| async move {
                Json(json!({ "followup": followup_json(&id, "completed", false) }))
            }),
        );
    let client = TestClient::new(app).await;
    let store = &client.state.followups;
    let id = Uuid::parse_str(FU_1).unwrap();

    let response = FollowUpResponse {
        outcome: Outcome::Improved,
        notes: None,
        still_experiencing_symptoms: false,
        new_symptoms: Vec::new(),
    };
    tokio::join!(store.fetch_pending_follow_ups(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        store.respond_to_follow_up(id, &response).await.unwrap();
    });

    // The list fetched before the answer landed is discarded.
    assert!(store.pending().iter().all(|f| f.id != id));
    assert_eq!(store.total_overdue(), 0);
    assert_eq!(store.completed().len(), 1);
    assert!(!store.loading());
}
