//! API Integration Tests
//!
//! Drive the HTTP surface of a server backed by the in-memory store and the
//! recording transport. No external services are needed.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use std::time::Duration;

use integration_tests::{assert_error, assert_json, fixtures::*, TestServer};
use queue_core::{Marker, MarkerEvent, MarkerKind, VoteMarker};
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn message(response: reqwest::Response, status: StatusCode) -> String {
    let body: Value = assert_json(response, status).await.unwrap();
    body["message"].as_str().unwrap().to_string()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");

    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_health_ready_without_database() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");

    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["database"], "in_memory");
}

// ============================================================================
// Event Tests
// ============================================================================

#[tokio::test]
async fn test_submission_event_is_accepted() {
    let server = TestServer::start().await.unwrap();
    let event = server.harness.submission(20, ":blobwave:", "blobwave.png", 2048);

    let response = server
        .post("/api/v1/events/submissions", &event)
        .await
        .unwrap();
    assert_eq!(message(response, StatusCode::ACCEPTED).await, "Accepted as #1");

    let stored = server.harness.reload(1).await;
    assert_eq!(stored.emoji_name, "blobwave");
    assert!(stored.is_pending());
}

#[tokio::test]
async fn test_submission_event_rejected() {
    let server = TestServer::start().await.unwrap();
    let event = server.harness.submission(21, ":blob:", "blob.bmp", 2048);

    let response = server
        .post("/api/v1/events/submissions", &event)
        .await
        .unwrap();
    assert_eq!(
        message(response, StatusCode::ACCEPTED).await,
        "Rejected: BadFormat"
    );
}

#[tokio::test]
async fn test_malformed_event_body() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post("/api/v1/events/markers", &json!({ "kind": "added" }))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_BODY");
}

#[tokio::test]
async fn test_marker_events_ignored() {
    let server = TestServer::start().await.unwrap();
    let suggestion = server.harness.pending(22, "blobquiet").await;

    let mut event = server
        .harness
        .vote_event(&suggestion, 30, VoteMarker::Approve, MarkerKind::Added);
    event.marker = Marker::unicode("\u{1F44D}");
    let response = server.post("/api/v1/events/markers", &event).await.unwrap();
    assert_eq!(
        message(response, StatusCode::ACCEPTED).await,
        "Ignored: NotVoteMarker"
    );

    let event = server
        .harness
        .vote_event(&suggestion, BOT_ID, VoteMarker::Approve, MarkerKind::Added);
    let response = server.post("/api/v1/events/markers", &event).await.unwrap();
    assert_eq!(
        message(response, StatusCode::ACCEPTED).await,
        "Ignored: OwnMarker"
    );
}

#[tokio::test]
async fn test_marker_events_promote_at_threshold() {
    let server = TestServer::start().await.unwrap();
    let suggestion = server.harness.pending(23, "blobvote").await;

    let first = server
        .harness
        .vote_event(&suggestion, 100, VoteMarker::Approve, MarkerKind::Added);
    let response = server.post("/api/v1/events/markers", &first).await.unwrap();
    assert_eq!(
        message(response, StatusCode::ACCEPTED).await,
        "Recorded on #1 (\u{25B2} 1 / \u{25BC} 0)"
    );

    for user in 101..114 {
        let event = server
            .harness
            .vote_event(&suggestion, user, VoteMarker::Approve, MarkerKind::Added);
        let response = server.post("/api/v1/events/markers", &event).await.unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    let last = server
        .harness
        .vote_event(&suggestion, 114, VoteMarker::Approve, MarkerKind::Added);
    let response = server.post("/api/v1/events/markers", &last).await.unwrap();
    assert_eq!(
        message(response, StatusCode::ACCEPTED).await,
        "#1 moved to the approval queue"
    );

    let response = server.get("/api/v1/suggestions/1").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["state"], "public");
    assert_eq!(body["upvotes"], 0);
    assert_eq!(body["downvotes"], 0);
}

#[tokio::test]
async fn test_marker_event_resolves_confirmation() {
    let server = TestServer::start().await.unwrap();
    let pending = server.confirmations.register(sf(777), sf(99));

    let answer = MarkerEvent {
        kind: MarkerKind::Added,
        channel_id: sf(BOT_LOG),
        message_id: sf(777),
        user_id: sf(99),
        marker: Marker::unicode("\u{2705}"),
    };
    let response = server.post("/api/v1/events/markers", &answer).await.unwrap();
    assert_eq!(
        message(response, StatusCode::ACCEPTED).await,
        "Confirmation recorded"
    );

    assert!(pending.wait().await);
    assert!(server.confirmations.is_empty());
}

// ============================================================================
// Suggestion Tests
// ============================================================================

#[tokio::test]
async fn test_get_suggestion() {
    let server = TestServer::start().await.unwrap();
    server.harness.pending(24, "blobpeek").await;

    let response = server.get("/api/v1/suggestions/1").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["idx"], 1);
    assert_eq!(body["emoji_name"], "blobpeek");
    assert_eq!(body["user_id"], "24");
    assert_eq!(body["state"], "pending");
    assert!(body["status"]
        .as_str()
        .unwrap()
        .contains("In the private council queue"));
}

#[tokio::test]
async fn test_get_unknown_suggestion() {
    let server = TestServer::start().await.unwrap();

    let response = server.get("/api/v1/suggestions/42").await.unwrap();
    let code = assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(code, "UNKNOWN_SUGGESTION");
}

#[tokio::test]
async fn test_invalid_suggestion_index() {
    let server = TestServer::start().await.unwrap();

    for path in ["/api/v1/suggestions/abc", "/api/v1/suggestions/0"] {
        let response = server.get(path).await.unwrap();
        let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
        assert_eq!(code, "INVALID_PATH_PARAMETER");
    }
}

#[tokio::test]
async fn test_promote_suggestion() {
    let server = TestServer::start().await.unwrap();
    server.harness.pending(25, "blobpush").await;

    let response = server
        .post(
            "/api/v1/suggestions/1/promote",
            &json!({ "actor_id": "99", "reason": "staff pick" }),
        )
        .await
        .unwrap();
    assert_eq!(
        message(response, StatusCode::OK).await,
        "Successfully moved #1."
    );

    let stored = server.harness.reload(1).await;
    assert!(stored.is_public());
    assert_eq!(stored.forced_by, Some(sf(99)));
}

#[tokio::test]
async fn test_promotion_finishes_after_client_hangs_up() {
    let server = TestServer::start().await.unwrap();
    let pending = server.harness.pending(29, "blobslow").await;
    let council_message_id = pending.council_message_id.unwrap();
    server
        .harness
        .transport
        .set_delivery_delay(Duration::from_millis(150));

    let result = server
        .client
        .post(format!("{}/api/v1/suggestions/1/promote", server.base_url()))
        .timeout(Duration::from_millis(30))
        .json(&json!({ "actor_id": "99" }))
        .send()
        .await;
    assert!(result.is_err());

    let mut stored = server.harness.reload(1).await;
    for _ in 0..50 {
        if stored.is_public() && !server.harness.transport.has_resource(stored.emoji_id) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
        stored = server.harness.reload(1).await;
    }

    assert!(stored.is_public());
    assert_eq!(stored.forced_by, Some(sf(99)));
    assert!(server
        .harness
        .transport
        .was_deleted(COUNCIL_QUEUE, council_message_id));
    assert!(!server.harness.transport.has_resource(pending.emoji_id));
}

#[tokio::test]
async fn test_deny_suggestion_twice() {
    let server = TestServer::start().await.unwrap();
    server.harness.pending(26, "blobnope").await;
    let body = json!({ "actor_id": "99" });

    let response = server
        .post("/api/v1/suggestions/1/deny", &body)
        .await
        .unwrap();
    assert_eq!(
        message(response, StatusCode::OK).await,
        "Successfully denied #1."
    );

    let response = server
        .post("/api/v1/suggestions/1/deny", &body)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_TRANSITION");
}

#[tokio::test]
async fn test_transition_reason_too_long() {
    let server = TestServer::start().await.unwrap();
    server.harness.pending(27, "blobwordy").await;

    let response = server
        .post(
            "/api/v1/suggestions/1/promote",
            &json!({ "actor_id": "99", "reason": "x".repeat(600) }),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "VALIDATION_ERROR");
    assert!(server.harness.reload(1).await.is_pending());
}

#[tokio::test]
async fn test_list_suggestions() {
    let server = TestServer::start().await.unwrap();
    server.harness.pending(28, "blobone").await;
    server.harness.pending(29, "blobtwo").await;

    let response = server.get("/api/v1/suggestions?limit=5").await.unwrap();
    let table = message(response, StatusCode::OK).await;
    assert!(table.starts_with("```"));
    assert!(table.contains(":blobone:"));
    assert!(table.contains(":blobtwo:"));

    let response = server.get("/api/v1/suggestions?limit=0").await.unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "VALIDATION_ERROR");

    let response = server.get("/api/v1/suggestions?limit=many").await.unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_QUERY_PARAMETER");
}

#[tokio::test]
async fn test_revoke_suggestion() {
    let server = TestServer::start().await.unwrap();
    server.harness.pending(31, "blobmine").await;

    let response = server
        .post("/api/v1/suggestions/revoke", &json!({ "caller_id": "32", "idx": 1 }))
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "NOT_SUGGESTION_OWNER");

    let response = server
        .post("/api/v1/suggestions/revoke", &json!({ "caller_id": "31" }))
        .await
        .unwrap();
    assert_eq!(message(response, StatusCode::OK).await, "Revoked #1.");

    let stored = server.harness.reload(1).await;
    assert!(stored.is_denied());
    assert!(stored.revoked);
}

// ============================================================================
// Command Tests
// ============================================================================

#[tokio::test]
async fn test_comparison_with_too_many_options() {
    let server = TestServer::start().await.unwrap();
    let options: Vec<Value> = (1..=7)
        .map(|idx| json!({ "type": "suggestion", "idx": idx }))
        .collect();

    let response = server
        .post(
            "/api/v1/comparisons",
            &json!({ "actor_id": "99", "channel_id": "6", "options": options }),
        )
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "INVALID_COMPARISON");
    assert!(server.harness.transport.prompts().is_empty());
}

#[tokio::test]
async fn test_comparison_posted() {
    let server = TestServer::start().await.unwrap();
    let a = server.harness.public(33, "bloba").await;
    let b = server.harness.public(34, "blobb").await;

    let response = server
        .post(
            "/api/v1/comparisons",
            &json!({
                "actor_id": "99",
                "channel_id": "6",
                "options": [
                    { "type": "suggestion", "idx": a.idx },
                    { "type": "suggestion", "idx": b.idx },
                ],
            }),
        )
        .await
        .unwrap();
    assert_eq!(
        message(response, StatusCode::OK).await,
        format!("Posted comparison of #{}, #{}.", a.idx, b.idx)
    );
}

#[tokio::test]
async fn test_buffer_info() {
    let server = TestServer::start().await.unwrap();
    server.harness.transport.add_container("staging", 12);

    let response = server.get("/api/v1/buffer").await.unwrap();
    assert_eq!(
        message(response, StatusCode::OK).await,
        "Current buffer guild: staging (12/50 full)"
    );
}
