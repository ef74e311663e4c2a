//! HTTP 端到端测试：直接驱动 Router，不监听端口

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use symbiote::{router, AppConfig, AppState};

fn app() -> Router {
    let mut cfg = AppConfig::default();
    cfg.agents.seed = Some(7);
    router(Arc::new(AppState::new(cfg)))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_session(app: &Router, name: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/sessions/create",
        Some(json!({
            "name": name,
            "age": 20,
            "education_level": "beginner",
            "subject": "Algebra",
            "purpose": "learn",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["session_id"].as_str().unwrap().to_string()
}

async fn message(app: &Router, session_id: &str, text: &str, use_hint: bool) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/api/v1/chat/message",
        Some(json!({ "session_id": session_id, "message": text, "use_hint": use_hint })),
    )
    .await
}

#[tokio::test]
async fn test_root_and_health() {
    let app = app();
    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], "2.0.0");
    assert_eq!(body["status"], "running");
    assert_eq!(body["message"], "Welcome to Symbiote Learning App");
    assert!(body.get("docs").is_none());

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_create_session_response() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/sessions/create",
        Some(json!({
            "name": "Mary Jane",
            "age": 16,
            "education_level": "intermediate",
            "subject": "Chemistry",
            "purpose": "test_knowledge",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["session_id"].as_str().unwrap().starts_with("Mary_Jane_"));
    assert_eq!(body["welcome_message"], "Welcome, Mary Jane! Let's start your learning journey.");
    assert_eq!(body["status"], "Session created successfully");
    assert_eq!(body["user_profile"]["education_level"], "intermediate");
    assert_eq!(
        body["learning_path"]["phases"],
        json!(["exploration", "construction", "creation"])
    );
    assert_eq!(body["learning_path"]["current_phase"], 0);

    let session_id = body["session_id"].as_str().unwrap();
    let (status, info) = send(&app, "GET", &format!("/api/v1/sessions/{session_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(info["current_phase"], "exploration");
    assert_eq!(info["is_active"], true);
}

#[tokio::test]
async fn test_invalid_profiles_are_422() {
    let app = app();
    for body in [
        json!({"name": "Ada", "age": 3, "education_level": "beginner", "subject": "Algebra", "purpose": "learn"}),
        json!({"name": "Ada!", "age": 20, "education_level": "beginner", "subject": "Algebra", "purpose": "learn"}),
        json!({"name": "Ada", "age": 20, "education_level": "expert", "subject": "Algebra", "purpose": "learn"}),
        json!({"name": "Ada", "age": 20, "education_level": "beginner", "subject": "  ", "purpose": "learn"}),
    ] {
        let (status, err) = send(&app, "POST", "/api/v1/sessions/create", Some(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn test_unknown_session_is_404() {
    let app = app();
    let (status, err) = message(&app, "nobody_123", "hello", false).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["code"], "SESSION_ERROR");
    assert_eq!(err["details"]["session_id"], "nobody_123");

    let (status, _) = send(&app, "GET", "/api/v1/analytics/points/nobody_123", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "DELETE", "/api/v1/sessions/nobody_123", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blank_message_is_422() {
    let app = app();
    let session_id = create_session(&app, "Ada").await;
    let (status, err) = message(&app, &session_id, "   ", false).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(err["details"]["field"], "message");

    let (_, points) = send(&app, "GET", &format!("/api/v1/analytics/points/{session_id}"), None).await;
    assert_eq!(points["points_history"], json!([]));
}

#[tokio::test]
async fn test_tutor_turn_then_hint() {
    let app = app();
    let session_id = create_session(&app, "Ada").await;

    let (status, body) = message(&app, &session_id, "Why does this work?", false).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["agent_response"]["agent_type"], "tutor");
    assert_eq!(body["agent_response"]["points_awarded"], 5);
    assert_eq!(body["points_summary"]["current_points"], 6);
    assert_eq!(body["message_count"], 1);
    assert_eq!(body["status"], "Message processed successfully");

    let (status, hint) = send(
        &app,
        "POST",
        "/api/v1/chat/hint",
        Some(json!({ "session_id": session_id, "challenge_id": "challenge_0" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hint["hint_penalty"], 1);
    assert_eq!(hint["current_points"], 5);
    assert_eq!(hint["hint"], Value::Null);
    assert_eq!(hint["message"], "Hint requested. Points have been adjusted.");

    let (_, points) = send(&app, "GET", &format!("/api/v1/analytics/points/{session_id}"), None).await;
    assert_eq!(points["points_summary"]["current_points"], 5);
    assert_eq!(points["points_summary"]["total_points"], 6);
    assert_eq!(points["points_summary"]["level"], 1);
    let ledger = points["points_history"].as_array().unwrap();
    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger[0]["action"], "collaboration");
    assert_eq!(ledger[1]["reason"], "hint_used");

    let (_, history) = send(&app, "GET", &format!("/api/v1/analytics/history/{session_id}"), None).await;
    assert_eq!(history["history_summary"]["total_interactions"], 1);
    assert_eq!(history["recommendations"]["focus_on"], json!([]));

    let (_, perf) = send(&app, "GET", &format!("/api/v1/analytics/performance/{session_id}"), None).await;
    assert_eq!(perf["user_name"], "Ada");
    assert_eq!(perf["subject"], "Algebra");
    assert_eq!(perf["total_interactions"], 1);
    assert_eq!(perf["topic_performance"]["Algebra"]["total_points"], 6);
}

#[tokio::test]
async fn test_hint_flag_on_message() {
    let app = app();
    let session_id = create_session(&app, "Ada").await;
    let (_, body) = message(&app, &session_id, "why?", true).await;
    assert_eq!(body["agent_response"]["metadata"]["hint_penalty"], 1);
    assert_eq!(body["points_summary"]["current_points"], 5);
    assert_eq!(body["points_summary"]["total_points"], 6);
}

#[tokio::test]
async fn test_challenge_flow() {
    let app = app();
    let session_id = create_session(&app, "Ada").await;

    let (_, body) = message(&app, &session_id, "let's play a game", false).await;
    assert_eq!(body["agent_response"]["agent_type"], "provocateur");
    assert!(body["agent_response"]["joke"].is_string());
    let challenge_id = body["agent_response"]["challenge"]["challenge_id"]
        .as_str()
        .unwrap()
        .to_string();

    let (_, hint) = send(
        &app,
        "POST",
        "/api/v1/chat/hint",
        Some(json!({ "session_id": session_id, "challenge_id": challenge_id })),
    )
    .await;
    assert_eq!(hint["hint"], "Think about the core principles involved.");

    let answer = json!({ "session_id": session_id, "challenge_id": challenge_id, "answer": "first principles" });
    let (status, done) = send(&app, "POST", "/api/v1/chat/challenge", Some(answer.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["points_earned"], 60);
    assert_eq!(done["points_summary"]["current_points"], 60);

    let (status, err) = send(&app, "POST", "/api/v1/chat/challenge", Some(answer)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "CHALLENGE_ERROR");
}

#[tokio::test]
async fn test_close_and_cleanup() {
    let app = app();
    let session_id = create_session(&app, "Ada").await;

    let (status, body) = send(&app, "DELETE", &format!("/api/v1/sessions/{session_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Session closed successfully");

    let (_, info) = send(&app, "GET", &format!("/api/v1/sessions/{session_id}"), None).await;
    assert_eq!(info["is_active"], false);

    let (status, err) = message(&app, &session_id, "hello", false).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "SESSION_ERROR");

    let (status, err) = send(
        &app,
        "POST",
        "/api/v1/chat/hint",
        Some(json!({ "session_id": session_id, "challenge_id": "challenge_0" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "SESSION_ERROR");

    // 刚刚活动过，30 分钟超时内不会被清理
    let (status, body) = send(&app, "POST", "/api/v1/sessions/cleanup", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"], 0);
}

#[tokio::test]
async fn test_agents_info() {
    let app = app();
    let session_id = create_session(&app, "Ada").await;
    message(&app, &session_id, "how?", false).await;

    let (status, body) = send(&app, "GET", &format!("/api/v1/chat/agents/{session_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["orchestrator"]["conversation_count"], 1);
    assert_eq!(body["orchestrator"]["last_agent"], "tutor");
    assert_eq!(body["orchestrator"]["active_agents"].as_array().unwrap().len(), 4);
    assert_eq!(body["orchestrator"]["agents"]["tutor"]["questions_asked"], 1);
    assert_eq!(body["registry"]["total_types"], 4);
}

#[tokio::test]
async fn test_closed_session_rejects_hint_and_challenge() {
    let app = app();
    let session_id = create_session(&app, "Ada").await;
    let (_, body) = message(&app, &session_id, "give me a challenge", false).await;
    let challenge_id = body["agent_response"]["challenge"]["challenge_id"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, _) = send(&app, "DELETE", &format!("/api/v1/sessions/{session_id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, err) = send(
        &app,
        "POST",
        "/api/v1/chat/hint",
        Some(json!({ "session_id": session_id, "challenge_id": challenge_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "SESSION_ERROR");

    let answer = json!({ "session_id": session_id, "challenge_id": challenge_id, "answer": "first principles" });
    let (status, err) = send(&app, "POST", "/api/v1/chat/challenge", Some(answer)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "SESSION_ERROR");

    let (_, points) = send(&app, "GET", &format!("/api/v1/analytics/points/{session_id}"), None).await;
    assert_eq!(points["points_summary"]["current_points"], 0);
    assert_eq!(points["points_history"], json!([]));
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let app = app();
    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");

    let preflight = Request::builder()
        .method("OPTIONS")
        .uri("/api/v1/chat/message")
        .header("Origin", "http://localhost:3000")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(preflight).await.unwrap();
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    assert!(response.headers().contains_key("access-control-allow-methods"));
}
