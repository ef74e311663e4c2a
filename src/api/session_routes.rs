//! /api/v1/sessions

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;

use super::{parse_body, ApiResult, AppState};
use crate::schemas::{CleanupResponse, SessionResponse, StatusResponse, UserProfileRequest};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/create", post(create_session))
        .route("/cleanup", post(cleanup_sessions))
        .route("/:session_id", get(get_session).delete(close_session))
}

/// POST /create：校验画像并创建会话
async fn create_session(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<UserProfileRequest>, JsonRejection>,
) -> ApiResult<SessionResponse> {
    let profile = parse_body(payload)?.into_profile()?;

    let mut store = state.sessions.write().await;
    let session = store.create_session(profile)?.user_session();

    Ok(Json(SessionResponse {
        session_id: session.session_id.clone(),
        welcome_message: format!(
            "Welcome, {}! Let's start your learning journey.",
            session.user_profile.name
        ),
        user_profile: session.user_profile.clone(),
        learning_path: session.learning_path.clone(),
        status: "Session created successfully".to_string(),
    }))
}

async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> ApiResult<Value> {
    let store = state.sessions.read().await;
    Ok(Json(store.session_info(&session_id)?))
}

/// DELETE /:session_id：关闭（不删除）会话
async fn close_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> ApiResult<StatusResponse> {
    state.sessions.write().await.close_session(&session_id)?;
    Ok(Json(StatusResponse {
        status: "Session closed successfully".to_string(),
    }))
}

/// POST /cleanup：按配置的超时清理不活跃会话
async fn cleanup_sessions(State(state): State<Arc<AppState>>) -> ApiResult<CleanupResponse> {
    let timeout = state.config.session.inactivity_timeout();
    let removed = state.sessions.write().await.cleanup_inactive_sessions(timeout);
    Ok(Json(CleanupResponse { removed }))
}
