//! /api/v1/chat

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use super::{parse_body, ApiResult, AppState};
use crate::schemas::{
    ChallengeAnswerRequest, ChallengeResponse, HintRequest, HintResponse, MessageResponse, UserMessageRequest,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/message", post(send_message))
        .route("/hint", post(request_hint))
        .route("/challenge", post(complete_challenge))
        .route("/agents/:session_id", get(agents_info))
}

/// POST /message：跑一轮对话
async fn send_message(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<UserMessageRequest>, JsonRejection>,
) -> ApiResult<MessageResponse> {
    let req = parse_body(payload)?;
    req.validate()?;

    let mut store = state.sessions.write().await;
    let session = store.get_session_or_raise_mut(&req.session_id)?;
    let agent_response = session.handle_message(&req.message, req.use_hint)?;

    Ok(Json(MessageResponse {
        session_id: req.session_id,
        agent_response,
        points_summary: session.points().summary(),
        message_count: session.message_count(),
        status: "Message processed successfully".to_string(),
    }))
}

/// POST /hint：扣分并返回挑战提示
async fn request_hint(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<HintRequest>, JsonRejection>,
) -> ApiResult<HintResponse> {
    let req = parse_body(payload)?;
    req.validate()?;

    let mut store = state.sessions.write().await;
    let session = store.get_session_or_raise_mut(&req.session_id)?;
    let (hint_penalty, hint) = session.request_hint(&req.challenge_id)?;

    Ok(Json(HintResponse {
        session_id: req.session_id,
        hint_penalty,
        current_points: session.points().current_points(),
        hint,
        message: "Hint requested. Points have been adjusted.".to_string(),
    }))
}

/// POST /challenge：提交答案兑现挑战
async fn complete_challenge(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChallengeAnswerRequest>, JsonRejection>,
) -> ApiResult<ChallengeResponse> {
    let req = parse_body(payload)?;
    req.validate()?;

    let mut store = state.sessions.write().await;
    let session = store.get_session_or_raise_mut(&req.session_id)?;
    let points_earned = session.complete_challenge(&req.challenge_id, &req.answer)?;

    Ok(Json(ChallengeResponse {
        session_id: req.session_id,
        challenge_id: req.challenge_id,
        points_earned,
        points_summary: session.points().summary(),
        message: format!("Challenge completed! You earned {points_earned} points."),
    }))
}

/// GET /agents/:session_id：编排器与各智能体的状态
async fn agents_info(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> ApiResult<Value> {
    let store = state.sessions.read().await;
    let session = store.get_session_or_raise(&session_id)?;
    Ok(Json(json!({
        "session_id": session_id,
        "orchestrator": session.orchestrator().info(),
        "registry": state.registry.info(),
    })))
}
