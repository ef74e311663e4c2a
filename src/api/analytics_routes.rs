//! /api/v1/analytics

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use super::{ApiResult, AppState};
use crate::schemas::{HistoryResponse, PerformanceResponse, PointsResponse};
use crate::services::history::{DEFAULT_STRONG_THRESHOLD, DEFAULT_WEAK_THRESHOLD};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/points/:session_id", get(points))
        .route("/history/:session_id", get(history))
        .route("/performance/:session_id", get(performance))
}

/// 积分概要 + 最近 N 条流水
async fn points(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> ApiResult<PointsResponse> {
    let store = state.sessions.read().await;
    let tracker = store.get_session_or_raise(&session_id)?.points();
    Ok(Json(PointsResponse {
        points_summary: tracker.summary(),
        points_history: tracker.history(Some(state.config.points.history_limit)),
        session_id,
    }))
}

/// 先刷新强弱项缓存，再出概要，保证两者一致
async fn history(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> ApiResult<HistoryResponse> {
    let mut store = state.sessions.write().await;
    let tracker = store.get_session_or_raise_mut(&session_id)?.history_mut();
    let recommendations = tracker.recommendations();
    Ok(Json(HistoryResponse {
        history_summary: tracker.summary(),
        recommendations,
        session_id,
    }))
}

async fn performance(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> ApiResult<PerformanceResponse> {
    let mut store = state.sessions.write().await;
    let session = store.get_session_or_raise_mut(&session_id)?;
    let user_name = session.user_session().user_profile.name.clone();
    let subject = session.user_session().user_profile.subject.clone();

    let tracker = session.history_mut();
    let weak_areas = tracker.identify_weak_areas(DEFAULT_WEAK_THRESHOLD);
    let strong_areas = tracker.identify_strong_areas(DEFAULT_STRONG_THRESHOLD);
    Ok(Json(PerformanceResponse {
        session_id,
        user_name,
        subject,
        topic_performance: tracker.topic_performance().clone(),
        weak_areas,
        strong_areas,
        total_interactions: tracker.total_interactions(),
    }))
}
