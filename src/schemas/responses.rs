//! HTTP 响应体

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::user::{LearningPath, UserProfile};
use crate::core::{AgentResponse, SymbioteError};
use crate::services::{HistorySummary, PointsEntry, PointsSummary, Recommendations, TopicPerformance};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub user_profile: UserProfile,
    pub learning_path: LearningPath,
    pub welcome_message: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub session_id: String,
    pub agent_response: AgentResponse,
    pub points_summary: PointsSummary,
    pub message_count: u64,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointsResponse {
    pub session_id: String,
    pub points_summary: PointsSummary,
    pub points_history: Vec<PointsEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub session_id: String,
    pub history_summary: HistorySummary,
    pub recommendations: Recommendations,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceResponse {
    pub session_id: String,
    pub user_name: String,
    pub subject: String,
    pub topic_performance: BTreeMap<String, TopicPerformance>,
    pub weak_areas: Vec<String>,
    pub strong_areas: Vec<String>,
    pub total_interactions: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HintResponse {
    pub session_id: String,
    pub hint_penalty: u64,
    pub current_points: u64,
    /// 挑战不在本会话中时为 null
    pub hint: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeResponse {
    pub session_id: String,
    pub challenge_id: String,
    pub points_earned: u64,
    pub points_summary: PointsSummary,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupResponse {
    pub removed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

/// 统一错误体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub details: Option<Value>,
    pub timestamp: DateTime<Utc>,
}

impl From<&SymbioteError> for ErrorResponse {
    fn from(err: &SymbioteError) -> Self {
        let details = match err {
            SymbioteError::Agent { agent_type, .. } => Some(json!({ "agent_type": agent_type })),
            SymbioteError::Session {
                session_id: Some(id),
                ..
            } => Some(json!({ "session_id": id })),
            SymbioteError::SessionNotFound(id) => Some(json!({ "session_id": id })),
            SymbioteError::Validation { field: Some(f), .. } => Some(json!({ "field": f })),
            SymbioteError::AgentNotFound(t) => Some(json!({ "agent_type": t })),
            SymbioteError::Challenge { challenge_id, .. } => {
                Some(json!({ "challenge_id": challenge_id }))
            }
            _ => None,
        };
        Self {
            code: err.code(),
            message: err.message(),
            details,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_carries_details() {
        let body = ErrorResponse::from(&SymbioteError::validation("age", "Age must be between 5 and 100"));
        assert_eq!(body.code, "VALIDATION_ERROR");
        assert_eq!(body.message, "Age must be between 5 and 100");
        assert_eq!(body.details.unwrap()["field"], "age");

        let body = ErrorResponse::from(&SymbioteError::Registry("dup".into()));
        assert!(body.details.is_none());
    }
}
