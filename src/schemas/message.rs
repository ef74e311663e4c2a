//! 会话消息与学习挑战

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{AgentType, Result, Role, SymbioteError};

pub const MESSAGE_MAX_CHARS: usize = 2000;

/// 会话记录中的一条消息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// 仅 assistant 消息带有
    pub agent_type: Option<AgentType>,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            agent_type: None,
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>, agent_type: AgentType) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            agent_type: Some(agent_type),
            timestamp: Utc::now(),
        }
    }
}

/// 用户消息校验：原文不超过 2000 字符，trim 后非空；返回 trim 后的文本
pub fn validate_message(text: &str) -> Result<String> {
    if text.chars().count() > MESSAGE_MAX_CHARS {
        return Err(SymbioteError::validation(
            "message",
            format!("Message must be at most {MESSAGE_MAX_CHARS} characters"),
        ));
    }
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SymbioteError::validation(
            "message",
            "Message cannot be empty or whitespace only",
        ));
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// 学习挑战（由 Provocateur 生成，完成后兑现 points_value）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    pub challenge_id: String,
    pub question: String,
    pub correct_answer: Option<String>,
    pub hint: String,
    pub difficulty: Difficulty,
    /// 5..=100
    pub points_value: u64,
    pub fun_fact: Option<String>,
    pub agent_type: AgentType,
    pub created_at: DateTime<Utc>,
}

impl Challenge {
    pub const MIN_POINTS: u64 = 5;
    pub const MAX_POINTS: u64 = 100;

    /// points_value 会被夹到 [5, 100]
    pub fn new(
        challenge_id: impl Into<String>,
        question: impl Into<String>,
        hint: impl Into<String>,
        difficulty: Difficulty,
        points_value: u64,
        agent_type: AgentType,
    ) -> Self {
        Self {
            challenge_id: challenge_id.into(),
            question: question.into(),
            correct_answer: None,
            hint: hint.into(),
            difficulty,
            points_value: points_value.clamp(Self::MIN_POINTS, Self::MAX_POINTS),
            fun_fact: None,
            agent_type,
            created_at: Utc::now(),
        }
    }
}
