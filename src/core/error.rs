//! 错误类型
//!
//! 所有错误统一为 SymbioteError：带人类可读的 message 与机器可读的 code（如 `AGENT_ERROR_TUTOR`）。
//! API 层据 code / 变体决定 HTTP 状态码。

use thiserror::Error;

use super::agent::AgentType;

/// 学习系统中可能出现的错误（智能体、会话、校验、注册表、挑战）
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SymbioteError {
    /// 智能体自身失败，带出错的智能体类型
    #[error("[AGENT_ERROR_{}] {message}", .agent_type.to_uppercase())]
    Agent { message: String, agent_type: String },

    /// 会话创建或更新失败
    #[error("[SESSION_ERROR] {message}")]
    Session {
        message: String,
        session_id: Option<String>,
    },

    #[error("[SESSION_ERROR] Session '{0}' not found")]
    SessionNotFound(String),

    /// 边界输入校验失败（在触碰任何状态之前抛出）
    #[error("[VALIDATION_ERROR] {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// 注册表重复注册 / 未注册（只应出现在启动装配阶段）
    #[error("[REGISTRY_ERROR] {0}")]
    Registry(String),

    /// 编排器选中的智能体没有存活实例（构造失败时才会出现）
    #[error("[SYMBIOTE_ERROR] Agent {0} not found")]
    AgentNotFound(AgentType),

    #[error("[CHALLENGE_ERROR] {message}")]
    Challenge {
        message: String,
        challenge_id: String,
    },
}

impl SymbioteError {
    pub fn agent(agent_type: AgentType, message: impl Into<String>) -> Self {
        Self::Agent {
            message: message.into(),
            agent_type: agent_type.as_str().to_string(),
        }
    }

    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.to_string()),
        }
    }

    /// 机器可读的错误码
    pub fn code(&self) -> String {
        match self {
            Self::Agent { agent_type, .. } => {
                format!("AGENT_ERROR_{}", agent_type.to_uppercase())
            }
            Self::Session { .. } | Self::SessionNotFound(_) => "SESSION_ERROR".to_string(),
            Self::Validation { .. } => "VALIDATION_ERROR".to_string(),
            Self::Registry(_) => "REGISTRY_ERROR".to_string(),
            Self::AgentNotFound(_) => "SYMBIOTE_ERROR".to_string(),
            Self::Challenge { .. } => "CHALLENGE_ERROR".to_string(),
        }
    }

    /// 不带 `[CODE]` 前缀的消息
    pub fn message(&self) -> String {
        match self {
            Self::Agent { message, .. }
            | Self::Session { message, .. }
            | Self::Validation { message, .. }
            | Self::Challenge { message, .. } => message.clone(),
            Self::Registry(message) => message.clone(),
            Self::SessionNotFound(id) => format!("Session '{id}' not found"),
            Self::AgentNotFound(t) => format!("Agent {t} not found"),
        }
    }
}

pub type Result<T> = std::result::Result<T, SymbioteError>;
