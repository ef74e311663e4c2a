//! HTTP 请求体
//!
//! 结构由 serde 保证，字段约束在 `validate` / `into_profile` 中检查，先于任何状态变更。

use serde::Deserialize;

use super::message::validate_message;
use super::user::{EducationLevel, LearningPurpose, UserProfile};
use crate::core::{Result, SymbioteError};

fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SymbioteError::validation(field, format!("{field} cannot be empty")));
    }
    Ok(())
}

/// POST /api/v1/sessions/create
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfileRequest {
    pub name: String,
    /// 有符号，负数也走校验错误而不是反序列化错误
    pub age: i64,
    pub education_level: EducationLevel,
    pub subject: String,
    pub purpose: LearningPurpose,
}

impl UserProfileRequest {
    pub fn into_profile(self) -> Result<UserProfile> {
        let age = u32::try_from(self.age)
            .map_err(|_| SymbioteError::validation("age", "Age must be between 5 and 100"))?;
        UserProfile::new(
            &self.name,
            age,
            self.education_level,
            &self.subject,
            self.purpose,
        )
    }
}

/// POST /api/v1/chat/message
#[derive(Debug, Clone, Deserialize)]
pub struct UserMessageRequest {
    pub session_id: String,
    pub message: String,
    #[serde(default)]
    pub use_hint: bool,
}

impl UserMessageRequest {
    pub fn validate(&self) -> Result<()> {
        require_non_empty("session_id", &self.session_id)?;
        validate_message(&self.message)?;
        Ok(())
    }
}

/// POST /api/v1/chat/hint
#[derive(Debug, Clone, Deserialize)]
pub struct HintRequest {
    pub session_id: String,
    pub challenge_id: String,
}

impl HintRequest {
    pub fn validate(&self) -> Result<()> {
        require_non_empty("session_id", &self.session_id)?;
        require_non_empty("challenge_id", &self.challenge_id)
    }
}

/// POST /api/v1/chat/challenge
#[derive(Debug, Clone, Deserialize)]
pub struct ChallengeAnswerRequest {
    pub session_id: String,
    pub challenge_id: String,
    pub answer: String,
}

impl ChallengeAnswerRequest {
    pub fn validate(&self) -> Result<()> {
        require_non_empty("session_id", &self.session_id)?;
        require_non_empty("challenge_id", &self.challenge_id)?;
        require_non_empty("answer", &self.answer)
    }
}
