//! 用户画像与学习会话

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{Result, SymbioteError};

/// 学习路径的三个阶段（Tutor 与会话共用）
pub const LEARNING_PHASES: [&str; 3] = ["exploration", "construction", "creation"];

pub const NAME_MAX_CHARS: usize = 100;
pub const SUBJECT_MAX_CHARS: usize = 200;
pub const MIN_AGE: u32 = 5;
pub const MAX_AGE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl EducationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EducationLevel::Beginner => "beginner",
            EducationLevel::Intermediate => "intermediate",
            EducationLevel::Advanced => "advanced",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningPurpose {
    Learn,
    TestKnowledge,
}

impl LearningPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            LearningPurpose::Learn => "learn",
            LearningPurpose::TestKnowledge => "test_knowledge",
        }
    }
}

/// 用户画像。只能通过 `UserProfile::new` 构造，构造即校验
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub age: u32,
    pub education_level: EducationLevel,
    pub subject: String,
    pub purpose: LearningPurpose,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(
        name: &str,
        age: u32,
        education_level: EducationLevel,
        subject: &str,
        purpose: LearningPurpose,
    ) -> Result<Self> {
        let name = validate_name(name)?;
        validate_age(age)?;
        let subject = validate_subject(subject)?;
        Ok(Self {
            name,
            age,
            education_level,
            subject,
            purpose,
            created_at: Utc::now(),
        })
    }
}

/// 名字：1..=100 字符，去掉空格和连字符后必须非空且全为字母数字；返回 trim 后的名字
pub fn validate_name(name: &str) -> Result<String> {
    let len = name.chars().count();
    if len == 0 || len > NAME_MAX_CHARS {
        return Err(SymbioteError::validation(
            "name",
            format!("Name must be between 1 and {NAME_MAX_CHARS} characters"),
        ));
    }
    let mut core = name.chars().filter(|c| *c != ' ' && *c != '-').peekable();
    if core.peek().is_none() || !core.all(char::is_alphanumeric) {
        return Err(SymbioteError::validation(
            "name",
            "Name must contain only alphanumeric characters, spaces, or hyphens",
        ));
    }
    Ok(name.trim().to_string())
}

pub fn validate_age(age: u32) -> Result<()> {
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(SymbioteError::validation(
            "age",
            format!("Age must be between {MIN_AGE} and {MAX_AGE}"),
        ));
    }
    Ok(())
}

pub fn validate_subject(subject: &str) -> Result<String> {
    let len = subject.chars().count();
    if subject.trim().is_empty() || len > SUBJECT_MAX_CHARS {
        return Err(SymbioteError::validation(
            "subject",
            format!("Subject must be between 1 and {SUBJECT_MAX_CHARS} characters"),
        ));
    }
    Ok(subject.to_string())
}

/// 学习路径：阶段列表 + 当前指针
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningPath {
    pub phases: Vec<String>,
    pub current_phase: usize,
}

impl Default for LearningPath {
    fn default() -> Self {
        Self {
            phases: LEARNING_PHASES.iter().map(|p| p.to_string()).collect(),
            current_phase: 0,
        }
    }
}

impl LearningPath {
    pub fn current(&self) -> &str {
        self.phases
            .get(self.current_phase)
            .map(String::as_str)
            .unwrap_or(LEARNING_PHASES[0])
    }

    /// 把指针移动到指定阶段；未知阶段名返回 false 且不移动
    pub fn move_to(&mut self, phase: &str) -> bool {
        match self.phases.iter().position(|p| p == phase) {
            Some(idx) => {
                self.current_phase = idx;
                true
            }
            None => false,
        }
    }
}

/// 学习会话：用户画像 + 生命周期元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSession {
    pub session_id: String,
    pub user_profile: UserProfile,
    pub current_phase: String,
    pub current_points: u64,
    pub total_points: u64,
    pub learning_path: LearningPath,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub is_active: bool,
}

impl UserSession {
    pub fn new(session_id: String, user_profile: UserProfile) -> Self {
        let now = Utc::now();
        let learning_path = LearningPath::default();
        Self {
            session_id,
            user_profile,
            current_phase: learning_path.current().to_string(),
            current_points: 0,
            total_points: 0,
            learning_path,
            created_at: now,
            last_activity: now,
            is_active: true,
        }
    }

    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_rules() {
        assert_eq!(validate_name("Ada").unwrap(), "Ada");
        assert_eq!(validate_name("Mary-Jane Smith ").unwrap(), "Mary-Jane Smith");
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name("--").is_err());
        assert!(validate_name("Robert'); DROP").is_err());
        assert!(validate_name(&"a".repeat(101)).is_err());
        assert!(validate_name(&"a".repeat(100)).is_ok());
    }

    #[test]
    fn test_age_bounds() {
        assert!(validate_age(4).is_err());
        assert!(validate_age(5).is_ok());
        assert!(validate_age(100).is_ok());
        assert!(validate_age(101).is_err());
    }

    #[test]
    fn test_validation_error_names_field() {
        let err = UserProfile::new(
            "Ada",
            3,
            EducationLevel::Beginner,
            "Algebra",
            LearningPurpose::Learn,
        )
        .unwrap_err();
        assert!(matches!(err, SymbioteError::Validation { field: Some(ref f), .. } if f == "age"));
    }

    #[test]
    fn test_new_session_starts_in_exploration() {
        let profile = UserProfile::new(
            "Ada",
            20,
            EducationLevel::Beginner,
            "Algebra",
            LearningPurpose::Learn,
        )
        .unwrap();
        let session = UserSession::new("s1".to_string(), profile);
        assert_eq!(session.current_phase, "exploration");
        assert_eq!(session.learning_path.phases.len(), 3);
        assert_eq!(session.current_points, 0);
        assert!(session.is_active);
    }

    #[test]
    fn test_learning_path_move_to() {
        let mut path = LearningPath::default();
        assert!(path.move_to("creation"));
        assert_eq!(path.current_phase, 2);
        assert!(!path.move_to("mastery"));
        assert_eq!(path.current(), "creation");
    }
}
