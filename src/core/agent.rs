//! 智能体契约：类型枚举、统一响应、上下文快照与 Agent trait
//!
//! 四类智能体（Tutor / Peer / Provocateur / Teachable）都实现 Agent：
//! 同步处理一条用户输入，返回 AgentResponse；各自维护一份对话历史。

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::conversation::{ConversationHistory, ConversationMessage};
use super::error::Result;
use crate::schemas::{Challenge, UserProfile};

/// 智能体类型（封闭枚举，序列化为小写字符串）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentType {
    Tutor,
    Peer,
    Provocateur,
    Teachable,
}

impl AgentType {
    pub const ALL: [AgentType; 4] = [
        AgentType::Tutor,
        AgentType::Peer,
        AgentType::Provocateur,
        AgentType::Teachable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::Tutor => "tutor",
            AgentType::Peer => "peer",
            AgentType::Provocateur => "provocateur",
            AgentType::Teachable => "teachable",
        }
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 智能体的一次回复。产出后不再修改（会话流水线只会往 metadata 里追加 hint_penalty）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    pub message: String,
    pub agent_type: AgentType,
    pub points_awarded: u64,
    pub challenge: Option<Challenge>,
    pub hint: Option<String>,
    pub joke: Option<String>,
    pub next_agent: Option<AgentType>,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
    pub timestamp: DateTime<Utc>,
}

impl AgentResponse {
    pub fn new(message: impl Into<String>, agent_type: AgentType) -> Self {
        Self {
            message: message.into(),
            agent_type,
            points_awarded: 0,
            challenge: None,
            hint: None,
            joke: None,
            next_agent: None,
            metadata: HashMap::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_points(mut self, points: u64) -> Self {
        self.points_awarded = points;
        self
    }

    pub fn with_challenge(mut self, challenge: Challenge) -> Self {
        self.challenge = Some(challenge);
        self
    }

    pub fn with_joke(mut self, joke: impl Into<String>) -> Self {
        self.joke = Some(joke.into());
        self
    }

    pub fn with_metadata(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}

/// 上下文中扁平化的用户画像
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileContext {
    pub name: String,
    pub age: u32,
    pub education_level: String,
    pub subject: String,
    pub purpose: String,
}

impl From<&UserProfile> for ProfileContext {
    fn from(p: &UserProfile) -> Self {
        Self {
            name: p.name.clone(),
            age: p.age,
            education_level: p.education_level.as_str().to_string(),
            subject: p.subject.clone(),
            purpose: p.purpose.as_str().to_string(),
        }
    }
}

/// 每轮交给智能体的上下文快照
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentContext {
    pub user_profile: ProfileContext,
    pub conversation_count: u64,
    pub last_agent: Option<AgentType>,
    pub user_input: String,
}

/// 智能体 trait：类型、处理输入、描述信息；对话历史通过 conversation / conversation_mut 暴露
pub trait Agent: Send + Sync {
    fn agent_type(&self) -> AgentType;

    /// 处理一条用户输入。当前实现都是纯同步逻辑，没有挂起点
    fn process_input(&mut self, user_input: &str, context: &AgentContext) -> Result<AgentResponse>;

    /// 描述信息（name / type / description 及各自的内部计数）
    fn info(&self) -> Value;

    fn conversation(&self) -> &ConversationHistory;

    fn conversation_mut(&mut self) -> &mut ConversationHistory;

    fn add_to_history(&mut self, msg: ConversationMessage) {
        self.conversation_mut().push(msg);
    }

    fn history(&self) -> Vec<ConversationMessage> {
        self.conversation().snapshot()
    }

    fn clear_history(&mut self) {
        self.conversation_mut().clear();
    }
}

impl fmt::Debug for dyn Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Agent(type={})", self.agent_type())
    }
}
