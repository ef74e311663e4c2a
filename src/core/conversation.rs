//! 智能体对话历史
//!
//! 每个智能体各自保存 user/assistant 消息序列：只追加，读取时返回拷贝，可整体清空。

use serde::{Deserialize, Serialize};

/// 消息角色
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// 单条对话消息
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: String,
}

impl ConversationMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// 不剪枝的对话历史
#[derive(Clone, Debug, Default)]
pub struct ConversationHistory {
    messages: Vec<ConversationMessage>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, msg: ConversationMessage) {
        self.messages.push(msg);
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    /// 拷贝一份给调用方，调用方修改不影响内部
    pub fn snapshot(&self) -> Vec<ConversationMessage> {
        self.messages.clone()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
