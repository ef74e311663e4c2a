//! 核心契约层：错误类型、智能体 trait 与响应、对话历史

pub mod agent;
pub mod conversation;
pub mod error;

pub use agent::{Agent, AgentContext, AgentResponse, AgentType, ProfileContext};
pub use conversation::{ConversationHistory, ConversationMessage, Role};
pub use error::{Result, SymbioteError};
