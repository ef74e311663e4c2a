//! Symbiote - 多智能体协作学习后端
//!
//! 模块划分：
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **observability**: 日志初始化
//! - **core**: 错误类型、Agent trait 与响应、对话历史
//! - **agents**: 四类学习智能体（Tutor / Peer / Provocateur / Teachable）与注册表
//! - **schemas**: 用户画像、会话、挑战与 HTTP 请求/响应体
//! - **services**: 编排器、积分、学习历史、会话存储
//! - **api**: axum 路由与错误到 HTTP 的映射

pub mod agents;
pub mod api;
pub mod config;
pub mod core;
pub mod observability;
pub mod schemas;
pub mod services;

pub use agents::AgentRegistry;
pub use api::{router, AppState};
pub use config::{load_config, AppConfig};
pub use core::{Result, SymbioteError};
pub use services::SessionStore;
