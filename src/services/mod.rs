//! 服务层：编排、积分、学习历史与会话

pub mod history;
pub mod orchestrator;
pub mod points;
pub mod session;

pub use history::{HistorySummary, HistoryTracker, Interaction, Recommendations, TopicPerformance};
pub use orchestrator::{select_agent, Orchestrator};
pub use points::{PointsEntry, PointsSummary, PointsTracker};
pub use session::{LearningSession, SessionId, SessionStore, SessionUpdate};
