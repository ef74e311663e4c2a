//! 数据模型：用户画像与会话、消息与挑战、HTTP 请求/响应体

pub mod message;
pub mod requests;
pub mod responses;
pub mod user;

pub use message::{validate_message, Challenge, Difficulty, Message, MESSAGE_MAX_CHARS};
pub use requests::{ChallengeAnswerRequest, HintRequest, UserMessageRequest, UserProfileRequest};
pub use responses::{
    ChallengeResponse, CleanupResponse, ErrorResponse, HintResponse, HistoryResponse, MessageResponse,
    PerformanceResponse, PointsResponse, SessionResponse, StatusResponse,
};
pub use user::{
    validate_age, validate_name, validate_subject, EducationLevel, LearningPath, LearningPurpose, UserProfile,
    UserSession, LEARNING_PHASES,
};
