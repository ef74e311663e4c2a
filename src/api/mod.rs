//! HTTP 接口
//!
//! 路由按资源分为三组挂在 `/api/v1` 下：sessions / chat / analytics。
//! 所有会话状态都在 `AppState.sessions` 这一把读写锁后面；处理器持锁期间不跨越任何 await。

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};

use crate::agents::AgentRegistry;
use crate::config::AppConfig;
use crate::core::SymbioteError;
use crate::schemas::ErrorResponse;
use crate::services::SessionStore;

pub mod analytics_routes;
pub mod chat_routes;
pub mod session_routes;

pub const API_VERSION: &str = "2.0.0";

/// 处理器返回值：成功为 JSON，失败由 SymbioteError 映射为状态码 + ErrorResponse
pub type ApiResult<T> = std::result::Result<Json<T>, SymbioteError>;

pub struct AppState {
    pub config: AppConfig,
    pub registry: Arc<AgentRegistry>,
    pub sessions: RwLock<SessionStore>,
}

impl AppState {
    /// 按配置注册内置智能体并创建空的会话存储
    pub fn new(config: AppConfig) -> Self {
        let registry = Arc::new(AgentRegistry::with_defaults(&config.agents));
        let sessions = SessionStore::new(Arc::clone(&registry), config.agents.seed);
        Self {
            config,
            registry,
            sessions: RwLock::new(sessions),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api/v1/sessions", session_routes::router())
        .nest("/api/v1/chat", chat_routes::router())
        .nest("/api/v1/analytics", analytics_routes::router())
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

async fn root(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "message": format!("Welcome to {}", state.config.app.name),
        "version": API_VERSION,
        "status": "running",
    }))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": API_VERSION,
    }))
}

/// 请求体无法解析（语法错误、缺字段、枚举值不认识）时同样按校验错误返回
pub(crate) fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, SymbioteError> {
    payload.map(|Json(body)| body).map_err(|rejection| SymbioteError::Validation {
        message: rejection.body_text(),
        field: None,
    })
}

pub fn status_code(err: &SymbioteError) -> StatusCode {
    match err {
        SymbioteError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        SymbioteError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        SymbioteError::Session { .. } | SymbioteError::Agent { .. } | SymbioteError::Challenge { .. } => {
            StatusCode::BAD_REQUEST
        }
        SymbioteError::Registry(_) | SymbioteError::AgentNotFound(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for SymbioteError {
    fn into_response(self) -> Response {
        let status = status_code(&self);
        if status.is_server_error() {
            tracing::warn!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}
