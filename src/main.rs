//! Symbiote - 多智能体协作学习后端
//!
//! 入口：初始化日志、加载配置、装配会话存储并启动 HTTP 服务。

use std::sync::Arc;

use anyhow::Context;
use symbiote::{config::load_config, observability, router, AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init();

    let cfg = load_config(None).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        AppConfig::default()
    });
    let addr = cfg.server.bind_addr();
    let cleanup_interval_secs = cfg.session.cleanup_interval_secs;
    let timeout = cfg.session.inactivity_timeout();

    let state = Arc::new(AppState::new(cfg));
    tracing::info!(
        agents = ?state.registry.list_types(),
        "agent registry ready"
    );

    // 定期清理不活跃会话（间隔为 0 时只能通过 /api/v1/sessions/cleanup 手动清理）
    if cleanup_interval_secs > 0 {
        let sweep_state = Arc::clone(&state);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(cleanup_interval_secs));
            interval.tick().await;
            loop {
                interval.tick().await;
                sweep_state.sessions.write().await.cleanup_inactive_sessions(timeout);
            }
        });
        tracing::info!("session sweep enabled, interval {}s", cleanup_interval_secs);
    }

    let app = router(state);
    tracing::info!("Symbiote API: http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
