//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `SYMBIOTE__*` 覆盖（双下划线表示嵌套，如 `SYMBIOTE__SERVER__PORT=9000`）。

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub session: SessionSection,
    #[serde(default)]
    pub agents: AgentsSection,
    #[serde(default)]
    pub points: PointsSection,
}

/// [app] 段
#[derive(Debug, Clone, Deserialize)]
pub struct AppSection {
    #[serde(default = "default_app_name")]
    pub name: String,
}

fn default_app_name() -> String {
    "Symbiote Learning App".to_string()
}

impl Default for AppSection {
    fn default() -> Self {
        Self { name: default_app_name() }
    }
}

/// [server] 段：监听地址
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerSection {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// [session] 段：不活跃超时与后台清理间隔
#[derive(Debug, Clone, Deserialize)]
pub struct SessionSection {
    #[serde(default = "default_inactivity_timeout_minutes")]
    pub inactivity_timeout_minutes: u64,
    /// 0 表示不启动后台清理（手动清理接口始终可用）
    #[serde(default)]
    pub cleanup_interval_secs: u64,
}

fn default_inactivity_timeout_minutes() -> u64 {
    30
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            inactivity_timeout_minutes: default_inactivity_timeout_minutes(),
            cleanup_interval_secs: 0,
        }
    }
}

impl SessionSection {
    pub fn inactivity_timeout(&self) -> Duration {
        Duration::from_secs(self.inactivity_timeout_minutes.saturating_mul(60))
    }
}

/// [agents] 段：Peer 出错率与可选随机种子
#[derive(Debug, Clone, Deserialize)]
pub struct AgentsSection {
    #[serde(default = "default_peer_error_rate")]
    pub peer_error_rate: f64,
    /// 设置后每个会话的智能体都由确定性随机源驱动
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_peer_error_rate() -> f64 {
    0.3
}

impl Default for AgentsSection {
    fn default() -> Self {
        Self {
            peer_error_rate: default_peer_error_rate(),
            seed: None,
        }
    }
}

/// [points] 段
#[derive(Debug, Clone, Deserialize)]
pub struct PointsSection {
    /// 积分接口返回的最近流水条数
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_history_limit() -> usize {
    10
}

impl Default for PointsSection {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
        }
    }
}

/// 从 config 目录加载配置，环境变量 SYMBIOTE__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 SYMBIOTE__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("SYMBIOTE")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}

/// 重新从磁盘与环境变量加载配置
pub fn reload_config() -> Result<AppConfig, config::ConfigError> {
    load_config(None)
}
