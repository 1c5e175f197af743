//! 应用配置持久化

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::app_dir;
use crate::error::Result;

/// 外部命令超时的下限
const MIN_TIMEOUT_MS: u64 = 100;

/// 应用配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub listener: ListenerConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// 外部命令配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// `defaults` 可执行文件
    #[serde(default = "default_defaults_program")]
    pub defaults_program: String,
    /// `osascript` 可执行文件
    #[serde(default = "default_osascript_program")]
    pub osascript_program: String,
    /// 单个外部命令的超时（毫秒）
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// apply 成功后是否广播 AppleInterfaceThemeChangedNotification
    #[serde(default = "default_true")]
    pub broadcast: bool,
}

fn default_defaults_program() -> String {
    "/usr/bin/defaults".to_string()
}

fn default_osascript_program() -> String {
    "/usr/bin/osascript".to_string()
}

fn default_timeout_ms() -> u64 {
    5_000
}

fn default_true() -> bool {
    true
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            defaults_program: default_defaults_program(),
            osascript_program: default_osascript_program(),
            timeout_ms: default_timeout_ms(),
            broadcast: true,
        }
    }
}

impl GatewayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.max(MIN_TIMEOUT_MS))
    }
}

/// 主题变更信号来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ListenerSource {
    /// macOS 上用分布式通知，其他平台轮询
    #[default]
    Auto,
    Distributed,
    Poll,
    None,
}

/// 通知监听配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListenerConfig {
    #[serde(default)]
    pub source: ListenerSource,
    /// 轮询间隔（秒），仅 poll 模式使用
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

fn default_poll_interval_secs() -> u64 {
    2
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            source: ListenerSource::default(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

impl ListenerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// EnvFilter 语法，RUST_LOG 优先
    #[serde(default = "default_log_level")]
    pub level: String,
    /// 状态栏模式下写入 ~/.themetoggle/themetoggle.log
    #[serde(default = "default_true")]
    pub file: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: true,
        }
    }
}

/// 获取配置文件路径
pub fn config_path() -> PathBuf {
    app_dir().join("config.toml")
}

/// 从指定路径加载配置，文件不存在时返回默认值
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// 保存配置
pub fn save_config(config: &Config) -> Result<()> {
    save_config_to(&config_path(), config)
}

/// 保存配置到指定路径
pub fn save_config_to(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
