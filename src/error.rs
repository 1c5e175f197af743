//! themetoggle 统一错误类型定义
//!
//! 使用 `thiserror` 库提供统一的错误处理。Gateway 相关的错误单独建模，
//! 由状态机在本地恢复（只记录日志），不会向 UI 传播。

use std::io;
use std::time::Duration;

use thiserror::Error;

/// 外部命令 / 系统调用失败
#[derive(Debug, Error)]
pub enum GatewayError {
    /// 无法启动进程（程序不存在、权限不足等）
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// 进程以非零状态退出
    #[error("{program} exited with {}: {stderr}", exit_label(.code))]
    NonZeroExit {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    /// 进程在限定时间内没有退出（已被 kill）
    #[error("{program} timed out after {}ms", .after.as_millis())]
    Timeout { program: String, after: Duration },

    /// 输出无法解析
    #[error("unexpected output from {program}: {output:?}")]
    InvalidOutput { program: String, output: String },

    /// 主题变更通知广播失败
    #[error("broadcast failed: {0}")]
    Broadcast(String),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {}", c),
        None => "signal".to_string(),
    }
}

impl GatewayError {
    /// 捕获到的诊断文本（stderr / 原始输出），用于日志
    pub fn diagnostic(&self) -> &str {
        match self {
            GatewayError::NonZeroExit { stderr, .. } => stderr,
            GatewayError::InvalidOutput { output, .. } => output,
            GatewayError::Broadcast(msg) => msg,
            GatewayError::Spawn { .. } | GatewayError::Timeout { .. } => "",
        }
    }
}

/// themetoggle 错误类型
#[derive(Debug, Error)]
pub enum ToggleError {
    /// I/O 错误（配置、日志文件等）
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// TOML 解析错误
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML 序列化错误
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// 配置错误
    #[error("Config error: {0}")]
    Config(String),

    /// 外部命令错误
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// 通知监听器错误
    #[error("Listener error: {0}")]
    Listener(String),
}

/// themetoggle Result 类型别名
pub type Result<T> = std::result::Result<T, ToggleError>;

impl ToggleError {
    /// 创建 Config 错误
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// 创建 Listener 错误
    pub fn listener(msg: impl Into<String>) -> Self {
        Self::Listener(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ToggleError::config("bad timeout");
        assert_eq!(err.to_string(), "Config error: bad timeout");

        let err = ToggleError::listener("run loop gone");
        assert_eq!(err.to_string(), "Listener error: run loop gone");
    }

    #[test]
    fn test_gateway_error_keeps_diagnostic() {
        let err = GatewayError::NonZeroExit {
            program: "osascript".to_string(),
            code: Some(1),
            stderr: "execution error: Not authorized (-1743)".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "osascript exited with status 1: execution error: Not authorized (-1743)"
        );
        assert!(err.diagnostic().contains("-1743"));
    }

    #[test]
    fn test_timeout_display() {
        let err = GatewayError::Timeout {
            program: "defaults".to_string(),
            after: Duration::from_millis(250),
        };
        assert_eq!(err.to_string(), "defaults timed out after 250ms");
        assert_eq!(err.diagnostic(), "");
    }

    #[test]
    fn test_gateway_error_conversion() {
        let err: ToggleError = GatewayError::Broadcast("no center".to_string()).into();
        assert!(matches!(err, ToggleError::Gateway(_)));
        assert!(err.to_string().contains("no center"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: ToggleError = io_err.into();
        assert!(matches!(err, ToggleError::Io(_)));
    }
}
