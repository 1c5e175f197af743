//! tracing 初始化
//!
//! 状态栏模式下终端归 ratatui 所有，日志写到 ~/.themetoggle/themetoggle.log；
//! 其他子命令写 stderr。`RUST_LOG` 覆盖配置里的级别。

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{Result, ToggleError};
use crate::storage::{self, config::LogConfig};

/// 日志输出位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
    /// 不安装 subscriber
    Disabled,
}

impl LogTarget {
    /// 状态栏模式：写文件，或者完全关闭
    pub fn for_bar(config: &LogConfig) -> Self {
        if config.file {
            LogTarget::File(storage::app_dir().join("themetoggle.log"))
        } else {
            LogTarget::Disabled
        }
    }
}

fn filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn init(config: &LogConfig, target: LogTarget) -> Result<()> {
    let registry = tracing_subscriber::registry().with(filter(config));

    let result = match target {
        LogTarget::Disabled => return Ok(()),
        LogTarget::Stderr => registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .try_init(),
        LogTarget::File(path) => {
            storage::ensure_app_dir()?;
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            registry
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .try_init()
        }
    };

    result.map_err(|e| ToggleError::config(format!("cannot install logger: {}", e)))
}
