pub mod config;

use std::io;
use std::path::PathBuf;

/// 获取 ~/.themetoggle/ 目录路径
///
/// 找不到 home 目录时退回到当前目录下的 `.themetoggle`。
pub fn app_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".themetoggle")
}

/// 确保 ~/.themetoggle/ 目录存在
pub fn ensure_app_dir() -> io::Result<PathBuf> {
    let dir = app_dir();
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
