mod colors;

use std::fmt;

pub use colors::*;

/// 系统外观模式
///
/// 只有两个状态：早期的 Auto（跟随系统日夜切换）已经移除。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeMode {
    Dark,
    Light,
}

impl ThemeMode {
    /// 切换后的模式：Dark ↔ Light
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    /// 状态栏上显示的单字符标签
    pub fn label(self) -> &'static str {
        match self {
            ThemeMode::Dark => "D",
            ThemeMode::Light => "L",
        }
    }

    /// 显示名称
    pub fn name(self) -> &'static str {
        match self {
            ThemeMode::Dark => "Dark",
            ThemeMode::Light => "Light",
        }
    }

    pub fn is_dark(self) -> bool {
        self == ThemeMode::Dark
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
