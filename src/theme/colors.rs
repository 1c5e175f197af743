//! 状态栏颜色定义

use ratatui::style::Color;

use super::ThemeMode;

/// 状态栏颜色方案
#[derive(Debug, Clone, Copy)]
pub struct BarColors {
    /// 主背景色
    pub bg: Color,
    /// 标签背景色
    pub label_bg: Color,
    /// 标签文字
    pub label_fg: Color,
    /// 普通文字
    pub text: Color,
    /// 次要文字（快捷键说明）
    pub muted: Color,
    /// 快捷键高亮
    pub highlight: Color,
    /// 错误色 - 用于 apply 失败的 toast
    pub error: Color,
}

/// 按当前模式选配色：状态栏本身跟着系统外观走
pub fn bar_colors(mode: ThemeMode) -> BarColors {
    match mode {
        ThemeMode::Dark => dark_colors(),
        ThemeMode::Light => light_colors(),
    }
}

/// 深色
pub fn dark_colors() -> BarColors {
    BarColors {
        bg: Color::Rgb(24, 24, 24),          // 深灰背景
        label_bg: Color::Rgb(0, 255, 136),   // 亮绿色
        label_fg: Color::Black,
        text: Color::White,
        muted: Color::Rgb(128, 128, 128),    // 灰色
        highlight: Color::Rgb(0, 255, 136),
        error: Color::Rgb(255, 85, 85),      // 红色
    }
}

/// 浅色
pub fn light_colors() -> BarColors {
    BarColors {
        bg: Color::Rgb(250, 250, 250),       // 浅灰背景
        label_bg: Color::Rgb(0, 128, 68),    // 深绿色
        label_fg: Color::White,
        text: Color::Rgb(30, 30, 30),        // 深灰文字
        muted: Color::Rgb(120, 120, 120),
        highlight: Color::Rgb(0, 128, 68),
        error: Color::Rgb(200, 50, 50),
    }
}
