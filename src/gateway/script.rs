//! System Events 外观脚本

/// 关闭自动切换（否则系统会在日落时把手动设置覆盖掉）
pub const DISABLE_AUTOMATIC: &str =
    r#"tell application "System Events" to tell appearance preferences to set automatic to false"#;

/// 只读探测，用于检查 Automation 授权
pub const PROBE_DARK_MODE: &str =
    r#"tell application "System Events" to tell appearance preferences to get dark mode"#;

/// 设置深色 / 浅色
pub fn set_dark_mode(dark: bool) -> String {
    format!(
        r#"tell application "System Events" to tell appearance preferences to set dark mode to {}"#,
        dark
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_dark_mode_script() {
        assert!(set_dark_mode(true).ends_with("set dark mode to true"));
        assert!(set_dark_mode(false).ends_with("set dark mode to false"));
        assert!(set_dark_mode(true).starts_with(r#"tell application "System Events""#));
    }
}
