//! External Theme Gateway
//!
//! 与系统偏好设置 / 脚本接口的唯一交互点。本身不保存任何状态：
//! 读取走 `defaults read -g AppleInterfaceStyle`，修改走 `osascript`
//! 驱动 System Events，修改成功后广播 AppleInterfaceThemeChangedNotification。

pub mod command;
#[cfg(test)]
pub mod mock;
pub mod script;

use std::time::Duration;

use crate::error::GatewayError;
use crate::notification;
use crate::storage::config::GatewayConfig;
use crate::theme::ThemeMode;

/// 全局偏好中的外观键。浅色模式下该键不存在
pub const INTERFACE_STYLE_KEY: &str = "AppleInterfaceStyle";

/// 主题读写接口
///
/// 两个方法都会阻塞（启动外部进程），不要在 UI 线程上调用。
pub trait ThemeGateway: Send {
    /// 读取系统当前外观。任何失败都按 Light 处理
    fn query_current_mode(&self) -> ThemeMode;

    /// 修改系统外观并广播变更通知
    fn apply_mode(&self, mode: ThemeMode) -> Result<(), GatewayError>;
}

/// 解析 `defaults read` 的输出：只有 "Dark" 是深色，其余（包括空输出）都是浅色
pub fn parse_interface_style(output: &str) -> ThemeMode {
    if output.trim() == "Dark" {
        ThemeMode::Dark
    } else {
        ThemeMode::Light
    }
}

/// 真实系统实现
#[derive(Debug, Clone)]
pub struct SystemGateway {
    config: GatewayConfig,
}

impl SystemGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self { config }
    }

    fn timeout(&self) -> Duration {
        self.config.timeout()
    }

    /// 严格读取：键不存在视为 Light，其他异常作为错误返回
    pub fn read_interface_style(&self) -> Result<ThemeMode, GatewayError> {
        let program = self.config.defaults_program.as_str();
        let output = command::run(
            program,
            &["read", "-g", INTERFACE_STYLE_KEY],
            self.timeout(),
        )?;

        if !output.success() {
            // 浅色模式下键不存在，defaults 以非零状态退出
            if output.stderr.contains("does not exist") {
                return Ok(ThemeMode::Light);
            }
            return output.check(program).map(|_| ThemeMode::Light);
        }

        let value = output.stdout.trim();
        if value.is_empty() || value == "Dark" {
            Ok(parse_interface_style(value))
        } else {
            Err(GatewayError::InvalidOutput {
                program: program.to_string(),
                output: value.to_string(),
            })
        }
    }

    fn run_script(&self, script: &str) -> Result<(), GatewayError> {
        let program = self.config.osascript_program.as_str();
        command::run(program, &["-e", script], self.timeout())?.check(program)?;
        Ok(())
    }

    /// 只读 AppleScript 探测，返回 System Events 报告的 dark mode
    pub fn probe_automation(&self) -> Result<ThemeMode, GatewayError> {
        let program = self.config.osascript_program.as_str();
        let output = command::run(program, &["-e", script::PROBE_DARK_MODE], self.timeout())?
            .check(program)?;
        match output.stdout.trim() {
            "true" => Ok(ThemeMode::Dark),
            "false" => Ok(ThemeMode::Light),
            other => Err(GatewayError::InvalidOutput {
                program: program.to_string(),
                output: other.to_string(),
            }),
        }
    }
}

impl ThemeGateway for SystemGateway {
    fn query_current_mode(&self) -> ThemeMode {
        match self.read_interface_style() {
            Ok(mode) => mode,
            Err(e) => {
                tracing::warn!(error = %e, "reading appearance failed, assuming Light");
                ThemeMode::Light
            }
        }
    }

    fn apply_mode(&self, mode: ThemeMode) -> Result<(), GatewayError> {
        tracing::debug!(%mode, "applying appearance");

        // 自动切换关不掉不影响手动设置，继续
        if let Err(e) = self.run_script(script::DISABLE_AUTOMATIC) {
            tracing::warn!(error = %e, "could not disable automatic appearance");
        }

        self.run_script(&script::set_dark_mode(mode.is_dark()))?;

        // 外观已经切换成功，广播失败只影响其他应用的刷新
        if self.config.broadcast {
            if let Err(e) = notification::post_theme_changed() {
                tracing::warn!(error = %e, %mode, "appearance changed but broadcast failed");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_interface_style() {
        assert_eq!(parse_interface_style("Dark\n"), ThemeMode::Dark);
        assert_eq!(parse_interface_style(""), ThemeMode::Light);
        assert_eq!(parse_interface_style("Light"), ThemeMode::Light);
        // 只接受字面量 "Dark"
        assert_eq!(parse_interface_style("dark"), ThemeMode::Light);
    }

    #[test]
    fn test_missing_program_degrades_to_light() {
        let gateway = SystemGateway::new(GatewayConfig {
            defaults_program: "/nonexistent/defaults".to_string(),
            osascript_program: "/nonexistent/osascript".to_string(),
            timeout_ms: 500,
            broadcast: false,
        });
        assert!(matches!(
            gateway.read_interface_style(),
            Err(GatewayError::Spawn { .. })
        ));
        assert_eq!(gateway.query_current_mode(), ThemeMode::Light);
        assert!(matches!(
            gateway.apply_mode(ThemeMode::Dark),
            Err(GatewayError::Spawn { .. })
        ));
    }

    /// 用 shell 脚本伪造 defaults / osascript
    #[cfg(unix)]
    mod fake_programs {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use std::path::Path;

        fn write_script(dir: &Path, name: &str, body: &str) -> String {
            let path = dir.join(name);
            fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path.to_string_lossy().into_owned()
        }

        fn gateway(defaults: String, osascript: String) -> SystemGateway {
            SystemGateway::new(GatewayConfig {
                defaults_program: defaults,
                osascript_program: osascript,
                timeout_ms: 2_000,
                broadcast: false,
            })
        }

        #[test]
        fn test_reads_dark() {
            let dir = tempfile::tempdir().unwrap();
            let defaults = write_script(dir.path(), "defaults", "echo Dark");
            let gw = gateway(defaults, "/bin/true".to_string());
            assert_eq!(gw.read_interface_style().unwrap(), ThemeMode::Dark);
            assert_eq!(gw.query_current_mode(), ThemeMode::Dark);
        }

        #[test]
        fn test_missing_key_is_light() {
            let dir = tempfile::tempdir().unwrap();
            let defaults = write_script(
                dir.path(),
                "defaults",
                "echo 'The domain/default pair of (kCFPreferencesAnyApplication, AppleInterfaceStyle) does not exist' >&2; exit 1",
            );
            let gw = gateway(defaults, "/bin/true".to_string());
            assert_eq!(gw.read_interface_style().unwrap(), ThemeMode::Light);
        }

        #[test]
        fn test_unexpected_output_is_reported_but_light() {
            let dir = tempfile::tempdir().unwrap();
            let defaults = write_script(dir.path(), "defaults", "echo Sepia");
            let gw = gateway(defaults, "/bin/true".to_string());
            assert!(matches!(
                gw.read_interface_style(),
                Err(GatewayError::InvalidOutput { .. })
            ));
            assert_eq!(gw.query_current_mode(), ThemeMode::Light);
        }

        #[test]
        fn test_apply_passes_script_to_osascript() {
            let dir = tempfile::tempdir().unwrap();
            let log = dir.path().join("calls.log");
            let osascript = write_script(
                dir.path(),
                "osascript",
                &format!("echo \"$2\" >> '{}'", log.display()),
            );
            let gw = gateway("/bin/true".to_string(), osascript);

            gw.apply_mode(ThemeMode::Dark).unwrap();

            let calls = fs::read_to_string(&log).unwrap();
            let lines: Vec<&str> = calls.lines().collect();
            assert_eq!(lines.len(), 2);
            assert!(lines[0].ends_with("set automatic to false"));
            assert!(lines[1].ends_with("set dark mode to true"));
        }

        #[test]
        fn test_broadcast_failure_does_not_fail_apply() {
            let dir = tempfile::tempdir().unwrap();
            let osascript = write_script(dir.path(), "osascript", "exit 0");
            let gw = SystemGateway::new(GatewayConfig {
                defaults_program: "/bin/true".to_string(),
                osascript_program: osascript,
                timeout_ms: 2_000,
                broadcast: true,
            });

            // 非 macOS 上广播必然失败，切换本身仍然成功
            assert!(gw.apply_mode(ThemeMode::Dark).is_ok());
        }

        #[test]
        fn test_apply_failure_carries_diagnostic() {
            let dir = tempfile::tempdir().unwrap();
            let osascript = write_script(
                dir.path(),
                "osascript",
                "echo 'Not authorized to send Apple events to System Events. (-1743)' >&2; exit 1",
            );
            let gw = gateway("/bin/true".to_string(), osascript);

            let err = gw.apply_mode(ThemeMode::Light).unwrap_err();
            assert!(matches!(err, GatewayError::NonZeroExit { code: Some(1), .. }));
            assert!(err.diagnostic().contains("-1743"));
        }

        #[test]
        fn test_probe_automation() {
            let dir = tempfile::tempdir().unwrap();
            let osascript = write_script(dir.path(), "osascript", "echo true");
            let gw = gateway("/bin/true".to_string(), osascript);
            assert_eq!(gw.probe_automation().unwrap(), ThemeMode::Dark);
        }
    }
}
