//! 环境检查

use std::time::Duration;

use crate::gateway::{command, SystemGateway, INTERFACE_STYLE_KEY};
use crate::storage::config::GatewayConfig;

const CHECK_TIMEOUT: Duration = Duration::from_secs(3);

pub struct CheckResult {
    pub ok: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

pub fn check_environment(config: &GatewayConfig) -> CheckResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if !cfg!(target_os = "macos") {
        errors.push("themetoggle only controls the macOS appearance.".to_string());
    }

    // defaults 读取失败时退出码非零（浅色模式），只要能启动就算可用
    if !check_program(&config.defaults_program, &["read", "-g", INTERFACE_STYLE_KEY]) {
        errors.push(format!("{} is not runnable.", config.defaults_program));
    }

    if !check_program(&config.osascript_program, &["-e", "return 1"]) {
        errors.push(format!("{} is not runnable.", config.osascript_program));
    } else if let Err(e) = SystemGateway::new(config.clone()).probe_automation() {
        // 没有 Automation 授权时只能读不能改
        warnings.push(format!(
            "System Events is not scriptable ({}). Allow it under Privacy & Security > Automation.",
            e
        ));
    }

    if !config.broadcast {
        warnings.push(
            "broadcast is disabled; other apps learn about changes only from the system."
                .to_string(),
        );
    }

    CheckResult {
        ok: errors.is_empty(),
        errors,
        warnings,
    }
}

fn check_program(program: &str, args: &[&str]) -> bool {
    command::run(program, args, CHECK_TIMEOUT).is_ok()
}
