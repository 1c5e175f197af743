//! check 子命令

use std::process::ExitCode;

use crate::check;
use crate::error::Result;
use crate::storage::config::Config;

pub fn execute(config: &Config) -> Result<ExitCode> {
    let result = check::check_environment(&config.gateway);

    for warning in &result.warnings {
        eprintln!("  ! {}", warning);
    }

    if result.ok {
        println!("  ✓ defaults and osascript are usable");
        return Ok(ExitCode::SUCCESS);
    }

    eprintln!("themetoggle cannot change the appearance on this system:\n");
    for err in &result.errors {
        eprintln!("  ✗ {}", err);
    }
    Ok(ExitCode::FAILURE)
}
