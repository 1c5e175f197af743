//! status 子命令

use std::process::ExitCode;

use crate::error::Result;
use crate::gateway::{SystemGateway, ThemeGateway};
use crate::storage::config::Config;

pub fn execute(config: &Config, long: bool) -> Result<ExitCode> {
    let mode = SystemGateway::new(config.gateway.clone()).query_current_mode();
    if long {
        println!("{}", mode.name());
    } else {
        println!("{}", mode.label());
    }
    Ok(ExitCode::SUCCESS)
}
