//! toggle 子命令：切换一次后退出

use std::process::ExitCode;

use crate::error::Result;
use crate::gateway::SystemGateway;
use crate::storage::config::Config;
use crate::sync::{SyncEvent, ThemeSync};

pub fn execute(config: &Config) -> Result<ExitCode> {
    // 单线程持有状态机，不需要 worker
    let mut sync = ThemeSync::new(SystemGateway::new(config.gateway.clone()));
    let events = sync.subscribe();

    sync.toggle();
    println!("{}", sync.current_mode().label());

    let mut code = ExitCode::SUCCESS;
    for event in events.try_iter() {
        if let SyncEvent::ApplyFailed { mode, error } = event {
            eprintln!("Could not switch to {}: {}", mode, error);
            code = ExitCode::FAILURE;
        }
    }
    Ok(code)
}
