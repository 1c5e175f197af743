mod app;
mod check;
mod cli;
mod error;
mod event;
mod gateway;
mod logging;
mod notification;
mod storage;
mod sync;
mod theme;
mod ui;

use std::io;
use std::panic;
use std::process::ExitCode;

use clap::Parser;
use crossterm::event::DisableMouseCapture;
use crossterm::execute;

use cli::{Cli, Commands};
use logging::LogTarget;
use storage::config::{self, Config};

fn main() -> ExitCode {
    // Set up panic hook to restore terminal state on panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = execute!(io::stdout(), DisableMouseCapture);
        ratatui::restore();
        original_hook(panic_info);
    }));

    // 解析命令行参数
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Bar);

    // 配置错误要等日志就绪后再报告
    let path = config::config_path();
    let (config, config_error) = match config::load_config_from(&path) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    let target = match command {
        Commands::Bar => LogTarget::for_bar(&config.log),
        _ => LogTarget::Stderr,
    };
    if let Err(e) = logging::init(&config.log, target) {
        eprintln!("themetoggle: {}", e);
    }
    if let Some(e) = config_error {
        tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
    }

    let result = match command {
        Commands::Bar => cli::bar::execute(&config),
        Commands::Toggle => cli::toggle::execute(&config),
        Commands::Status { long } => cli::status::execute(&config, long),
        Commands::Watch => cli::watch::execute(&config),
        Commands::Check => cli::check::execute(&config),
        Commands::Config { init } => cli::config::execute(&config, init),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("themetoggle: {}", e);
            ExitCode::FAILURE
        }
    }
}
