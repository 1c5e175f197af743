//! watch 子命令：无界面运行，每次外观变化输出一行
//!
//! stdin 每行一个命令：`toggle`/`t`、`refresh`/`r`、`quit`/`q`。stdin 关闭时退出。

use std::io::{self, BufRead};
use std::process::ExitCode;
use std::thread;

use crate::error::Result;
use crate::gateway::SystemGateway;
use crate::notification;
use crate::storage::config::Config;
use crate::sync::{ChangeOrigin, SyncEvent, SyncHandle, SyncWorker, ThemeSync};

/// stdin 上的一行
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Toggle,
    Refresh,
    Quit,
}

fn parse_input(line: &str) -> Option<Input> {
    match line.trim() {
        "toggle" | "t" => Some(Input::Toggle),
        "refresh" | "r" => Some(Input::Refresh),
        "quit" | "q" | "exit" => Some(Input::Quit),
        _ => None,
    }
}

pub fn execute(config: &Config) -> Result<ExitCode> {
    let mut sync = ThemeSync::new(SystemGateway::new(config.gateway.clone()));
    let events = sync.subscribe();
    println!("{}", sync.current_mode().label());

    let worker = SyncWorker::spawn(sync)?;
    let listener = notification::spawn_listener(&config.listener, worker.handle())?;
    tracing::debug!(source = ?listener.source(), "watching for appearance changes");

    let handle = worker.handle();
    thread::Builder::new()
        .name("watch-stdin".to_string())
        .spawn(move || read_commands(io::stdin().lock(), &handle))?;

    // worker 退出时订阅端断开，循环结束
    for event in events {
        match event {
            SyncEvent::ModeChanged { mode, origin } => {
                let source = match origin {
                    ChangeOrigin::Local => "local",
                    ChangeOrigin::External => "external",
                };
                println!("{} {}", mode.label(), source);
            }
            SyncEvent::ApplyFailed { mode, error } => {
                eprintln!("Could not switch to {}: {}", mode, error);
            }
        }
    }

    listener.stop();
    worker.join();
    Ok(ExitCode::SUCCESS)
}

fn read_commands(input: impl BufRead, handle: &SyncHandle) {
    for line in input.lines() {
        let Ok(line) = line else { break };
        match parse_input(&line) {
            Some(Input::Toggle) => {
                handle.toggle();
            }
            Some(Input::Refresh) => {
                handle.signal();
            }
            Some(Input::Quit) => break,
            None if line.trim().is_empty() => {}
            None => eprintln!("unknown command: {}", line.trim()),
        }
    }
    handle.shutdown();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::MockGateway;
    use crate::theme::ThemeMode;
    use std::io::Cursor;

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("toggle\n"), Some(Input::Toggle));
        assert_eq!(parse_input(" r "), Some(Input::Refresh));
        assert_eq!(parse_input("q"), Some(Input::Quit));
        assert_eq!(parse_input("auto"), None);
    }

    #[test]
    fn test_stdin_commands_drive_worker() {
        let gateway = MockGateway::echoing(ThemeMode::Light);
        let mut sync = ThemeSync::new(gateway.clone());
        let events = sync.subscribe();
        let worker = SyncWorker::spawn(sync).unwrap();

        read_commands(Cursor::new("t\nr\nbogus\nt\nquit\nt\n"), &worker.handle());

        // quit 之后的 t 不会被执行
        let changes: Vec<SyncEvent> = events.iter().collect();
        assert_eq!(changes.len(), 2);
        assert_eq!(worker.join(), Some(ThemeMode::Light));
        assert_eq!(gateway.applied(), vec![ThemeMode::Dark, ThemeMode::Light]);
    }
}
