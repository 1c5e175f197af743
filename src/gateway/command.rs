//! 外部命令执行（带超时）
//!
//! `defaults` / `osascript` 偶尔会卡住（System Events 等待授权弹窗时尤其常见），
//! 所以所有调用都必须有上限。

use std::io::Read;
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::GatewayError;

/// try_wait 轮询间隔
const POLL_STEP: Duration = Duration::from_millis(10);

/// 已退出进程的输出
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// 非零退出转换为 `GatewayError::NonZeroExit`
    pub fn check(self, program: &str) -> Result<CommandOutput, GatewayError> {
        if self.success() {
            return Ok(self);
        }
        // osascript 把错误写到 stderr；少数情况下只有 stdout
        let diagnostic = if self.stderr.trim().is_empty() {
            self.stdout.trim()
        } else {
            self.stderr.trim()
        };
        Err(GatewayError::NonZeroExit {
            program: program.to_string(),
            code: self.status.code(),
            stderr: diagnostic.to_string(),
        })
    }
}

/// 执行命令并等待退出，超过 `timeout` 则 kill
pub fn run(program: &str, args: &[&str], timeout: Duration) -> Result<CommandOutput, GatewayError> {
    tracing::debug!(program, ?args, "running command");

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| GatewayError::Spawn {
            program: program.to_string(),
            source,
        })?;

    // 管道必须并行读取，否则输出较多时子进程会阻塞在 write 上
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                tracing::warn!(program, timeout_ms = timeout.as_millis() as u64, "command killed");
                return Err(GatewayError::Timeout {
                    program: program.to_string(),
                    after: timeout,
                });
            }
            Ok(None) => thread::sleep(POLL_STEP),
            Err(source) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(GatewayError::Spawn {
                    program: program.to_string(),
                    source,
                });
            }
        }
    };

    // 子进程退出后，它留下的后台进程可能仍持有管道，读取同样受 deadline 约束
    let timed_out = || {
        tracing::warn!(program, timeout_ms = timeout.as_millis() as u64, "output pipe left open");
        GatewayError::Timeout {
            program: program.to_string(),
            after: timeout,
        }
    };
    let stdout = collect(&stdout, deadline).ok_or_else(timed_out)?;
    let stderr = collect(&stderr, deadline).ok_or_else(timed_out)?;

    Ok(CommandOutput {
        status,
        stdout,
        stderr,
    })
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
    });
    rx
}

/// 等待读取线程交回输出；到 deadline 仍未结束返回 None
fn collect(rx: &Receiver<String>, deadline: Instant) -> Option<String> {
    rx.recv_timeout(deadline.saturating_duration_since(Instant::now()))
        .ok()
}
