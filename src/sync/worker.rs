//! 单一所有者线程
//!
//! `ThemeSync` 只在 worker 线程上被修改；UI 和通知监听器通过 [`SyncHandle`]
//! 投递命令，命令按到达顺序串行执行。Gateway 的阻塞调用也发生在这个线程上，
//! UI 线程只读取发布出来的 [`SyncEvent`](super::SyncEvent)。

use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use super::ThemeSync;
use crate::gateway::ThemeGateway;
use crate::theme::ThemeMode;

/// 投递给 worker 的命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncCommand {
    Toggle,
    ExternalSignal,
    Shutdown,
}

/// worker 的发送端，可以随意 clone
#[derive(Debug, Clone)]
pub struct SyncHandle {
    tx: Sender<SyncCommand>,
}

impl SyncHandle {
    /// 返回 false 表示 worker 已经退出
    pub fn toggle(&self) -> bool {
        self.send(SyncCommand::Toggle)
    }

    /// 外观可能变了
    pub fn signal(&self) -> bool {
        self.send(SyncCommand::ExternalSignal)
    }

    pub fn shutdown(&self) {
        let _ = self.tx.send(SyncCommand::Shutdown);
    }

    fn send(&self, command: SyncCommand) -> bool {
        self.tx.send(command).is_ok()
    }
}

/// 持有状态机的后台线程
pub struct SyncWorker {
    handle: SyncHandle,
    thread: Option<JoinHandle<ThemeMode>>,
}

impl SyncWorker {
    /// 启动 worker，`sync` 的所有权转移到新线程
    pub fn spawn<G: ThemeGateway + 'static>(sync: ThemeSync<G>) -> io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let thread = thread::Builder::new()
            .name("theme-sync".to_string())
            .spawn(move || run(sync, rx))?;

        Ok(Self {
            handle: SyncHandle { tx },
            thread: Some(thread),
        })
    }

    pub fn handle(&self) -> SyncHandle {
        self.handle.clone()
    }

    /// 停止 worker 并返回最终的外观；worker panic 时返回 None
    pub fn join(mut self) -> Option<ThemeMode> {
        self.stop()
    }

    fn stop(&mut self) -> Option<ThemeMode> {
        self.handle.shutdown();
        self.thread.take().and_then(|t| t.join().ok())
    }
}

impl Drop for SyncWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run<G: ThemeGateway>(mut sync: ThemeSync<G>, rx: Receiver<SyncCommand>) -> ThemeMode {
    tracing::debug!("sync worker started");
    // 所有 handle 都被丢弃时 recv 返回 Err，同样退出
    while let Ok(command) = rx.recv() {
        match command {
            SyncCommand::Toggle => sync.toggle(),
            SyncCommand::ExternalSignal => sync.refresh_from_external_signal(),
            SyncCommand::Shutdown => break,
        }
    }
    let mode = sync.current_mode();
    tracing::debug!(%mode, "sync worker stopped");
    mode
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::MockGateway;
    use crate::sync::{ChangeOrigin, SyncEvent};
    use std::time::Duration;

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn test_commands_are_serialized() {
        let gateway = MockGateway::echoing(ThemeMode::Light);
        let mut sync = ThemeSync::new(gateway.clone());
        let events = sync.subscribe();
        let worker = SyncWorker::spawn(sync).unwrap();
        let handle = worker.handle();

        // toggle 后紧跟着自己的回声通知
        assert!(handle.toggle());
        assert!(handle.signal());
        assert!(handle.toggle());
        assert!(handle.signal());

        assert_eq!(worker.join(), Some(ThemeMode::Light));
        assert_eq!(gateway.applied(), vec![ThemeMode::Dark, ThemeMode::Light]);

        let changes: Vec<SyncEvent> = events.try_iter().collect();
        assert_eq!(
            changes,
            vec![
                SyncEvent::ModeChanged {
                    mode: ThemeMode::Dark,
                    origin: ChangeOrigin::Local,
                },
                SyncEvent::ModeChanged {
                    mode: ThemeMode::Light,
                    origin: ChangeOrigin::Local,
                },
            ]
        );
    }

    #[test]
    fn test_external_signal_from_another_thread() {
        let gateway = MockGateway::new(ThemeMode::Light);
        let mut sync = ThemeSync::new(gateway.clone());
        let events = sync.subscribe();
        let worker = SyncWorker::spawn(sync).unwrap();

        gateway.set_os_mode(ThemeMode::Dark);
        let handle = worker.handle();
        thread::spawn(move || handle.signal()).join().unwrap();

        assert_eq!(
            events.recv_timeout(WAIT).unwrap(),
            SyncEvent::ModeChanged {
                mode: ThemeMode::Dark,
                origin: ChangeOrigin::External,
            }
        );
        assert_eq!(worker.join(), Some(ThemeMode::Dark));
        assert!(gateway.applied().is_empty());
    }

    #[test]
    fn test_handle_reports_stopped_worker() {
        let worker = SyncWorker::spawn(ThemeSync::new(MockGateway::new(ThemeMode::Dark))).unwrap();
        let handle = worker.handle();
        assert_eq!(worker.join(), Some(ThemeMode::Dark));
        assert!(!handle.toggle());
        assert!(!handle.signal());
    }

    #[test]
    fn test_events_close_when_worker_stops() {
        let mut sync = ThemeSync::new(MockGateway::new(ThemeMode::Dark));
        let events = sync.subscribe();
        let worker = SyncWorker::spawn(sync).unwrap();
        worker.handle().shutdown();

        // 状态机随线程一起被丢弃，订阅端断开
        assert!(events.recv_timeout(WAIT).is_err());
        drop(worker);
    }
}
