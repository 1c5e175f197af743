//! 主题变更通知桥接
//!
//! - 广播：apply 成功后发出 AppleInterfaceThemeChangedNotification
//! - 监听：把系统通知（或轮询节拍）转成 [`SyncCommand::ExternalSignal`](crate::sync::SyncCommand)
//!
//! 通知本身没有负载，监听器只负责"叫醒"状态机，真正的值由状态机重新查询。

#[cfg(target_os = "macos")]
mod macos;

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::error::{GatewayError, Result};
use crate::storage::config::{ListenerConfig, ListenerSource};
use crate::sync::SyncHandle;

/// 系统外观变更的分布式通知名
pub const THEME_CHANGED_NOTIFICATION: &str = "AppleInterfaceThemeChangedNotification";

/// 广播外观已变更
#[cfg(target_os = "macos")]
pub fn post_theme_changed() -> std::result::Result<(), GatewayError> {
    macos::post_theme_changed()
}

/// 广播外观已变更
#[cfg(not(target_os = "macos"))]
pub fn post_theme_changed() -> std::result::Result<(), GatewayError> {
    Err(GatewayError::Broadcast(
        "distributed notifications are only available on macOS".to_string(),
    ))
}

impl ListenerSource {
    /// auto → 当前平台的默认来源；distributed 在非 macOS 上退化为 poll
    pub fn resolve(self) -> ListenerSource {
        match self {
            ListenerSource::Auto if cfg!(target_os = "macos") => ListenerSource::Distributed,
            ListenerSource::Auto => ListenerSource::Poll,
            ListenerSource::Distributed if !cfg!(target_os = "macos") => {
                tracing::warn!("distributed notifications unavailable, falling back to polling");
                ListenerSource::Poll
            }
            other => other,
        }
    }
}

enum Stopper {
    Channel(Sender<()>),
    #[cfg(target_os = "macos")]
    RunLoop(macos::RunLoopStopper),
    Nothing,
}

/// 运行中的监听器，drop 时停止
pub struct ListenerHandle {
    source: ListenerSource,
    stopper: Stopper,
    thread: Option<JoinHandle<()>>,
}

impl ListenerHandle {
    pub fn source(&self) -> ListenerSource {
        self.source
    }

    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };
        match &self.stopper {
            Stopper::Channel(tx) => {
                let _ = tx.send(());
            }
            #[cfg(target_os = "macos")]
            Stopper::RunLoop(run_loop) => run_loop.stop_until_finished(&thread),
            Stopper::Nothing => {}
        }
        let _ = thread.join();
        tracing::debug!(source = ?self.source, "listener stopped");
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// 按配置启动监听器
pub fn spawn_listener(config: &ListenerConfig, handle: SyncHandle) -> Result<ListenerHandle> {
    let source = config.source.resolve();
    tracing::info!(?source, "starting appearance listener");

    match source {
        ListenerSource::None => Ok(ListenerHandle {
            source,
            stopper: Stopper::Nothing,
            thread: None,
        }),
        ListenerSource::Poll => spawn_poll(config.poll_interval(), handle),
        #[cfg(target_os = "macos")]
        ListenerSource::Distributed => {
            let (stopper, thread) = macos::spawn_observer(handle)?;
            Ok(ListenerHandle {
                source,
                stopper: Stopper::RunLoop(stopper),
                thread: Some(thread),
            })
        }
        // resolve() 之后只剩上面几种
        _ => spawn_poll(config.poll_interval(), handle),
    }
}

/// 轮询：每个间隔发一次信号。refresh 是幂等的，多余的信号没有副作用
fn spawn_poll(interval: Duration, handle: SyncHandle) -> Result<ListenerHandle> {
    let (stop_tx, stop_rx) = mpsc::channel::<()>();
    let thread = thread::Builder::new()
        .name("theme-poll".to_string())
        .spawn(move || loop {
            match stop_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    if !handle.signal() {
                        break;
                    }
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        })?;

    Ok(ListenerHandle {
        source: ListenerSource::Poll,
        stopper: Stopper::Channel(stop_tx),
        thread: Some(thread),
    })
}
