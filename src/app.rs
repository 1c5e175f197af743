use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

use crate::sync::{ChangeOrigin, SyncEvent, SyncHandle};
use crate::theme::{bar_colors, BarColors, ThemeMode};
use crate::ui::click_areas::ClickAreas;

/// apply 失败提示的显示时长
const ERROR_TOAST_SECS: u64 = 4;

/// Toast 消息
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub expires_at: Instant,
}

impl Toast {
    pub fn new(message: impl Into<String>, duration: Duration) -> Self {
        Self {
            message: message.into(),
            expires_at: Instant::now() + duration,
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// 状态栏应用状态
///
/// 这里的 `mode` 只是 worker 发布出来的快照，真正的状态在 [`crate::sync::ThemeSync`] 里。
pub struct App {
    /// 当前显示的外观
    pub mode: ThemeMode,
    /// 最近一次变化的来源（显示用）
    pub last_origin: Option<ChangeOrigin>,
    /// Toast 提示
    pub toast: Option<Toast>,
    /// 配色
    pub colors: BarColors,
    /// 每帧渲染时缓存的可点击区域
    pub click_areas: ClickAreas,
    /// 是否退出
    pub should_quit: bool,
    handle: SyncHandle,
    events: Receiver<SyncEvent>,
}

impl App {
    pub fn new(mode: ThemeMode, handle: SyncHandle, events: Receiver<SyncEvent>) -> Self {
        Self {
            mode,
            last_origin: None,
            toast: None,
            colors: bar_colors(mode),
            click_areas: ClickAreas::default(),
            should_quit: false,
            handle,
            events,
        }
    }

    /// 请求切换（不阻塞，结果通过事件回来）
    pub fn request_toggle(&mut self) {
        if !self.handle.toggle() {
            self.show_toast("Theme sync stopped");
        }
    }

    /// 强制重新读取系统外观
    pub fn request_refresh(&mut self) {
        if !self.handle.signal() {
            self.show_toast("Theme sync stopped");
        }
    }

    /// 处理 worker 发布的事件
    pub fn poll_sync_events(&mut self) {
        loop {
            match self.events.try_recv() {
                Ok(SyncEvent::ModeChanged { mode, origin }) => {
                    self.mode = mode;
                    self.last_origin = Some(origin);
                    self.colors = bar_colors(mode);
                }
                Ok(SyncEvent::ApplyFailed { mode, error }) => {
                    self.toast = Some(Toast::new(
                        format!("Could not switch to {}: {}", mode, error),
                        Duration::from_secs(ERROR_TOAST_SECS),
                    ));
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    // worker 已退出，状态栏没有意义了
                    self.should_quit = true;
                    break;
                }
            }
        }
    }

    /// 显示 Toast 消息（2 秒后自动消失）
    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast::new(message, Duration::from_secs(2)));
    }

    /// 清理过期的 Toast
    pub fn update_toast(&mut self) {
        if self.toast.as_ref().is_some_and(Toast::is_expired) {
            self.toast = None;
        }
    }

    /// 退出应用
    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}
