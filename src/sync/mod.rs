//! Theme Synchronization State Machine
//!
//! 持有"本进程认为当前是什么外观"的唯一状态。对外只有两个入口：
//!
//! - [`ThemeSync::toggle`]：用户点击，立即更新本地状态，然后（非吸收期间）调用 Gateway 修改系统
//! - [`ThemeSync::refresh_from_external_signal`]：收到"外观可能变了"的通知，重新查询系统
//!
//! 通知不携带任何信息（谁改的、改成什么），所以 refresh 总是重新查询。
//! 本进程 apply 后自己广播的通知也会回到这里（echo），此时查询结果与缓存一致，是 no-op；
//! 真正由外部引起的变化在吸收标志保护下写入，不会再反向 apply 给系统。

mod worker;

use std::sync::mpsc::{self, Receiver, Sender};

use crate::gateway::ThemeGateway;
use crate::theme::ThemeMode;

pub use worker::{SyncCommand, SyncHandle, SyncWorker};

/// 运行时状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynchronizationState {
    /// 最近一次已知 / 认定的外观
    pub current_mode: ThemeMode,
    /// 仅在写入外部来源的变化期间为 true
    pub is_absorbing_external_update: bool,
}

/// 变化来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// 本进程 toggle
    Local,
    /// 系统 / 其他程序
    External,
}

/// 发布给订阅者（UI）的事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    ModeChanged { mode: ThemeMode, origin: ChangeOrigin },
    /// apply 失败；本地状态保持用户意图，不回滚
    ApplyFailed { mode: ThemeMode, error: String },
}

/// 主题同步状态机
pub struct ThemeSync<G> {
    gateway: G,
    state: SynchronizationState,
    subscribers: Vec<Sender<SyncEvent>>,
}

impl<G: ThemeGateway> ThemeSync<G> {
    /// 冷启动：向 Gateway 查询当前外观（阻塞）
    pub fn new(gateway: G) -> Self {
        let mode = gateway.query_current_mode();
        tracing::info!(%mode, "initial appearance");
        Self::with_mode(gateway, mode)
    }

    /// 以已知外观创建，不查询
    pub fn with_mode(gateway: G, mode: ThemeMode) -> Self {
        Self {
            gateway,
            state: SynchronizationState {
                current_mode: mode,
                is_absorbing_external_update: false,
            },
            subscribers: Vec::new(),
        }
    }

    pub fn current_mode(&self) -> ThemeMode {
        self.state.current_mode
    }

    pub fn state(&self) -> SynchronizationState {
        self.state
    }

    pub fn is_absorbing(&self) -> bool {
        self.state.is_absorbing_external_update
    }

    /// 订阅状态变化。事件在本地状态更新之后、外部 apply 之前发出
    pub fn subscribe(&mut self) -> Receiver<SyncEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Dark ↔ Light
    pub fn toggle(&mut self) {
        let next = self.state.current_mode.toggled();
        tracing::info!(from = %self.state.current_mode, to = %next, "toggle");
        self.set_mode(next, ChangeOrigin::Local);
    }

    /// 重新查询系统外观，不同则在吸收标志保护下写入缓存
    pub fn refresh_from_external_signal(&mut self) {
        let observed = self.gateway.query_current_mode();
        if observed == self.state.current_mode {
            tracing::debug!(mode = %observed, "external signal: already in sync");
            return;
        }

        tracing::info!(from = %self.state.current_mode, to = %observed, "external appearance change");
        self.state.is_absorbing_external_update = true;
        self.set_mode(observed, ChangeOrigin::External);
        self.state.is_absorbing_external_update = false;
    }

    /// 所有状态修改的唯一路径
    fn set_mode(&mut self, mode: ThemeMode, origin: ChangeOrigin) {
        self.state.current_mode = mode;
        self.publish(SyncEvent::ModeChanged { mode, origin });

        if self.state.is_absorbing_external_update {
            tracing::debug!(%mode, "absorbing external update, not applying");
            return;
        }

        if let Err(e) = self.gateway.apply_mode(mode) {
            // 不回滚：下一次通知 / toggle 会重新对齐
            tracing::warn!(%mode, error = %e, diagnostic = e.diagnostic(), "apply failed");
            self.publish(SyncEvent::ApplyFailed {
                mode,
                error: e.to_string(),
            });
        }
    }

    fn publish(&mut self, event: SyncEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
