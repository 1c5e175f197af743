//! 测试用 Gateway：可编程的系统外观，不启动任何进程

use std::sync::{Arc, Mutex};

use super::ThemeGateway;
use crate::error::GatewayError;
use crate::theme::ThemeMode;

#[derive(Debug)]
struct MockState {
    os_mode: ThemeMode,
    echo: bool,
    apply_failure: Option<String>,
    applied: Vec<ThemeMode>,
    queries: usize,
}

/// Clone 之后共享同一份状态，测试里可以在 gateway 被移走后继续观察
#[derive(Debug, Clone)]
pub struct MockGateway {
    state: Arc<Mutex<MockState>>,
}

impl MockGateway {
    /// apply 不会改变 os_mode
    pub fn new(os_mode: ThemeMode) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                os_mode,
                echo: false,
                apply_failure: None,
                applied: Vec::new(),
                queries: 0,
            })),
        }
    }

    /// apply 成功时同步修改 os_mode，模拟真实系统
    pub fn echoing(os_mode: ThemeMode) -> Self {
        let gateway = Self::new(os_mode);
        gateway.state.lock().unwrap().echo = true;
        gateway
    }

    /// 外部程序（系统设置等）修改了外观
    pub fn set_os_mode(&self, mode: ThemeMode) {
        self.state.lock().unwrap().os_mode = mode;
    }

    /// 之后的 apply 都以此 stderr 失败
    pub fn fail_applies_with(&self, stderr: &str) {
        self.state.lock().unwrap().apply_failure = Some(stderr.to_string());
    }

    pub fn applied(&self) -> Vec<ThemeMode> {
        self.state.lock().unwrap().applied.clone()
    }

    pub fn query_count(&self) -> usize {
        self.state.lock().unwrap().queries
    }
}

impl ThemeGateway for MockGateway {
    fn query_current_mode(&self) -> ThemeMode {
        let mut state = self.state.lock().unwrap();
        state.queries += 1;
        state.os_mode
    }

    fn apply_mode(&self, mode: ThemeMode) -> Result<(), GatewayError> {
        let mut state = self.state.lock().unwrap();
        if let Some(stderr) = &state.apply_failure {
            return Err(GatewayError::NonZeroExit {
                program: "osascript".to_string(),
                code: Some(1),
                stderr: stderr.clone(),
            });
        }
        state.applied.push(mode);
        if state.echo {
            state.os_mode = mode;
        }
        Ok(())
    }
}
