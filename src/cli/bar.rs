//! bar 子命令：终端里的常驻状态栏

use std::io::{self, Write};
use std::process::ExitCode;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::app::App;
use crate::error::Result;
use crate::event;
use crate::gateway::SystemGateway;
use crate::notification;
use crate::storage::config::Config;
use crate::sync::{SyncWorker, ThemeSync};
use crate::ui;

pub fn execute(config: &Config) -> Result<ExitCode> {
    // 冷启动读取在 UI 出现之前完成
    let mut sync = ThemeSync::new(SystemGateway::new(config.gateway.clone()));
    let events = sync.subscribe();
    let initial = sync.current_mode();

    let worker = SyncWorker::spawn(sync)?;
    let listener = match notification::spawn_listener(&config.listener, worker.handle()) {
        Ok(listener) => {
            tracing::info!(source = ?listener.source(), mode = %initial, "status bar started");
            Some(listener)
        }
        Err(e) => {
            tracing::warn!(error = %e, "running without appearance listener");
            None
        }
    };

    let mut app = App::new(initial, worker.handle(), events);
    if listener.is_none() {
        app.show_toast("Not listening for outside changes; press r to refresh");
    }

    // 初始化终端
    let mut terminal = ratatui::init();
    let result = with_mouse_capture(io::stdout(), || run(&mut terminal, &mut app));

    // 恢复终端，出错时同样要收尾
    ratatui::restore();

    if let Some(listener) = listener {
        listener.stop();
    }
    let final_mode = worker.join();
    tracing::info!(?final_mode, "status bar closed");

    result?;
    Ok(ExitCode::SUCCESS)
}

/// 开启鼠标捕获后执行 `body`，结束时（包括开启失败）关闭捕获
fn with_mouse_capture<W: Write>(
    mut out: W,
    body: impl FnOnce() -> io::Result<()>,
) -> io::Result<()> {
    let result = execute!(out, EnableMouseCapture).and_then(|()| body());
    if let Err(e) = execute!(out, DisableMouseCapture) {
        tracing::warn!(error = %e, "could not disable mouse capture");
    }
    result
}

fn run(terminal: &mut DefaultTerminal, app: &mut App) -> io::Result<()> {
    loop {
        // 先吸收 worker 的事件，保证这一帧显示最新状态
        app.poll_sync_events();

        app.click_areas.reset();
        terminal.draw(|frame| ui::bar::render(frame, app))?;

        if !event::handle_events(app)? {
            break;
        }
    }
    Ok(())
}
