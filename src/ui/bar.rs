use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use super::components::{footer, toast};
use crate::app::App;
use crate::sync::ChangeOrigin;

/// 标签宽度：" D "
const LABEL_WIDTH: u16 = 3;

/// 渲染状态栏
pub fn render(frame: &mut Frame, app: &mut App) {
    let colors = app.colors;
    let area = frame.area();

    frame.render_widget(Block::default().style(Style::default().bg(colors.bg)), area);

    let [bar_area, hint_area, toast_area, _] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(area);

    render_bar(frame, bar_area, app);
    footer::render(frame, hint_area, &colors);

    if let Some(ref t) = app.toast {
        toast::render(frame, toast_area, &t.message, &colors);
    }
}

fn render_bar(frame: &mut Frame, area: Rect, app: &mut App) {
    let colors = app.colors;

    let label_area = Rect::new(area.x, area.y, LABEL_WIDTH.min(area.width), area.height);
    app.click_areas.label = Some(label_area);

    let origin = match app.last_origin {
        Some(ChangeOrigin::External) => "  (changed outside)",
        _ => "",
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", app.mode.label()),
            Style::default()
                .fg(colors.label_fg)
                .bg(colors.label_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {}", app.mode.name()), Style::default().fg(colors.text)),
        Span::styled(origin, Style::default().fg(colors.muted)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}
