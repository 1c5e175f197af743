use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::Paragraph,
    Frame,
};

use crate::theme::BarColors;

/// 在状态栏下方显示一行 Toast 消息，过长时截断
pub fn render(frame: &mut Frame, area: Rect, message: &str, colors: &BarColors) {
    let width = area.width as usize;
    let text = if message.chars().count() + 1 > width {
        let kept: String = message.chars().take(width.saturating_sub(2)).collect();
        format!(" {}…", kept)
    } else {
        format!(" {}", message)
    };

    let toast = Paragraph::new(text).style(
        Style::default()
            .fg(colors.error)
            .add_modifier(Modifier::BOLD),
    );

    frame.render_widget(toast, area);
}
