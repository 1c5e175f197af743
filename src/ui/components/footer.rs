use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::BarColors;

const SHORTCUTS: &[(&str, &str)] = &[
    ("Space", "toggle"),
    ("r", "refresh"),
    ("q", "quit"),
];

/// 渲染快捷键提示
pub fn render(frame: &mut Frame, area: Rect, colors: &BarColors) {
    let mut spans = Vec::new();
    spans.push(Span::raw(" "));

    for (i, (key, desc)) in SHORTCUTS.iter().enumerate() {
        spans.push(Span::styled(
            *key,
            Style::default()
                .fg(colors.highlight)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!(" {}", desc),
            Style::default().fg(colors.muted),
        ));

        if i < SHORTCUTS.len() - 1 {
            spans.push(Span::raw("   "));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
