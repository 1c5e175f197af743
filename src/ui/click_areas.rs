use ratatui::layout::Rect;

/// 每帧渲染时缓存的可点击区域
#[derive(Debug, Default, Clone)]
pub struct ClickAreas {
    /// 模式标签（点击切换）
    pub label: Option<Rect>,
}

impl ClickAreas {
    pub fn reset(&mut self) {
        self.label = None;
    }
}

/// 检查坐标 (col, row) 是否在 Rect 内
pub fn contains(rect: &Rect, col: u16, row: u16) -> bool {
    col >= rect.x
        && col < rect.x + rect.width
        && row >= rect.y
        && row < rect.y + rect.height
}
