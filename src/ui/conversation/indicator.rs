use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// One-line "thinking" indicator shown while a reply is in flight.
#[derive(Debug, Clone, Default)]
pub struct ReplyIndicator {
    is_waiting: bool,
}

impl ReplyIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_waiting(&mut self, is_waiting: bool) {
        self.is_waiting = is_waiting;
    }
}

impl Widget for ReplyIndicator {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.is_waiting {
            return;
        }

        let dots = match (std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis()
            / 300)
            % 4
        {
            0 => ".",
            1 => "..",
            2 => "...",
            _ => "   ",
        };

        let indicator = Line::from(vec![
            Span::styled("Bot is thinking", Style::default().fg(Color::Green)),
            Span::styled(dots, Style::default().fg(Color::Yellow)),
        ]);
        buf.set_line(area.x, area.y, &indicator, area.width);
    }
}
