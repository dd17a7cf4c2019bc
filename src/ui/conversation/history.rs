//! Conversation log display component.

use crate::events::{Message, Role, Sentiment, GREETING};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};
use std::collections::VecDeque;

/// Ordered, insertion-ordered message log. Seeded with the bot greeting so
/// it is never empty; messages are never edited once appended.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    messages: VecDeque<Message>,
    max_messages: usize,
}

impl ConversationHistory {
    pub fn new(max_messages: usize) -> Self {
        let mut history = Self {
            messages: VecDeque::new(),
            // A zero cap would pop the seed right back out; the log must
            // always hold at least one message.
            max_messages: max_messages.max(1),
        };
        history.add_message(Message::bot(GREETING.to_string(), Sentiment::Neutral));
        history
    }

    pub fn add_message(&mut self, message: Message) {
        self.messages.push_back(message);

        if self.messages.len() > self.max_messages {
            self.messages.pop_front();
        }
    }

    pub fn add_user_message(&mut self, content: String) {
        self.add_message(Message::user(content));
    }

    pub fn add_bot_message(&mut self, content: String, sentiment: Sentiment) {
        self.add_message(Message::bot(content, sentiment));
    }

    /// Reset the log back to the seed greeting.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.add_message(Message::bot(GREETING.to_string(), Sentiment::Neutral));
    }

    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn last_message(&self) -> &Message {
        // The log is never empty by construction.
        self.messages.back().expect("history is seeded")
    }
}

impl Widget for ConversationHistory {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default().borders(Borders::ALL).title("Conversation");

        let inner_area = block.inner(area);
        block.render(area, buf);

        let mut all_lines: Vec<Line> = Vec::new();
        for message in self.messages.iter() {
            let mut lines = self.render_message(message, inner_area.width);
            all_lines.append(&mut lines);
            // spacing between messages
            all_lines.push(Line::from(vec![Span::raw("")]));
        }

        // Show the tail of the conversation, newest at the bottom.
        let height = inner_area.height as usize;
        let total = all_lines.len();
        let start = total.saturating_sub(height);
        let visible = &all_lines[start..];

        for (i, line) in visible.iter().enumerate() {
            buf.set_line(inner_area.x, inner_area.y + i as u16, line, inner_area.width);
        }
    }
}

impl ConversationHistory {
    /// Render a single message into lines.
    fn render_message(&self, message: &Message, width: u16) -> Vec<Line> {
        let mut lines = Vec::new();

        let role_label = match message.role {
            Role::User => "You",
            Role::Bot => "Bot",
        };

        let timestamp = message.timestamp.format("%H:%M:%S").to_string();
        let header = format!("{} {} {}", role_label, timestamp, "─".repeat(20));

        lines.push(Line::from(vec![Span::styled(
            header,
            Style::default().fg(Color::DarkGray),
        )]));

        let content_lines = wrap_text(&message.content, width.saturating_sub(4) as usize);
        let last = content_lines.len().saturating_sub(1);
        for (i, content_line) in content_lines.into_iter().enumerate() {
            let mut spans = vec![
                Span::raw("  "),
                Span::styled(content_line, self.content_style(message.role)),
            ];
            // Sentiment glyph after the final line, bot messages only.
            if i == last && message.role == Role::Bot {
                spans.push(Span::raw(" "));
                spans.push(Span::raw(message.sentiment.glyph()));
            }
            lines.push(Line::from(spans));
        }

        lines
    }

    fn content_style(&self, role: Role) -> Style {
        match role {
            Role::User => Style::default().fg(Color::Blue),
            Role::Bot => Style::default().fg(Color::Green),
        }
    }
}

/// Wrap text to fit within the given width, breaking on whitespace.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if current_line.len() + word.len() + 1 <= width {
            if !current_line.is_empty() {
                current_line.push(' ');
            }
            current_line.push_str(word);
        } else {
            if !current_line.is_empty() {
                lines.push(current_line);
                current_line = String::new();
            }
            current_line.push_str(word);
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}
