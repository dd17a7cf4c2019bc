use crate::ui::conversation::commands::{
    command_entries, parse_slash_command, CommandEntry, SlashCommand,
};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

/// Result returned when the user interacts with the composer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposerResult {
    /// Enter was pressed on a non-blank draft. The draft is NOT cleared
    /// here; the manager clears it only when it accepts the submission.
    Submitted(String),
    /// A slash command was entered. The draft is cleared immediately.
    Command(SlashCommand),
    None,
}

/// Text input component owning the draft text and cursor.
#[derive(Debug, Clone)]
pub struct ConversationComposer {
    content: String,
    /// Byte offset into `content`, always on a char boundary.
    cursor: usize,
    placeholder: String,
    has_focus: bool,
    command_entries: Vec<CommandEntry>,
    filtered_commands: Vec<CommandEntry>,
    show_command_palette: bool,
    selected_command: Option<usize>,
}

impl ConversationComposer {
    pub fn new(placeholder: String) -> Self {
        Self {
            content: String::new(),
            cursor: 0,
            placeholder,
            has_focus: false,
            command_entries: command_entries(),
            filtered_commands: Vec::new(),
            show_command_palette: false,
            selected_command: None,
        }
    }

    /// Handle key input. Every keystroke updates the draft unconditionally;
    /// there is no validation, debouncing, or length limit.
    pub fn handle_key(&mut self, key: KeyEvent) -> ComposerResult {
        if key.kind != KeyEventKind::Press {
            return ComposerResult::None;
        }

        match key.code {
            KeyCode::Enter => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.insert_char('\n');
                } else if self.show_command_palette {
                    self.apply_selected_command();
                } else if !self.content.trim().is_empty() {
                    if let Some(command) = parse_slash_command(&self.content) {
                        self.clear();
                        return ComposerResult::Command(command);
                    }
                    return ComposerResult::Submitted(self.content.clone());
                }
            }
            KeyCode::Up => {
                if self.show_command_palette {
                    self.move_command_selection(-1);
                }
            }
            KeyCode::Down => {
                if self.show_command_palette {
                    self.move_command_selection(1);
                }
            }
            KeyCode::Esc => {
                if self.show_command_palette {
                    self.close_command_palette();
                }
            }
            KeyCode::Tab => {
                if self.show_command_palette {
                    self.apply_selected_command();
                }
            }
            KeyCode::Char(c) => {
                if c == '/' && self.content.is_empty() {
                    self.insert_char(c);
                    self.open_command_palette();
                    return ComposerResult::None;
                }

                self.insert_char(c);

                if self.show_command_palette {
                    if self.content.starts_with('/') && !c.is_whitespace() {
                        self.refresh_command_palette();
                    } else {
                        self.close_command_palette();
                    }
                }
            }
            KeyCode::Backspace => {
                if self.backspace() && self.show_command_palette {
                    if self.content.starts_with('/') {
                        self.refresh_command_palette();
                    } else {
                        self.close_command_palette();
                    }
                }
            }
            KeyCode::Delete => {
                self.delete();
            }
            KeyCode::Left => {
                self.cursor = prev_boundary(&self.content, self.cursor);
            }
            KeyCode::Right => {
                self.cursor = next_boundary(&self.content, self.cursor);
            }
            KeyCode::Home => {
                self.cursor = 0;
            }
            KeyCode::End => {
                self.cursor = self.content.len();
            }
            _ => {}
        }

        ComposerResult::None
    }

    fn insert_char(&mut self, c: char) {
        self.content.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Delete character before cursor.
    fn backspace(&mut self) -> bool {
        if self.cursor > 0 {
            let prev = prev_boundary(&self.content, self.cursor);
            self.content.remove(prev);
            self.cursor = prev;
            true
        } else {
            false
        }
    }

    /// Delete character at cursor.
    fn delete(&mut self) -> bool {
        if self.cursor < self.content.len() {
            self.content.remove(self.cursor);
            true
        } else {
            false
        }
    }

    fn open_command_palette(&mut self) {
        self.show_command_palette = true;
        self.refresh_command_palette();
        self.selected_command = Some(0);
    }

    fn close_command_palette(&mut self) {
        self.show_command_palette = false;
        self.filtered_commands.clear();
        self.selected_command = None;
    }

    fn refresh_command_palette(&mut self) {
        let query = self.content.trim_start_matches('/').to_lowercase();
        self.filtered_commands.clear();

        for entry in &self.command_entries {
            if query.is_empty() || entry.keyword.starts_with(&query) {
                self.filtered_commands.push(*entry);
            }
        }

        if self.filtered_commands.is_empty() {
            // No match: let the input fall through as an ordinary message.
            self.close_command_palette();
        } else {
            let index = self.selected_command.unwrap_or(0);
            self.selected_command = Some(index.min(self.filtered_commands.len() - 1));
        }
    }

    fn move_command_selection(&mut self, delta: isize) {
        if self.filtered_commands.is_empty() {
            self.selected_command = None;
            return;
        }

        let current = self.selected_command.unwrap_or(0) as isize;
        let len = self.filtered_commands.len() as isize;
        let next = (current + delta).rem_euclid(len);
        self.selected_command = Some(next as usize);
    }

    fn apply_selected_command(&mut self) {
        let Some(index) = self.selected_command else {
            return;
        };
        let Some(entry) = self.filtered_commands.get(index).copied() else {
            return;
        };

        self.content = format!("/{}", entry.keyword);
        self.cursor = self.content.len();
        self.close_command_palette();
    }

    pub fn set_focus(&mut self, has_focus: bool) {
        self.has_focus = has_focus;
    }

    /// Current draft text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Clear the draft. Called by the manager when a submission is accepted.
    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
        self.close_command_palette();
    }
}

fn prev_boundary(s: &str, pos: usize) -> usize {
    s[..pos].char_indices().last().map(|(i, _)| i).unwrap_or(0)
}

fn next_boundary(s: &str, pos: usize) -> usize {
    s[pos..]
        .chars()
        .next()
        .map(|c| pos + c.len_utf8())
        .unwrap_or(pos)
}

impl Widget for ConversationComposer {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Message")
            .style(if self.has_focus {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Gray)
            });

        let inner_area = block.inner(area);
        block.render(area, buf);

        if self.content.is_empty() {
            let placeholder_line = Line::from(vec![Span::styled(
                &self.placeholder,
                Style::default().fg(Color::DarkGray),
            )]);
            buf.set_line(inner_area.x, inner_area.y, &placeholder_line, inner_area.width);
        } else {
            let mut content = self.content.clone();
            if self.has_focus {
                content.insert(self.cursor.min(content.len()), '▌');
            }

            for (i, line_text) in content.split('\n').enumerate() {
                if i < inner_area.height as usize {
                    let line = Line::from(vec![Span::raw(line_text)]);
                    buf.set_line(inner_area.x, inner_area.y + i as u16, &line, inner_area.width);
                }
            }
        }

        if self.show_command_palette {
            let palette_height = (self.filtered_commands.len().min(5) + 2) as u16;
            let palette_area = Rect {
                x: inner_area.x,
                y: inner_area.y.saturating_sub(palette_height),
                width: inner_area.width,
                height: palette_height,
            };

            let block = Block::default()
                .borders(Borders::ALL)
                .title("Commands")
                .style(Style::default().fg(Color::Blue));
            let inner = block.inner(palette_area);
            block.render(palette_area, buf);

            for (index, entry) in self.filtered_commands.iter().enumerate() {
                if index >= inner.height as usize {
                    break;
                }

                let is_selected = self.selected_command == Some(index);
                let style = if is_selected {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };

                let line = Line::from(vec![
                    Span::styled(format!("/{}", entry.keyword), style),
                    Span::styled(" - ", Style::default().fg(Color::DarkGray)),
                    Span::styled(entry.description, Style::default().fg(Color::Gray)),
                ]);

                buf.set_line(inner.x, inner.y + index as u16, &line, inner.width);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(composer: &mut ConversationComposer, text: &str) {
        for c in text.chars() {
            composer.handle_key(press(KeyCode::Char(c)));
        }
    }

    #[test]
    fn typing_updates_the_draft() {
        let mut composer = ConversationComposer::new("...".to_string());
        type_str(&mut composer, "hello");
        assert_eq!(composer.content(), "hello");
    }

    #[test]
    fn backspace_and_cursor_movement() {
        let mut composer = ConversationComposer::new("...".to_string());
        type_str(&mut composer, "abc");
        composer.handle_key(press(KeyCode::Left));
        composer.handle_key(press(KeyCode::Backspace));
        assert_eq!(composer.content(), "ac");
        composer.handle_key(press(KeyCode::End));
        composer.handle_key(press(KeyCode::Backspace));
        assert_eq!(composer.content(), "a");
    }

    #[test]
    fn cursor_handles_multibyte_chars() {
        let mut composer = ConversationComposer::new("...".to_string());
        type_str(&mut composer, "héllo");
        composer.handle_key(press(KeyCode::Home));
        composer.handle_key(press(KeyCode::Right));
        composer.handle_key(press(KeyCode::Right));
        composer.handle_key(press(KeyCode::Backspace));
        assert_eq!(composer.content(), "hllo");
    }

    #[test]
    fn enter_submits_without_clearing_the_draft() {
        let mut composer = ConversationComposer::new("...".to_string());
        type_str(&mut composer, "hi there");
        let result = composer.handle_key(press(KeyCode::Enter));
        assert_eq!(result, ComposerResult::Submitted("hi there".to_string()));
        assert_eq!(composer.content(), "hi there");
    }

    #[test]
    fn enter_on_blank_draft_does_nothing() {
        let mut composer = ConversationComposer::new("...".to_string());
        type_str(&mut composer, "   ");
        let result = composer.handle_key(press(KeyCode::Enter));
        assert_eq!(result, ComposerResult::None);
        assert_eq!(composer.content(), "   ");
    }

    #[test]
    fn slash_command_is_recognized_and_clears_the_draft() {
        let mut composer = ConversationComposer::new("...".to_string());
        type_str(&mut composer, "/bye");
        // Palette opened on '/'; Esc dismisses it, Enter then submits.
        composer.handle_key(press(KeyCode::Esc));
        let result = composer.handle_key(press(KeyCode::Enter));
        assert_eq!(result, ComposerResult::Command(SlashCommand::Bye));
        assert_eq!(composer.content(), "");
    }

    #[test]
    fn palette_completion_fills_the_command() {
        let mut composer = ConversationComposer::new("...".to_string());
        type_str(&mut composer, "/he");
        composer.handle_key(press(KeyCode::Tab));
        assert_eq!(composer.content(), "/help");
        let result = composer.handle_key(press(KeyCode::Enter));
        assert_eq!(result, ComposerResult::Command(SlashCommand::Help));
    }

    #[test]
    fn shift_enter_inserts_a_newline() {
        let mut composer = ConversationComposer::new("...".to_string());
        type_str(&mut composer, "ab");
        composer.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::SHIFT));
        assert_eq!(composer.content(), "ab\n");
    }
}
