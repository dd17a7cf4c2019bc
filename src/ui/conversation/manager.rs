use crate::config::Config;
use crate::events::{Sentiment, FALLBACK_REPLY};
use crate::reply::{BotReply, ReplyGenerator};
use crate::ui::conversation::{
    get_help_text, ComposerResult, ConversationComposer, ConversationHistory, ReplyIndicator,
    SlashCommand,
};
use anyhow::anyhow;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Widget,
};
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

/// Actions the conversation manager asks the app shell to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationAction {
    None,
    Exit,
}

/// Owns the conversation state and drives its two-state machine: idle, or
/// awaiting a single in-flight reply. At most one reply is pending at a
/// time; while one is, further submissions are inert (typing still works).
pub struct ConversationManager {
    history: ConversationHistory,
    composer: ConversationComposer,
    indicator: ReplyIndicator,
    generator: Box<dyn ReplyGenerator>,
    pending_reply: Option<oneshot::Receiver<anyhow::Result<BotReply>>>,
    last_sentiment: Sentiment,
}

impl ConversationManager {
    pub fn new(generator: Box<dyn ReplyGenerator>, config: &Config) -> Self {
        let mut composer = ConversationComposer::new("Type your message...".to_string());
        composer.set_focus(true);

        Self {
            history: ConversationHistory::new(config.max_history),
            composer,
            indicator: ReplyIndicator::new(),
            generator,
            pending_reply: None,
            last_sentiment: Sentiment::Neutral,
        }
    }

    /// Handle key input.
    pub fn handle_key(&mut self, key: crossterm::event::KeyEvent) -> ConversationAction {
        match self.composer.handle_key(key) {
            ComposerResult::Submitted(text) => {
                self.submit(text);
                ConversationAction::None
            }
            ComposerResult::Command(command) => self.handle_slash_command(command),
            ComposerResult::None => ConversationAction::None,
        }
    }

    /// Accept a submission: append the user message, clear the draft, and
    /// ask the generator for a reply. Blank input and submissions while a
    /// reply is already in flight are silently ignored.
    pub fn submit(&mut self, text: String) {
        if self.is_waiting() || text.trim().is_empty() {
            return;
        }

        tracing::debug!(chars = text.len(), "user message submitted");
        self.history.add_user_message(text.clone());
        self.composer.clear();
        self.pending_reply = Some(self.generator.generate(&text));
        self.indicator.set_waiting(true);
    }

    /// Poll the in-flight reply, if any. Called from the main loop on every
    /// pass; a closed channel counts as a generation failure.
    pub fn poll_pending_reply(&mut self) {
        let Some(rx) = self.pending_reply.as_mut() else {
            return;
        };

        let outcome = match rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(anyhow!("reply generator went away"))),
        };

        if let Some(result) = outcome {
            self.pending_reply = None;
            self.indicator.set_waiting(false);
            self.apply_reply(result);
        }
    }

    /// Append the resolved (or failed) bot reply and return to idle.
    fn apply_reply(&mut self, result: anyhow::Result<BotReply>) {
        match result {
            Ok(reply) => {
                tracing::debug!(sentiment = reply.sentiment.display_name(), "reply resolved");
                self.append_bot_message(reply.content, reply.sentiment);
            }
            Err(err) => {
                // Never surfaced to the user as an error; translated into a
                // canned reply so every failure path stays renderable.
                tracing::warn!(error = %err, "reply generation failed");
                self.append_bot_message(FALLBACK_REPLY.to_string(), Sentiment::Negative);
            }
        }
    }

    fn append_bot_message(&mut self, content: String, sentiment: Sentiment) {
        self.last_sentiment = sentiment;
        self.history.add_bot_message(content, sentiment);
    }

    fn handle_slash_command(&mut self, command: SlashCommand) -> ConversationAction {
        match command {
            SlashCommand::Help => {
                self.append_bot_message(get_help_text(), Sentiment::Neutral);
                ConversationAction::None
            }
            SlashCommand::Clear => {
                self.history.reset();
                self.last_sentiment = Sentiment::Neutral;
                ConversationAction::None
            }
            SlashCommand::Bye => ConversationAction::Exit,
        }
    }

    /// True while a reply is in flight.
    pub fn is_waiting(&self) -> bool {
        self.pending_reply.is_some()
    }

    /// The not-yet-submitted text in the input field.
    pub fn draft(&self) -> &str {
        self.composer.content()
    }

    /// Sentiment of the most recently appended bot message.
    pub fn last_sentiment(&self) -> Sentiment {
        self.last_sentiment
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Render the conversation UI: log on top, composer below, status last.
    pub fn render_ui(&self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(10),
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(area);

        self.history.clone().render(chunks[0], buf);
        self.indicator.clone().render(chunks[1], buf);
        self.composer.clone().render(chunks[2], buf);
        self.render_status_line(chunks[3], buf);
    }

    fn render_status_line(&self, area: Rect, buf: &mut Buffer) {
        let status = Line::from(vec![
            Span::styled("Sentiment: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!(
                    "{} {}",
                    self.last_sentiment.glyph(),
                    self.last_sentiment.display_name()
                ),
                Style::default().fg(match self.last_sentiment {
                    Sentiment::Positive => Color::Green,
                    Sentiment::Negative => Color::Red,
                    Sentiment::Neutral => Color::Gray,
                }),
            ),
            Span::styled(
                "  |  Enter to send, /help for commands, Esc to quit",
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        buf.set_line(area.x, area.y, &status, area.width);
    }
}
