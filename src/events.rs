//! Shared conversation types.

/// Coarse classification label attached to every message, display-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn display_name(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }

    /// Glyph shown next to bot messages.
    pub fn glyph(&self) -> &'static str {
        match self {
            Sentiment::Positive => "🙂",
            Sentiment::Negative => "🙁",
            Sentiment::Neutral => "•",
        }
    }
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Bot,
}

/// A single entry in the conversation log. Immutable once appended.
#[derive(Debug, Clone)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub sentiment: Sentiment,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl Message {
    /// User messages always carry a neutral label.
    pub fn user(content: String) -> Self {
        Self {
            role: Role::User,
            content,
            sentiment: Sentiment::Neutral,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn bot(content: String, sentiment: Sentiment) -> Self {
        Self {
            role: Role::Bot,
            content,
            sentiment,
            timestamp: chrono::Utc::now(),
        }
    }
}

/// Seed message shown when a conversation starts.
pub const GREETING: &str = "How can I help?";

/// Canned bot message appended when reply generation fails.
pub const FALLBACK_REPLY: &str = "Sorry, I'm having trouble understanding.";
