//! Conversation UI components for the chat interface.

pub mod commands;
pub mod composer;
pub mod history;
pub mod indicator;
pub mod manager;

pub use commands::{get_help_text, SlashCommand};
pub use composer::{ComposerResult, ConversationComposer};
pub use history::ConversationHistory;
pub use indicator::ReplyIndicator;
pub use manager::{ConversationAction, ConversationManager};
