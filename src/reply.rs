//! Reply generation.
//!
//! The conversation manager never talks to a backend directly; it asks a
//! [`ReplyGenerator`] for a reply and polls the returned channel from the
//! main loop. Swapping the simulator for a real inference call only means
//! providing another implementation of the trait.

use crate::events::Sentiment;
use anyhow::Result;
use std::time::Duration;
use tokio::sync::oneshot;

/// What a generator resolves with: the reply text plus its sentiment label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotReply {
    pub content: String,
    pub sentiment: Sentiment,
}

/// Asynchronous source of bot replies.
///
/// `generate` must not block; the reply (or failure) arrives later on the
/// returned channel. A dropped sender is treated as a failure by the caller.
pub trait ReplyGenerator: Send {
    fn generate(&self, text: &str) -> oneshot::Receiver<Result<BotReply>>;
}

/// Mock generator: after a fixed delay, echoes the user's text back and
/// flips a coin between positive and negative sentiment. Generated replies
/// are never neutral; only the seed greeting is.
pub struct SimulatedReplyGenerator {
    delay: Duration,
}

impl SimulatedReplyGenerator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl ReplyGenerator for SimulatedReplyGenerator {
    fn generate(&self, text: &str) -> oneshot::Receiver<Result<BotReply>> {
        let (tx, rx) = oneshot::channel();
        let delay = self.delay;
        let text = text.to_string();

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let sentiment = if rand::random::<bool>() {
                Sentiment::Positive
            } else {
                Sentiment::Negative
            };
            let reply = BotReply {
                content: format!("You said: '{}'", text),
                sentiment,
            };
            // Receiver may be gone if the app exited mid-delay.
            let _ = tx.send(Ok(reply));
        });

        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn simulated_reply_echoes_input() {
        let generator = SimulatedReplyGenerator::new(Duration::from_millis(1000));
        let rx = generator.generate("hello");

        let reply = rx.await.expect("sender dropped").expect("generation failed");
        assert_eq!(reply.content, "You said: 'hello'");
        assert!(matches!(
            reply.sentiment,
            Sentiment::Positive | Sentiment::Negative
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_reply_is_not_ready_before_the_delay() {
        let generator = SimulatedReplyGenerator::new(Duration::from_millis(1000));
        let mut rx = generator.generate("hi");
        // Let the spawned task register its sleep before advancing the clock.
        tokio::task::yield_now().await;

        tokio::time::advance(Duration::from_millis(500)).await;
        tokio::task::yield_now().await;
        assert!(matches!(
            rx.try_recv(),
            Err(oneshot::error::TryRecvError::Empty)
        ));

        tokio::time::advance(Duration::from_millis(600)).await;
        tokio::task::yield_now().await;
        let reply = rx.try_recv().expect("reply due after the delay").unwrap();
        assert_eq!(reply.content, "You said: 'hi'");
    }
}
