//! Terminal lifecycle and main event loop.

use crate::config::Config;
use crate::reply::SimulatedReplyGenerator;
use crate::ui::conversation::{ConversationAction, ConversationManager};
use anyhow::Result;
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

/// Run the chat TUI until the user exits.
///
/// Sets up the terminal, multiplexes terminal events against a frame tick
/// with `tokio::select!`, polls the pending reply on every pass, and
/// restores the terminal on the way out.
pub async fn run(config: Config) -> Result<()> {
    let mut terminal = setup_terminal()?;

    let generator = SimulatedReplyGenerator::new(config.reply_delay());
    let mut manager = ConversationManager::new(Box::new(generator), &config);

    let result = event_loop(&mut terminal, &mut manager).await;

    restore_terminal(terminal)?;
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    manager: &mut ConversationManager,
) -> Result<()> {
    let mut event_stream = EventStream::new();
    let mut running = true;

    while running {
        terminal.draw(|frame| {
            manager.render_ui(frame.size(), frame.buffer_mut());
        })?;

        tokio::select! {
            maybe_event = event_stream.next() => {
                if let Some(Ok(Event::Key(key))) = maybe_event {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }

                    let quit = key.code == KeyCode::Esc
                        || (key.code == KeyCode::Char('c')
                            && key.modifiers.contains(KeyModifiers::CONTROL));
                    if quit {
                        tracing::info!("exit requested");
                        running = false;
                    } else if manager.handle_key(key) == ConversationAction::Exit {
                        running = false;
                    }
                }
            }

            // Frame tick keeps the thinking indicator animated and gives
            // the pending reply a chance to land without user input.
            _ = tokio::time::sleep(Duration::from_millis(100)) => {}
        }

        manager.poll_pending_reply();
    }

    Ok(())
}

/// Setup terminal for TUI rendering.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;

    Ok(terminal)
}

/// Restore terminal to normal mode.
fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}
