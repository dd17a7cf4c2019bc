mod app;
mod config;
mod events;
mod reply;
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::Config;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mockingbird")]
#[command(version)]
#[command(about = "Terminal chat widget with a simulated bot", long_about = None)]
struct Cli {
    /// Override the configured reply delay, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the resolved configuration and where it lives
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(delay_ms) = cli.delay_ms {
        config.reply_delay_ms = delay_ms;
    }

    match cli.command {
        Some(Commands::Config) => {
            print_config(&config)?;
            Ok(())
        }
        None => {
            init_tracing()?;
            app::run(config).await
        }
    }
}

fn print_config(config: &Config) -> Result<()> {
    let path = Config::config_path()?;
    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(config).context("Failed to serialize config")?);
    Ok(())
}

/// Log to a file under the config directory; stdout belongs to the TUI.
fn init_tracing() -> Result<()> {
    let log_path = Config::log_path()?;
    let log_file = std::fs::File::create(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .compact()
        .init();

    Ok(())
}
