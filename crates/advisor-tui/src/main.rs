use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use advisor_core::Config;

mod app;
mod content;
mod handler;
mod tui;
mod ui;

use app::App;
use tui::EventHandler;

#[derive(Parser)]
#[command(name = "myadvisor")]
#[command(version, about = "Academic and course planning chat assistant for UW students")]
struct Cli {
    /// Advisor service endpoint (canned offline replies when unset)
    #[arg(long, env = "MYADVISOR_ENDPOINT")]
    endpoint: Option<String>,

    /// Delay before an offline reply, in milliseconds
    #[arg(long)]
    stub_delay_ms: Option<u64>,

    /// Seconds to wait for the advisor service before apologizing
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Write logs here instead of the default data directory
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_else(|err| {
        eprintln!("Ignoring unreadable config: {}", err);
        Config::new()
    });
    config.apply_endpoint_override(cli.endpoint);
    if cli.stub_delay_ms.is_some() {
        config.stub_delay_ms = cli.stub_delay_ms;
    }
    if cli.timeout.is_some() {
        config.response_timeout_secs = cli.timeout;
    }
    if cli.log_file.is_some() {
        config.log_file = cli.log_file;
    }

    init_logging(&config)?;
    tracing::info!("Starting MyAdvisor v{}", env!("CARGO_PKG_VERSION"));

    let mut app = App::from_config(&config);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app).await;
    tui::restore()?;

    if let Err(err) = &result {
        tracing::error!(error = %err, "exiting after error");
    }
    result
}

async fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    let mut events = EventHandler::new();

    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        let awaiting_reply = app.is_thinking();
        tokio::select! {
            event = events.next() => match event {
                Some(event) => handler::handle_event(app, event),
                None => break,
            },
            _ = app.await_reply(), if awaiting_reply => {}
        }
    }

    Ok(())
}

/// Log to a file: the terminal itself belongs to the UI
fn init_logging(config: &Config) -> Result<()> {
    let Some(path) = config.log_path() else {
        return Ok(());
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("myadvisor=info,advisor_core=info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_must_be_positive() {
        assert!(Cli::try_parse_from(["myadvisor", "--timeout", "0"]).is_err());

        let cli = Cli::try_parse_from(["myadvisor", "--timeout", "5"]).unwrap();
        assert_eq!(cli.timeout, Some(5));
    }
}
