//! Stargaze TUI Entry Point
//!
//! Launches the terminal UI for classifying astronomy photos.
//!
//! Usage:
//!   stargaze-tui [OPTIONS] [IMAGE]
//!
//! Options:
//!   -e, --endpoint <URL>   Classification service base URL
//!   -c, --config <FILE>    Configuration file path
//!
//! Logs go to `stargaze-tui.log` in the system temp directory.

use std::io;
use std::panic;
use std::path::PathBuf;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use classifier_core::{load_config, load_config_from_path, ConfigOverrides};
use stargaze_tui::{App, WorkflowClient};

/// Log file name inside the temp directory
const LOG_FILE_NAME: &str = "stargaze-tui.log";

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "stargaze-tui")]
#[command(
    author,
    version,
    about = "Terminal UI for classifying astronomy photos",
    long_about = None
)]
struct Args {
    /// Image path to prefill
    #[arg(value_name = "IMAGE")]
    image: Option<String>,

    /// Classification service base URL
    #[arg(short = 'e', long, value_name = "URL")]
    endpoint: Option<String>,

    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Check if we have a TTY before attempting initialization
    use std::io::IsTerminal;

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: stargaze-tui requires a terminal (TTY)");
        eprintln!();
        eprintln!("For scripts and pipes use the command line client instead:");
        eprintln!("  stargaze <IMAGE>");
        std::process::exit(1);
    }

    let log_path = init_logging()?;

    let mut config = match args.config {
        Some(path) => load_config_from_path(Some(path))?,
        None => load_config()?,
    };
    if let Some(endpoint) = args.endpoint {
        ConfigOverrides::new().with_endpoint(endpoint).apply(&mut config);
        config.validate()?;
    }
    tracing::info!(endpoint = %config.endpoint, source = %config.source(), "Configuration loaded");

    let client = WorkflowClient::from_config(&config)?;
    let mut app = App::new(client);
    if let Some(image) = args.image {
        app = app.with_input(image);
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal before printing panic
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the app
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if result.is_err() {
        eprintln!("Log file: {}", log_path.display());
    }

    // Propagate any errors
    result
}

/// Log to a file so output does not corrupt the screen
fn init_logging() -> anyhow::Result<PathBuf> {
    let path = std::env::temp_dir().join(LOG_FILE_NAME);
    let file = std::fs::File::create(&path)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file)),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    Ok(path)
}
