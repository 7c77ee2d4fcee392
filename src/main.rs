//! WeatherLens - a terminal weather dashboard
//!
//! Shows current conditions, a 15-day and 72-hour forecast, air quality and a
//! weather assistant for any city, from generated data or a host bridge.

use std::io;
use std::panic;
use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};

use weatherlens::app::App;
use weatherlens::assistant::APOLOGY;
use weatherlens::cli::{Cli, Command, SourceKind, StartupConfig};
use weatherlens::data::{fetch_snapshot, BridgeClient, Latency, SyntheticSource, WeatherSource};
use weatherlens::export::write_export;
use weatherlens::logging;
use weatherlens::store::Store;
use weatherlens::ui;

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Runs the interactive dashboard until the user quits
async fn run_dashboard<S: WeatherSource>(
    source: S,
    config: &StartupConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let _log_guard = logging::default_log_dir().and_then(|dir| logging::init_file_logging(&dir));
    info!("Starting dashboard for {}", config.city);

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(source, config, Store::new());

    // Main event loop
    loop {
        // Render UI
        terminal.draw(|f| ui::render(f, &app))?;

        // Queued work runs after the loading/thinking state has been drawn
        if let Some(action) = app.take_pending() {
            app.run(action).await;
            continue;
        }

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}

/// Fetches the snapshot for the configured city and writes it to the export directory
async fn run_export<S: WeatherSource>(
    source: &S,
    config: &StartupConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let query = config.query();
    let snapshot = fetch_snapshot(source, &query).await?;
    let path = write_export(&config.export_dir, &snapshot, Utc::now())?;
    println!("{}", path.display());
    Ok(())
}

/// Prints one assistant reply, using the city's current conditions when available
async fn run_ask<S: WeatherSource>(
    source: &S,
    config: &StartupConfig,
    question: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let query = config.query();
    let current = match source.current(&query).await {
        Ok(current) => Some(current),
        Err(e) => {
            error!("No current conditions for {}: {}", config.city, e);
            None
        }
    };

    match source.ask(question, current.as_ref(), &query).await {
        Ok(reply) => println!("{}", reply),
        Err(e) => {
            error!("Assistant failed: {}", e);
            println!("{}", APOLOGY);
        }
    }
    Ok(())
}

/// Runs the selected command against `source`
async fn run<S: WeatherSource>(
    source: S,
    config: &StartupConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match &config.command {
        Command::Dashboard => run_dashboard(source, config).await,
        Command::Export => run_export(&source, config).await,
        Command::Ask(question) => run_ask(&source, config, question).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    if config.command != Command::Dashboard {
        logging::init_stderr_logging();
    }

    let result = match config.source.clone() {
        SourceKind::Synthetic { seed, latency } => {
            let source = match seed {
                Some(seed) => SyntheticSource::seeded(seed),
                None => SyntheticSource::new(),
            };
            let source = if latency {
                source
            } else {
                source.with_latency(Latency::none())
            };
            run(source, &config).await
        }
        SourceKind::Bridge { url } => run(BridgeClient::new(url), &config).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
