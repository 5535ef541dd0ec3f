mod action;
mod app;
mod backend;
mod catalog;
mod config;
mod ui;
mod ui_state;

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context;
use arboard::Clipboard;
use clap::Parser;
use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use action::Action;
use app::App;
use backend::{Backend, BackendEvent, CatalogApi};
use config::{Cli, Config};
use ui::draw;

fn init_tracing(cli: &Cli) -> anyhow::Result<()> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&cli.log_file)
        .with_context(|| format!("Failed to open log file {}", cli.log_file.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(log_file)),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    let endpoints = cli.endpoints();
    tracing::info!(
        catalog = %endpoints.catalog_url,
        recommend = %endpoints.recommend_url,
        "Starting catalog browser"
    );

    // Network work runs here; the UI loop stays on the main thread
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let (mut backend, mut events) = Backend::new(CatalogApi::new(endpoints), runtime.handle().clone());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    let mut app = App::with_config(Config::default());

    let result = run_app(&mut terminal, &mut app, &mut backend, &mut events);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableBracketedPaste)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "Event loop failed");
        eprintln!("Error: {}", e);
    }
    tracing::info!(in_flight = backend.in_flight(), "Shutting down");
    runtime.shutdown_background();

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    backend: &mut Backend,
    events: &mut UnboundedReceiver<BackendEvent>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(app.config.tick_rate_ms);

    loop {
        app.tick();

        terminal.draw(|frame| draw(frame, app))?;

        // First render has happened: the catalog request goes out once
        if let Some(request) = app.mount() {
            backend.dispatch(request);
        }

        // Apply every completion that arrived since the last frame
        while let Ok(event) = events.try_recv() {
            backend.completed();
            app.apply_event(event);
        }

        if event::poll(tick_rate)? {
            let action = match event::read()? {
                Event::Key(key) => Action::from_key(key),
                Event::Paste(text) => Some(Action::paste(&text)),
                _ => None,
            };

            if let Some(action) = action {
                let action = resolve_clipboard(action);
                if let Some(request) = app.handle_action(action) {
                    backend.dispatch(request);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Swap a clipboard request for the clipboard's text, when there is any.
fn resolve_clipboard(action: Action) -> Action {
    if action != Action::ClipboardPaste {
        return action;
    }
    match Clipboard::new().and_then(|mut clipboard| clipboard.get_text()) {
        Ok(text) => Action::paste(&text),
        Err(e) => {
            tracing::debug!(error = %e, "Clipboard unavailable");
            action
        }
    }
}
