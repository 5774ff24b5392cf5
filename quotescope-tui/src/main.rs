use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{info, warn};

use quotescope_core::{AppConfig, DataProvider, SpreadsheetExporter, StaticProvider, YahooProvider};
use quotescope_tui::{input, logging, persistence, ui, AppState};

/// Interactive price, volume and dividend lookup.
#[derive(Parser)]
#[command(name = "quotescope-tui", about = "QuoteScope terminal UI")]
struct Args {
    /// Path to a quotescope.toml. Defaults to ./quotescope.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Serve built-in fixtures instead of calling Yahoo Finance.
    #[arg(long, default_value_t = false)]
    offline: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = AppConfig::load(args.config.as_deref()).context("loading configuration")?;
    logging::init_file_logging(&config.log.file, &config.log.level)?;

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    // Paths
    let state_path = persistence::default_path();
    let download_dir = dirs::download_dir().unwrap_or_else(|| PathBuf::from("."));

    // Form state: last session's selection, else the configured defaults.
    let selection = persistence::load(&state_path)
        .map(|s| s.selection())
        .unwrap_or_else(|| config.default_selection());

    let provider: Box<dyn DataProvider> = if args.offline {
        Box::new(StaticProvider::demo())
    } else {
        Box::new(YahooProvider::new(&config.provider)?)
    };
    let exporter = SpreadsheetExporter::new(&config.export.dir, config.locale);
    info!(provider = provider.name(), locale = config.locale.code(), "starting");

    let mut app = AppState::new(
        provider,
        exporter,
        config.locale,
        &selection,
        download_dir,
        state_path,
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Save form state before exit
    if let Err(e) = persistence::save(&app.state_path, &persistence::extract(&app)) {
        warn!(error = %e, "could not save form state");
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        // A trigger blocks here until the provider answers.
        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        if !app.running {
            break;
        }
    }
    Ok(())
}
