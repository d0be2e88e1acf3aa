use std::fs::{self, File};
use std::io::stdout;
use std::sync::Mutex;

use anyhow::{Context, Result};
use guideline::app::default_user_dir;
use guideline::App;
use ratatui::{
    backend::CrosstermBackend,
    crossterm::{
        execute,
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    },
    Terminal,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Log to a file; the terminal belongs to the UI
fn init_logging() -> Result<()> {
    let log_dir = default_user_dir();
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("Could not create {}", log_dir.display()))?;
    let log_file = File::create(log_dir.join("guideline.log"))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    if let Err(e) = init_logging() {
        eprintln!("Warning: logging disabled: {}", e);
    }

    // Get command line arguments
    let args: Vec<String> = std::env::args().collect();

    // Create the app before touching the terminal so open errors print normally
    let mut app = if args.len() > 1 {
        App::with_file(&args[1]).await?
    } else {
        App::new().await?
    };
    info!(user_dir = %app.user_dir.display(), "starting");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal).await;

    // Restore the terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        ratatui::crossterm::cursor::Show
    )?;

    // Handle any final errors
    match result {
        Ok(_) => Ok(()),
        Err(e) => {
            error!(error = %e, "editor stopped");
            eprintln!("Error: {}", e);
            Err(e)
        }
    }
}
