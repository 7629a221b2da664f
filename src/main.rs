mod app;
mod capture;
mod cli;
mod config;
mod error;
mod flow;
mod models;
mod signals;
mod store;
mod theme;
mod ui;
mod utils;
mod watcher;

use std::error::Error;
use std::io::{self, stdout};
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::capture::{request_permission, CaptureService, PoseReplay, RepSource};
use crate::cli::parse_args;
use crate::config::Settings;
use crate::flow::{FlowController, SessionRecorder};
use crate::models::{Catalog, PermissionStatus};
use crate::signals::TerminalSignals;
use crate::store::{KeyValueStore, SqliteStore};
use crate::watcher::setup_catalog_watcher;

const LOG_FILE: &str = "fitlock.log";
const LOG_ENV: &str = "FITLOCK_LOG";

/// Log to a file in the data dir; the terminal belongs to the UI.
fn init_logging(settings: &Settings) -> Option<WorkerGuard> {
    let filter = if settings.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
    };
    if let Err(e) = std::fs::create_dir_all(&settings.data_dir) {
        eprintln!("fitlock: logging disabled, cannot create {}: {}", settings.data_dir.display(), e);
        return None;
    }
    let appender = tracing_appender::rolling::never(&settings.data_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let settings = parse_args()?;
    let _log_guard = init_logging(&settings);
    info!(data_dir = %settings.data_dir.display(), "fitlock starting");

    let store = SqliteStore::open(&settings.db_path())?;
    let catalog = match &settings.catalog_path {
        Some(path) => Catalog::load(path)?,
        None => Catalog::default(),
    };
    let detector = settings
        .pose_replay
        .clone()
        .map(|path| Box::new(PoseReplay::new(path, settings.replay_fps)) as Box<dyn RepSource>);

    let mut app = App::new(
        FlowController::new(settings.feedback_ttl),
        catalog,
        SessionRecorder::new(store),
        CaptureService::new(detector),
        Box::new(TerminalSignals::new(io::stdout(), settings.bell)),
    );

    // Keep the watcher alive for the whole session
    let _watcher = match &settings.catalog_path {
        Some(path) => {
            app = app.with_catalog_path(path.clone());
            setup_catalog_watcher(path.clone(), app.catalog_needs_reload.clone())
        }
        None => None,
    };

    app.load_persisted().await;
    let mut permission = Some(tokio::spawn(request_permission(
        settings.camera,
        settings.camera_device.clone(),
    )));

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run(&mut terminal, &mut app, &mut permission).await;

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    info!(streak = app.streak, "fitlock exiting");
    result
}

async fn run<S: KeyValueStore>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<S>,
    permission: &mut Option<JoinHandle<PermissionStatus>>,
) -> Result<(), Box<dyn Error>> {
    loop {
        if let Some(handle) = permission.take_if(|handle| handle.is_finished()) {
            let status = handle.await.unwrap_or_else(|e| {
                warn!(error = %e, "permission check failed");
                PermissionStatus::Denied
            });
            app.set_permission(status);
        }

        let now = Instant::now();
        terminal.draw(|frame| ui::draw(frame, &*app, now))?;

        // Handle input
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key, Instant::now()).await;
                }
            }
        }

        app.tick(Instant::now()).await;
        if app.should_quit {
            break;
        }
    }

    Ok(())
}
