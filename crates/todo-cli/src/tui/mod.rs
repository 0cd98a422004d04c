//! Todo TUI
//!
//! Terminal user interface for the todo list.
//!
//! ## Layout
//!
//! - Logged out: login/register panel on the left, local todos on the right
//! - Logged in: the server's todos
//! - Bottom: new-todo form and status bar
//!
//! ## Navigation
//!
//! - j/k or ↑/↓: Move selection up/down
//! - Tab / Shift-Tab: Cycle through the list and form fields
//! - Enter: Submit the focused form
//! - Esc: Back to the list
//! - q: Quit
//!
//! ## Commands
//!
//! - a: Add a todo
//! - space: Toggle done
//! - d: Delete
//! - r: Refresh / retry
//! - l: Switch between login and register (logged out)
//! - L: Log out (logged in)

mod app;
mod ui;

use std::fs::File;
use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use todo_core::{Config, Task, TaskResult, TodoApp};

use app::App;

use crate::commands::explain;

/// Run the TUI application
pub async fn run(config: &Config) -> Result<()> {
    // Opening creates the data directory the log file may live in
    let mut todo = TodoApp::open(config)
        .map_err(explain)
        .context("Failed to open todo data")?;

    // Initialize TUI logging (file-based, only if TODO_LOG is set)
    init_tui_logging(config);

    let initial = todo
        .mount()
        .map_err(|e| explain(e.into()))
        .context("Failed to load todos")?;

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let (tx, rx) = mpsc::unbounded_channel();
    for task in initial {
        spawn(task, &tx);
    }

    let mut app = App::new(todo);
    let result = run_app(&mut terminal, &mut app, tx, rx).await;

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

/// Run a task in the background and send its result to the UI loop
fn spawn(task: Task, tx: &mpsc::UnboundedSender<TaskResult>) {
    debug!(task = task.name(), generation = task.generation(), "spawning task");
    let tx = tx.clone();
    tokio::spawn(async move {
        // The loop may already be gone on quit
        let _ = tx.send(task.run().await);
    });
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    tx: mpsc::UnboundedSender<TaskResult>,
    mut rx: mpsc::UnboundedReceiver<TaskResult>,
) -> Result<()> {
    loop {
        // Check for banner timeout
        app.todo.tick(Instant::now());

        // Draw UI
        terminal.draw(|frame| ui::draw(frame, app))?;

        tokio::select! {
            biased;

            Some(result) = rx.recv() => {
                for task in app.complete(result)? {
                    spawn(task, &tx);
                }
            }

            // Poll for terminal events
            _ = tokio::time::sleep(Duration::from_millis(50)) => {
                if event::poll(Duration::from_millis(0))? {
                    if let Event::Key(key) = event::read()? {
                        // Only handle key press events (not release)
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }

                        for task in app.handle_key(key.code, key.modifiers)? {
                            spawn(task, &tx);
                        }
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Initialize file-based logging for TUI mode
///
/// Only initializes if TODO_LOG is set. Logs go to `log_file` from the
/// config, or `debug.log` in the data directory.
fn init_tui_logging(config: &Config) {
    let Ok(log_level) = std::env::var("TODO_LOG") else {
        return;
    };

    let log_path = config.log_path();

    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!("todo_core={},todo={}", log_level, log_level));

    // Ignore error if already initialized
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("TUI logging initialized to {:?}", log_path);
}
