// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! # tunedeck.
//!
//! A terminal playlist player.
//!
//! This application coordinates a TUI frontend built with `ratatui` and the
//! `tunedeck` playlist core.
//!
//! It uses an event-driven architecture where:
//!
//! * The **Main Thread** manages the terminal lifecycle, owns the player
//!   controller and renders the UI.
//! * **Background Workers** run the song store and the MPV audio engine,
//!   reporting completions back as events.
//! * **Event Loops** capture user input and system ticks to drive the UI
//!   state.
//!
//! ## Architecture
//!
//! The application follows a strict setup-run-teardown pattern to ensure the
//! terminal state is preserved even in the event of a failure. Communication
//! between the UI and background workers is handled via `std::sync::mpsc`
//! channels.

mod commander;
mod components;
mod events;
mod render;
mod theme;

use std::{
    fs::OpenOptions,
    io,
    sync::{
        Mutex,
        mpsc::{self, Receiver, Sender},
    },
    thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use crossterm::{
    event,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tunedeck::{
    config::{self, AppConfig},
    media::MpvMedia,
    player::{PlayerController, PlayerEvent},
    store,
    tasks::{self, StoreTask},
};

use crate::{
    commander::Commander,
    components::PlaylistView,
    events::{AppEvent, process_events},
    theme::Theme,
};

/// How long a status message stays on screen.
const STATUS_TTL: Duration = Duration::from_secs(3);

pub(crate) struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    shown_at: Instant,
}

/// Application state.
pub(crate) struct App {
    pub config: AppConfig,

    pub theme: Theme,

    pub event_tx: Sender<AppEvent>,
    pub event_rx: Receiver<AppEvent>,

    pub task_tx: Sender<StoreTask>,

    pub player: PlayerController<MpvMedia>,
    pub player_rx: Receiver<PlayerEvent>,

    pub playlist_view: PlaylistView,
    pub commander: Commander,

    pub status: Option<StatusMessage>,
}

impl App {
    /// Create a new instance of application state.
    pub fn new(config: AppConfig, task_tx: Sender<StoreTask>) -> Self {
        let (event_tx, event_rx) = mpsc::channel();

        let mut player = PlayerController::new(MpvMedia::new(event_tx.clone()));
        let player_rx = player.subscribe();

        Self {
            config,
            theme: Theme::default(),
            event_tx,
            event_rx,
            task_tx,
            player,
            player_rx,
            playlist_view: PlaylistView::new(),
            commander: Commander::new(),
            status: None,
        }
    }

    pub fn set_status(&mut self, text: String, is_error: bool) {
        self.status = Some(StatusMessage {
            text,
            is_error,
            shown_at: Instant::now(),
        });
    }

    pub fn expire_status(&mut self) {
        if self.status.as_ref().is_some_and(|s| s.shown_at.elapsed() >= STATUS_TTL) {
            self.status = None;
        }
    }
}

/// The entry point of the application.
///
/// Loads configuration, starts logging, opens the song store (or an in-memory
/// one if that fails), manages the terminal lifecycle, and returns an error if
/// any part of the execution fails.
fn main() -> Result<()> {
    let config = config::load_config();

    init_logging(&config)?;
    info!(store = ?config.store, "Starting tunedeck");

    let (song_store, store_error) = store::open_store_or_memory(&config);

    let (task_tx, task_rx) = mpsc::channel();

    let mut app = App::new(config, task_tx);
    if let Some(e) = store_error {
        app.set_status(format!("Song store unavailable, playlist is not saved: {e}"), true);
    }

    tasks::spawn_store_worker(song_store, task_rx, app.event_tx.clone());

    let mut terminal = setup_terminal()?;
    let res = run(&mut terminal, &mut app);
    restore_terminal(&mut terminal);

    if let Err(e) = &res {
        error!(error = ?e, "Application error");
    }

    res.context("Application error occurred")
}

/// Routes log output to the configured file, the terminal belongs to the UI.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_logging(config: &AppConfig) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("Failed to open log file {}", config.log_file.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .try_init();

    Ok(())
}

/// Prepares the terminal for the TUI application.
///
/// Enables raw mode to capture all keyboard input and switches to the
/// alternate screen buffer.
///
/// # Errors
///
/// Returns an error if raw mode cannot be enabled or if the alternate screen
/// cannot be entered.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// This is "best-effort" and does not return a result, as it is called during
/// cleanup.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();
}

/// Starts the input and tick threads, loads the playlist and enters the main
/// event loop.
fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Spawn a thread to translate raw key events to application events.
    let tx_keys = app.event_tx.clone();
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(event::Event::Key(key)) => {
                    if tx_keys.send(AppEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
    });

    // Spawn a thread to send a periodic tick application event, this is
    // effectively the minimum "frame rate" for rendering the TUI application.
    let tx_tick = app.event_tx.clone();
    thread::spawn(move || {
        while tx_tick.send(AppEvent::Tick).is_ok() {
            thread::sleep(Duration::from_millis(250));
        }
    });

    // Initial load, then restore whatever the store remembers as current.
    app.task_tx.send(StoreTask::Refresh)?;
    app.task_tx.send(StoreTask::FetchCurrent)?;

    process_events(terminal, app)
}
