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

//! Application event handling and dispatching.
//!
//! Every input to the UI thread arrives as an [`AppEvent`] on a single
//! channel: key presses and ticks from helper threads, store completions from
//! the store worker, media notifications from the audio worker, and requests
//! raised by the views and the command line. [`process_events`] applies each
//! one in arrival order and redraws.

mod handlers;
use handlers::*;

use std::{io::Stdout, path::PathBuf, sync::mpsc::Sender};

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, prelude::CrosstermBackend};

use tunedeck::{SongId, audio::SongDetails, media::MediaNotification, tasks::StoreEvent};

use crate::{App, render::draw};

/// Relative seek steps, in seconds.
const FINE_SEEK_DELTA: f64 = 5.0;
const SEEK_DELTA: f64 = 20.0;

#[derive(Debug)]
pub(crate) enum AppEvent {
    Key(KeyEvent),
    Tick,

    Store(StoreEvent),
    Media(MediaNotification),

    PlaySong(SongId),
    Play,
    Pause,
    Next,
    Previous,
    Shuffle,
    Seek(f64),
    /// Relative seek, in seconds.
    SeekBy(f64),

    AddSong { path: PathBuf, details: SongDetails },
    ImportDirectory(PathBuf),
    RemoveSong(SongId),
    RemoveSelected,
    ClearPlaylist,

    Info(String),
    Error(String),

    ExitApplication,
}

impl From<StoreEvent> for AppEvent {
    fn from(event: StoreEvent) -> Self {
        AppEvent::Store(event)
    }
}

impl From<MediaNotification> for AppEvent {
    fn from(notification: MediaNotification) -> Self {
        AppEvent::Media(notification)
    }
}

pub(crate) trait AppEventProcessor {
    /// Handles a terminal event, returning `true` if it was consumed.
    fn process_event(&mut self, event: &Event, event_tx: &Sender<AppEvent>) -> Result<bool>;
}

/// Runs the main application loop, handling events and rendering the UI in the
/// terminal.
///
/// This function loops until a 'quit' event is received or the event channel
/// is closed.
pub(crate) fn process_events(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    terminal.draw(|f| draw(f, app))?;

    while let Ok(event) = app.event_rx.recv() {
        if matches!(event, AppEvent::ExitApplication) {
            break;
        }

        match event {
            AppEvent::Key(key) => process_key_event(app, key)?,
            AppEvent::Tick => handle_tick(app),
            AppEvent::Store(store_event) => handle_store_event(app, store_event),
            AppEvent::Media(notification) => handle_media_notification(app, notification),
            AppEvent::PlaySong(id) => player_result(app.player.select_song(id)),
            AppEvent::Play => player_result(app.player.play()),
            AppEvent::Pause => player_result(app.player.pause()),
            AppEvent::Next => player_result(app.player.next()),
            AppEvent::Previous => player_result(app.player.previous()),
            AppEvent::Shuffle => player_result(app.player.shuffle()),
            AppEvent::Seek(percent) => player_result(app.player.seek(percent)),
            AppEvent::SeekBy(delta) => handle_seek_by(app, delta),
            AppEvent::AddSong { path, details } => handle_add_song(app, path, details),
            AppEvent::ImportDirectory(dir) => handle_import_directory(app, dir),
            AppEvent::RemoveSong(id) => handle_remove_song(app, id)?,
            AppEvent::RemoveSelected => handle_remove_selected(app)?,
            AppEvent::ClearPlaylist => handle_clear_playlist(app)?,
            AppEvent::Info(text) => app.set_status(text, false),
            AppEvent::Error(text) => app.set_status(text, true),
            AppEvent::ExitApplication => {}
        }

        process_player_events(app);

        terminal.draw(|f| draw(f, app))?;
    }

    Ok(())
}

/// Maps keyboard input to application actions and playback commands.
///
/// The command line gets the first chance to consume a key, then the
/// playlist table, then the global bindings.
fn process_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    if key.kind != KeyEventKind::Press {
        return Ok(());
    }

    let event = Event::Key(key);

    if app.commander.handle_event(&event, &app.event_tx)? {
        return Ok(());
    }

    if app.playlist_view.process_event(&event, &app.event_tx)? {
        return Ok(());
    }

    process_global_key_event(app, key)
}

fn process_global_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    let event = match key.code {
        KeyCode::Char('q') => AppEvent::ExitApplication,

        KeyCode::Char(' ') => {
            player_result(app.player.toggle_play());
            return Ok(());
        }

        KeyCode::Char('n') => AppEvent::Next,
        KeyCode::Char('p') => AppEvent::Previous,
        KeyCode::Char('s') => AppEvent::Shuffle,
        KeyCode::Char('C') => AppEvent::ClearPlaylist,

        KeyCode::Char(',') => AppEvent::SeekBy(-FINE_SEEK_DELTA),
        KeyCode::Char('.') => AppEvent::SeekBy(FINE_SEEK_DELTA),
        KeyCode::Char('<') => AppEvent::SeekBy(-SEEK_DELTA),
        KeyCode::Char('>') => AppEvent::SeekBy(SEEK_DELTA),

        _ => return Ok(()),
    };

    app.event_tx.send(event)?;
    Ok(())
}
