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

use std::{
    path::{Path, PathBuf},
    sync::mpsc::Sender,
    thread,
};

use anyhow::Result;
use tracing::{debug, info, warn};

use tunedeck::{
    PlaybackStatus, SongId, audio,
    audio::SongDetails,
    media::MediaNotification,
    player::PlayerEvent,
    tasks::{StoreEvent, StoreTask},
};

use crate::{App, events::AppEvent};

/// Controller errors are already published to subscribers, so only log here.
pub(super) fn player_result(result: tunedeck::Result<()>) {
    if let Err(e) = result {
        debug!(error = %e, "Player operation failed");
    }
}

pub(super) fn handle_tick(app: &mut App) {
    app.expire_status();
}

pub(super) fn handle_store_event(app: &mut App, event: StoreEvent) {
    match event {
        StoreEvent::Listed(songs) => {
            debug!(count = songs.len(), "Playlist refreshed");
            player_result(app.player.sync_playlist(songs));
            refresh_playlist_view(app);
        }
        StoreEvent::Added(song) => app.set_status(format!("Added \"{}\"", song.title), false),
        StoreEvent::Removed(_) => app.set_status("Song removed".to_string(), false),
        StoreEvent::Cleared => app.set_status("Playlist cleared".to_string(), false),
        StoreEvent::Current(Some(id)) => {
            if app.player.status() == PlaybackStatus::Idle {
                info!(song = %id, "Restoring current song");
                player_result(app.player.restore_selection(id));
                app.playlist_view.reveal(id);
            }
        }
        StoreEvent::Current(None) => {}
        StoreEvent::Failed(e) => {
            warn!(error = %e, "Store operation failed");
            app.set_status(e.to_string(), true);
        }
    }
}

pub(super) fn handle_media_notification(app: &mut App, notification: MediaNotification) {
    player_result(app.player.handle_media(notification));
}

pub(super) fn handle_seek_by(app: &mut App, seconds: f64) {
    if let Some(target) = app.player.progress().percent_after(seconds) {
        player_result(app.player.seek(target));
    }
}

/// Reads the file off the UI thread, then queues the song for the store.
pub(super) fn handle_add_song(app: &mut App, path: PathBuf, details: SongDetails) {
    let embed = app.config.embeds_audio();
    let task_tx = app.task_tx.clone();
    let event_tx = app.event_tx.clone();

    thread::spawn(move || {
        let result = audio::new_song_from_file(&path, details, embed);
        let sent = match result {
            Ok(song) => task_tx.send(StoreTask::Add(song)).is_ok(),
            Err(e) => event_tx.send(AppEvent::Error(e.to_string())).is_ok(),
        };
        if !sent {
            warn!(path = %path.display(), "Application closed before song was added");
        }
    });
}

pub(super) fn handle_import_directory(app: &mut App, dir: PathBuf) {
    let embed = app.config.embeds_audio();
    let task_tx = app.task_tx.clone();
    let event_tx = app.event_tx.clone();

    app.set_status(format!("Importing from {}", dir.display()), false);

    thread::spawn(move || {
        let songs = audio::scan_dir(&dir, embed);
        let count = songs.len();
        info!(dir = %dir.display(), count, "Importing songs");

        for song in songs {
            if task_tx.send(StoreTask::Add(song)).is_err() {
                warn!(dir = %dir.display(), "Store worker stopped during import");
                return;
            }
        }

        report_import(&event_tx, &dir, count);
    });
}

/// Tells the UI an import finished. Returns `false` if nobody is listening.
fn report_import(event_tx: &Sender<AppEvent>, dir: &Path, count: usize) -> bool {
    let message = format!("Imported {count} songs from {}", dir.display());
    match event_tx.send(AppEvent::Info(message)) {
        Ok(()) => true,
        Err(_) => {
            warn!(dir = %dir.display(), count, "Application closed before import was reported");
            false
        }
    }
}

pub(super) fn handle_remove_song(app: &mut App, id: SongId) -> Result<()> {
    app.task_tx.send(StoreTask::Remove(id))?;
    Ok(())
}

pub(super) fn handle_remove_selected(app: &mut App) -> Result<()> {
    match app.playlist_view.selected_id() {
        Some(id) => handle_remove_song(app, id),
        None => {
            app.set_status("Nothing selected".to_string(), true);
            Ok(())
        }
    }
}

pub(super) fn handle_clear_playlist(app: &mut App) -> Result<()> {
    app.task_tx.send(StoreTask::Clear)?;
    Ok(())
}

/// Drains the controller's notifications and updates the views.
pub(super) fn process_player_events(app: &mut App) {
    while let Ok(event) = app.player_rx.try_recv() {
        match event {
            PlayerEvent::StateChanged(_) => refresh_playlist_view(app),
            PlayerEvent::NowPlaying(song) => {
                app.playlist_view.reveal(song.id);
                app.set_status(format!("Now playing \"{}\" by {}", song.title, song.artist), false);
            }
            PlayerEvent::Progress(_) => {}
            PlayerEvent::Error(text) => app.set_status(text, true),
        }
    }
}

fn refresh_playlist_view(app: &mut App) {
    let current = app.player.state().current_song_id;
    app.playlist_view.refresh(app.player.songs(), current);
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;

    #[test]
    fn import_report_reaches_the_ui() {
        let (event_tx, event_rx) = mpsc::channel();

        assert!(report_import(&event_tx, Path::new("/music"), 3));

        match event_rx.try_recv() {
            Ok(AppEvent::Info(message)) => assert_eq!(message, "Imported 3 songs from /music"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn import_report_without_ui_is_not_delivered() {
        let (event_tx, event_rx) = mpsc::channel();
        drop(event_rx);

        assert!(!report_import(&event_tx, Path::new("/music"), 3));
    }
}
