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

//! Playback control and state management.
//!
//! [`PlayerController`] is the state machine that decides what the single
//! [`MediaPrimitive`] should be doing. It owns the [`PlayerState`], holds a
//! cached copy of the playlist for navigation, and is the only component
//! that issues media commands.
//!
//! The current song is held by id and re-resolved against the cached
//! playlist on every access. When the store reports a new playlist through
//! [`PlayerController::sync_playlist`] the controller repairs a selection that
//! no longer exists.
//!
//! State changes, progress and errors are broadcast to every receiver handed
//! out by [`PlayerController::subscribe`]. Every error an operation returns
//! is also published as [`PlayerEvent::Error`].

mod progress;

pub use progress::Progress;

use std::sync::mpsc::{self, Receiver, Sender};

use rand::{RngExt, SeedableRng, rngs::StdRng};
use tracing::{debug, info, warn};

use crate::{
    error::{Error, Result},
    media::{LoadId, MediaEvent, MediaNotification, MediaPrimitive},
    model::{PlaybackStatus, PlayerState, Song, SongId},
};

/// Notifications published by the controller.
#[derive(Clone, Debug, PartialEq)]
pub enum PlayerEvent {
    StateChanged(PlayerState),
    Progress(Progress),
    NowPlaying(Song),
    Error(String),
}

/// The source most recently handed to the media primitive.
#[derive(Clone, Copy, Debug, PartialEq)]
struct ActiveLoad {
    load: LoadId,
    song: SongId,
}

pub struct PlayerController<M> {
    media: M,
    songs: Vec<Song>,
    state: PlayerState,
    active: Option<ActiveLoad>,
    progress: Progress,
    rng: StdRng,
    subscribers: Vec<Sender<PlayerEvent>>,
}

impl<M: MediaPrimitive> PlayerController<M> {
    pub fn new(media: M) -> Self {
        Self::with_seed(media, rand::random())
    }

    /// Creates a controller whose shuffle order is reproducible.
    pub fn with_seed(media: M, seed: u64) -> Self {
        Self {
            media,
            songs: Vec::new(),
            state: PlayerState::default(),
            active: None,
            progress: Progress::default(),
            rng: StdRng::seed_from_u64(seed),
            subscribers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self) -> Receiver<PlayerEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn status(&self) -> PlaybackStatus {
        self.state.status()
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn current_song(&self) -> Option<&Song> {
        self.current_index().map(|index| &self.songs[index])
    }

    fn current_index(&self) -> Option<usize> {
        let id = self.state.current_song_id?;
        self.songs.iter().position(|song| song.id == id)
    }

    fn index_of(&self, id: SongId) -> Result<usize> {
        self.songs.iter().position(|song| song.id == id).ok_or(Error::NotFound(id))
    }

    /// Selects a song and starts playing it from the beginning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] without touching the state if `id` is not
    /// in the playlist, or [`Error::Playback`] if the media refused the song,
    /// in which case the song stays selected but not playing.
    pub fn select_song(&mut self, id: SongId) -> Result<()> {
        let index = self.index_of(id).map_err(|e| self.report(e))?;
        let song = self.songs[index].clone();

        info!(song = %song.id, title = %song.title, "Selecting song");

        self.set_state(PlayerState {
            current_song_id: Some(song.id),
            is_playing: false,
        });

        self.load_and_play(&song)
    }

    /// Starts or resumes playback of the current song.
    ///
    /// With nothing selected the first song of the playlist is used. If the
    /// current song is the one already loaded playback resumes where it
    /// stopped, otherwise the song is loaded first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NothingSelected`] if the playlist is empty.
    pub fn play(&mut self) -> Result<()> {
        let Some(index) = self.current_index().or((!self.songs.is_empty()).then_some(0)) else {
            return Err(self.report(Error::NothingSelected));
        };

        let song = self.songs[index].clone();

        if self.state.current_song_id != Some(song.id) {
            self.set_state(PlayerState {
                current_song_id: Some(song.id),
                is_playing: false,
            });
        }

        match self.active {
            Some(active) if active.song == song.id => {
                if self.state.is_playing {
                    return Ok(());
                }
                self.resume()
            }
            _ => self.load_and_play(&song),
        }
    }

    /// Pauses playback. Does nothing unless playing.
    pub fn pause(&mut self) -> Result<()> {
        if !self.state.is_playing {
            return Ok(());
        }

        if let Err(e) = self.media.pause() {
            return Err(self.report(e));
        }

        self.set_playing(false);
        Ok(())
    }

    pub fn toggle_play(&mut self) -> Result<()> {
        if self.state.is_playing { self.pause() } else { self.play() }
    }

    /// Selects and plays the song after the current one, wrapping around.
    ///
    /// From `Idle` the first song is chosen.
    pub fn next(&mut self) -> Result<()> {
        let len = self.songs.len();
        if len == 0 {
            return Err(self.report(Error::EmptyPlaylist));
        }

        let index = self.current_index().map_or(0, |index| (index + 1) % len);
        self.select_song(self.songs[index].id)
    }

    /// Selects and plays the song before the current one, wrapping around.
    ///
    /// From `Idle` the last song is chosen.
    pub fn previous(&mut self) -> Result<()> {
        let len = self.songs.len();
        if len == 0 {
            return Err(self.report(Error::EmptyPlaylist));
        }

        let index = self.current_index().map_or(len - 1, |index| (index + len - 1) % len);
        self.select_song(self.songs[index].id)
    }

    /// Selects and plays a random song other than the current one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotEnoughSongs`] with fewer than two songs.
    pub fn shuffle(&mut self) -> Result<()> {
        let len = self.songs.len();
        if len < 2 {
            return Err(self.report(Error::NotEnoughSongs));
        }

        let index = match self.current_index() {
            Some(current) => {
                // Draw from the other n - 1 songs, skipping over the current one.
                let pick = self.rng.random_range(0..len - 1);
                if pick >= current { pick + 1 } else { pick }
            }
            None => self.rng.random_range(0..len),
        };

        self.select_song(self.songs[index].id)
    }

    /// Moves the playback position to a percentage of the media duration.
    ///
    /// Does nothing while the duration is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `percent` is not within `0..=100`.
    pub fn seek(&mut self, percent: f64) -> Result<()> {
        let target = self.progress.seek_target(percent).map_err(|e| self.report(e))?;

        let (Some(seconds), Some(_)) = (target, self.active) else {
            debug!(percent, "Ignoring seek, duration unknown");
            return Ok(());
        };

        if let Err(e) = self.media.seek(seconds) {
            return Err(self.report(e));
        }

        self.progress.position = seconds;
        self.emit(PlayerEvent::Progress(self.progress));
        Ok(())
    }

    /// Selects a song without starting playback.
    ///
    /// Used to restore a selection remembered elsewhere, e.g. by a remote
    /// song service.
    pub fn restore_selection(&mut self, id: SongId) -> Result<()> {
        self.index_of(id).map_err(|e| self.report(e))?;

        if self.state.is_playing {
            self.pause()?;
        }

        self.active = None;
        self.progress = Progress::default();
        self.set_state(PlayerState {
            current_song_id: Some(id),
            is_playing: false,
        });
        Ok(())
    }

    /// Replaces the cached playlist with a fresh snapshot from the store.
    ///
    /// If the current song is no longer present, the song that now occupies
    /// its index (or the last song) becomes current and keeps playing if
    /// playback was running. An empty playlist returns the controller to
    /// `Idle`.
    pub fn sync_playlist(&mut self, songs: Vec<Song>) -> Result<()> {
        let removed_at = match self.state.current_song_id {
            Some(id) if !songs.iter().any(|song| song.id == id) => self.current_index().or(Some(0)),
            _ => None,
        };

        self.songs = songs;

        let Some(index) = removed_at else {
            return Ok(());
        };

        if self.songs.is_empty() {
            info!("Playlist emptied, player idle");
            self.stop();
            return Ok(());
        }

        let replacement = self.songs[index.min(self.songs.len() - 1)].id;

        if self.state.is_playing {
            self.select_song(replacement)
        } else {
            self.active = None;
            self.progress = Progress::default();
            self.set_state(PlayerState {
                current_song_id: Some(replacement),
                is_playing: false,
            });
            Ok(())
        }
    }

    /// Applies a notification from the media primitive.
    ///
    /// Notifications that do not belong to the most recent load are dropped.
    pub fn handle_media(&mut self, notification: MediaNotification) -> Result<()> {
        let MediaNotification { load, event } = notification;

        if self.active.map(|active| active.load) != Some(load) {
            debug!(load = %load, event = ?event, "Discarding stale media notification");
            return Ok(());
        }

        match event {
            MediaEvent::MetadataReady { duration } => {
                self.progress.duration = Some(duration);
                self.emit(PlayerEvent::Progress(self.progress));
            }
            MediaEvent::TimeChanged(position) => {
                self.progress.position = position;
                self.emit(PlayerEvent::Progress(self.progress));
            }
            MediaEvent::Started => self.set_playing(true),
            MediaEvent::Paused => self.set_playing(false),
            MediaEvent::Ended => {
                debug!(load = %load, "Track finished, advancing");
                return self.next();
            }
            MediaEvent::Failed(reason) => {
                self.set_playing(false);
                return Err(self.report(Error::Playback(reason)));
            }
        }

        Ok(())
    }

    fn load_and_play(&mut self, song: &Song) -> Result<()> {
        self.active = None;
        self.progress = Progress::default();

        let load = match self.media.load(&song.audio) {
            Ok(load) => load,
            Err(e) => {
                self.set_playing(false);
                return Err(self.report(e));
            }
        };

        self.active = Some(ActiveLoad { load, song: song.id });
        self.emit(PlayerEvent::NowPlaying(song.clone()));

        self.resume()
    }

    fn resume(&mut self) -> Result<()> {
        if let Err(e) = self.media.play() {
            self.set_playing(false);
            return Err(self.report(e));
        }

        self.set_playing(true);
        Ok(())
    }

    fn stop(&mut self) {
        if self.active.take().is_some() {
            if let Err(e) = self.media.pause() {
                warn!(error = %e, "Failed to pause media");
            }
        }

        self.progress = Progress::default();
        self.set_state(PlayerState::default());
    }

    fn set_playing(&mut self, is_playing: bool) {
        self.set_state(PlayerState { is_playing, ..self.state });
    }

    fn set_state(&mut self, state: PlayerState) {
        if state.current_song_id.is_none() && state.is_playing {
            return;
        }

        if self.state != state {
            self.state = state;
            self.emit(PlayerEvent::StateChanged(state));
        }
    }

    /// Publishes an error to subscribers and hands it back for returning.
    fn report(&mut self, error: Error) -> Error {
        warn!(error = %error, "Player error");
        self.emit(PlayerEvent::Error(error.to_string()));
        error
    }

    fn emit(&mut self, event: PlayerEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
