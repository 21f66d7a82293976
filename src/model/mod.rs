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

//! Domain models and core data structures.
//!
//! This module defines the central entities of the player: songs, the audio
//! they refer to, and the player state tracked by the controller.

use std::{fmt, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Identity of a song, assigned by the store that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongId(pub u64);

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Something the media primitive can play.
///
/// Serialized as a single string: inline payloads are `data:` URLs, remote
/// audio is an `http(s)` URL and anything else is a path on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AudioRef {
    Inline(String),
    Url(String),
    File(PathBuf),
}

impl AudioRef {
    pub fn parse(reference: &str) -> Self {
        if reference.starts_with("data:") {
            AudioRef::Inline(reference.to_string())
        } else if reference.starts_with("http://") || reference.starts_with("https://") {
            AudioRef::Url(reference.to_string())
        } else {
            AudioRef::File(PathBuf::from(reference))
        }
    }

    /// The reference as handed to the media primitive.
    pub fn to_reference(&self) -> String {
        match self {
            AudioRef::Inline(data) => data.clone(),
            AudioRef::Url(url) => url.clone(),
            AudioRef::File(path) => path.to_string_lossy().into_owned(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            AudioRef::Inline(data) => data.is_empty(),
            AudioRef::Url(url) => url.is_empty(),
            AudioRef::File(path) => path.as_os_str().is_empty(),
        }
    }
}

impl From<String> for AudioRef {
    fn from(reference: String) -> Self {
        AudioRef::parse(&reference)
    }
}

impl From<AudioRef> for String {
    fn from(audio: AudioRef) -> Self {
        audio.to_reference()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: SongId,
    pub title: String,
    pub artist: String,
    /// Stored duration in whole seconds, display only.
    pub duration: u32,
    pub audio: AudioRef,
}

/// Song details submitted to a store, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSong {
    pub title: String,
    pub artist: String,
    pub duration: u32,
    pub audio: AudioRef,
}

impl NewSong {
    pub fn new(title: impl Into<String>, artist: impl Into<String>, duration: u32, audio: AudioRef) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            duration,
            audio,
        }
    }

    /// Checks the song can be added to a playlist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the title or artist is blank, the
    /// duration is zero or no audio was supplied.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() || self.artist.trim().is_empty() || self.duration == 0 {
            return Err(Error::Validation("Please fill all required fields".to_string()));
        }

        if self.audio.is_empty() {
            return Err(Error::Validation("Please select a music file".to_string()));
        }

        Ok(())
    }

    pub(crate) fn into_song(self, id: SongId) -> Song {
        Song {
            id,
            title: self.title.trim().to_string(),
            artist: self.artist.trim().to_string(),
            duration: self.duration,
            audio: self.audio,
        }
    }
}

/// The controller's view of playback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerState {
    pub current_song_id: Option<SongId>,
    pub is_playing: bool,
}

impl PlayerState {
    pub fn status(&self) -> PlaybackStatus {
        match (self.current_song_id, self.is_playing) {
            (None, _) => PlaybackStatus::Idle,
            (Some(_), false) => PlaybackStatus::Loaded,
            (Some(_), true) => PlaybackStatus::Playing,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackStatus {
    Idle,
    Loaded,
    Playing,
}
