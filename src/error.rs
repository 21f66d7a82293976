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

//! Error types for the playlist core.

use thiserror::Error;

use crate::model::SongId;

/// Errors raised by stores, the player controller and audio import.
///
/// None of these are fatal; callers report them and carry on.
#[derive(Debug, Error)]
pub enum Error {
    /// Song details or a command argument were rejected
    #[error("{0}")]
    Validation(String),

    /// No song with this id exists in the playlist
    #[error("Song {0} not found")]
    NotFound(SongId),

    /// The remote song service could not be reached or gave a bad answer
    #[error("Song service unavailable: {0}")]
    Transport(String),

    /// The media primitive refused or failed to play
    #[error("Error playing audio: {0}")]
    Playback(String),

    /// Play was requested with an empty playlist
    #[error("Nothing selected")]
    NothingSelected,

    /// Next or previous was requested with an empty playlist
    #[error("Playlist is empty")]
    EmptyPlaylist,

    /// Shuffle was requested with fewer than two songs
    #[error("Need at least two songs to shuffle")]
    NotEnoughSongs,

    /// Durable storage failure
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Persisted or received playlist data could not be decoded
    #[error("Malformed playlist data: {0}")]
    Malformed(#[from] serde_json::Error),

    /// IO error while reading audio files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Transport(format!("request timed out: {e}"))
        } else {
            Error::Transport(e.to_string())
        }
    }
}

/// Result type for playlist operations.
pub type Result<T> = std::result::Result<T, Error>;
