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

//! Pure projections of the playlist for display.
//!
//! Nothing here keeps state. Front-ends recompute rows whenever the playlist
//! or the current song changes.

use crate::{
    model::{Song, SongId},
    util::format::format_time,
};

pub const NO_SONG_SELECTED: &str = "No song selected";

/// One displayed playlist entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaylistRow {
    /// Position in the playlist, starting at 1.
    pub index: usize,
    pub id: SongId,
    pub title: String,
    pub artist: String,
    pub duration: String,
    /// Whether this is the current song.
    pub active: bool,
}

/// Totals shown beneath the playlist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaylistSummary {
    pub total_songs: usize,
    pub total_duration: String,
}

pub fn project(songs: &[Song], current: Option<SongId>) -> Vec<PlaylistRow> {
    songs
        .iter()
        .enumerate()
        .map(|(i, song)| PlaylistRow {
            index: i + 1,
            id: song.id,
            title: song.title.clone(),
            artist: song.artist.clone(),
            duration: format_time(u64::from(song.duration)),
            active: current == Some(song.id),
        })
        .collect()
}

/// Counts songs and adds up their stored durations.
pub fn summarize(songs: &[Song]) -> PlaylistSummary {
    let seconds = songs.iter().map(|song| u64::from(song.duration)).sum();

    PlaylistSummary {
        total_songs: songs.len(),
        total_duration: format_time(seconds),
    }
}

/// Title and artist of the current song, or a placeholder.
pub fn now_playing(songs: &[Song], current: Option<SongId>) -> (String, String) {
    current
        .and_then(|id| songs.iter().find(|song| song.id == id))
        .map(|song| (song.title.clone(), song.artist.clone()))
        .unwrap_or_else(|| (NO_SONG_SELECTED.to_string(), String::new()))
}
