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

//! # Playlist player core.
//!
//! The library behind the `tunedeck` terminal player: an ordered playlist
//! of songs kept in a [`store::SongStore`], a [`player::PlayerController`]
//! state machine that drives a single [`media::MediaPrimitive`], and a pure
//! [`view`] projection used by front-ends to draw the playlist.
//!
//! ## Architecture
//!
//! * **Stores** own the authoritative playlist. Three backends exist: process
//!   memory, a durable local SQLite file and a remote HTTP service.
//! * **Tasks** run a store on a background worker so that every store
//!   operation completes asynchronously, reported back as a
//!   [`tasks::StoreEvent`].
//! * **The controller** holds a cached copy of the playlist, fed by
//!   [`player::PlayerController::sync_playlist`], and the player state. It is
//!   the only writer of the media primitive.
//! * **Views** are recomputed from the cached playlist and the current song
//!   id whenever either changes.
//!
//! Communication with background workers uses `std::sync::mpsc` channels.

pub mod audio;
pub mod config;
pub mod error;
pub mod media;
pub mod model;
pub mod player;
pub mod store;
pub mod tasks;
pub mod util;
pub mod view;

pub use error::{Error, Result};
pub use model::{AudioRef, NewSong, PlaybackStatus, PlayerState, Song, SongId};
