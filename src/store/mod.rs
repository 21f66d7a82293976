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

//! Song storage backends.
//!
//! A [`SongStore`] owns the authoritative, ordered playlist. Insertion order
//! is display order and playback order.
//!
//! # Backends
//!
//! * [`MemoryStore`] - transient, lives as long as the process.
//! * [`LocalStore`] - durable, the playlist is kept as one JSON document
//!   under a namespaced key in a SQLite file and rewritten on every change.
//! * [`RemoteStore`] - a song service reached over a CRUD-style HTTP API.
//!
//! Store calls block; run them on the worker in [`crate::tasks`] to keep the
//! UI responsive.

mod local;
mod memory;
mod remote;

pub use local::LocalStore;
pub use memory::MemoryStore;
pub use remote::RemoteStore;

use std::time::Duration;

use tracing::warn;

use crate::{
    config::{AppConfig, StoreConfig},
    error::{Error, Result},
    model::{NewSong, Song, SongId},
};

pub trait SongStore: Send {
    /// Returns a snapshot of the playlist in order.
    fn list(&self) -> Result<Vec<Song>>;

    /// Validates and appends a song, assigning it a fresh id.
    fn add(&mut self, song: NewSong) -> Result<Song>;

    /// Removes a song, keeping the order of the rest.
    fn remove(&mut self, id: SongId) -> Result<()>;

    fn clear(&mut self) -> Result<()>;

    /// The song the backend remembers as current, if it tracks one.
    fn current(&self) -> Result<Option<SongId>> {
        Ok(None)
    }
}

impl<S: SongStore + ?Sized> SongStore for Box<S> {
    fn list(&self) -> Result<Vec<Song>> {
        (**self).list()
    }

    fn add(&mut self, song: NewSong) -> Result<Song> {
        (**self).add(song)
    }

    fn remove(&mut self, id: SongId) -> Result<()> {
        (**self).remove(id)
    }

    fn clear(&mut self) -> Result<()> {
        (**self).clear()
    }

    fn current(&self) -> Result<Option<SongId>> {
        (**self).current()
    }
}

/// Builds the store selected in the application configuration.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or the service URL is
/// invalid.
pub fn open_store(config: &AppConfig) -> Result<Box<dyn SongStore>> {
    let store: Box<dyn SongStore> = match &config.store {
        StoreConfig::Memory => Box::new(MemoryStore::new()),
        StoreConfig::Local { database } => Box::new(LocalStore::open(database)?),
        StoreConfig::Remote {
            base_url,
            timeout_secs,
        } => Box::new(RemoteStore::new(
            base_url,
            Duration::from_secs(*timeout_secs),
            config.fallback_urls.clone(),
        )?),
    };

    Ok(store)
}

/// Opens the configured store, falling back to an empty [`MemoryStore`] when
/// that fails so the session can still start.
///
/// The error that forced the fallback is returned alongside the store.
pub fn open_store_or_memory(config: &AppConfig) -> (Box<dyn SongStore>, Option<Error>) {
    match open_store(config) {
        Ok(store) => (store, None),
        Err(e) => {
            warn!(error = %e, "Failed to open song store, using an in-memory playlist");
            (Box::new(MemoryStore::new()), Some(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unusable_store_falls_back_to_memory() {
        let config = AppConfig {
            store: StoreConfig::Remote {
                base_url: "not a url".to_string(),
                timeout_secs: 5,
            },
            ..AppConfig::default()
        };

        let (mut store, error) = open_store_or_memory(&config);

        assert!(error.is_some());
        assert!(store.list().unwrap().is_empty());
        store
            .add(NewSong::new("Fallback", "Artist", 10, crate::model::AudioRef::parse("/music/a.mp3")))
            .unwrap();
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn working_store_is_used_directly() {
        let config = AppConfig {
            store: StoreConfig::Memory,
            ..AppConfig::default()
        };

        let (_, error) = open_store_or_memory(&config);

        assert!(error.is_none());
    }
}
