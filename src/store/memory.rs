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

//! Transient in-process song store.

use tracing::info;

use crate::{
    error::{Error, Result},
    model::{NewSong, Song, SongId},
    store::SongStore,
};

/// A playlist held only in memory; ids come from a per-store sequence.
#[derive(Debug)]
pub struct MemoryStore {
    songs: Vec<Song>,
    next_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            songs: Vec::new(),
            next_id: 1,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SongStore for MemoryStore {
    fn list(&self) -> Result<Vec<Song>> {
        Ok(self.songs.clone())
    }

    fn add(&mut self, song: NewSong) -> Result<Song> {
        song.validate()?;

        let song = song.into_song(SongId(self.next_id));
        self.next_id += 1;
        self.songs.push(song.clone());

        info!(id = %song.id, title = %song.title, "Added song");

        Ok(song)
    }

    fn remove(&mut self, id: SongId) -> Result<()> {
        let index = self
            .songs
            .iter()
            .position(|song| song.id == id)
            .ok_or(Error::NotFound(id))?;

        self.songs.remove(index);

        info!(%id, "Removed song");

        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.songs.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AudioRef;

    fn new_song(title: &str) -> NewSong {
        NewSong::new(title, "Artist", 30, AudioRef::parse("/music/a.mp3"))
    }

    #[test]
    fn add_appends_with_fresh_ids() {
        let mut store = MemoryStore::new();
        let a = store.add(new_song("A")).unwrap();
        let b = store.add(new_song("B")).unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(store.list().unwrap(), vec![a, b]);
    }

    #[test]
    fn invalid_song_leaves_playlist_unchanged() {
        let mut store = MemoryStore::new();
        store.add(new_song("A")).unwrap();

        let zero = NewSong::new("B", "Artist", 0, AudioRef::parse("/music/b.mp3"));
        assert!(matches!(store.add(zero), Err(Error::Validation(_))));
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn remove_keeps_relative_order() {
        let mut store = MemoryStore::new();
        let a = store.add(new_song("A")).unwrap();
        let b = store.add(new_song("B")).unwrap();
        let c = store.add(new_song("C")).unwrap();

        store.remove(b.id).unwrap();

        assert_eq!(store.list().unwrap(), vec![a, c]);
    }

    #[test]
    fn remove_unknown_id_is_not_found() {
        let mut store = MemoryStore::new();
        assert!(matches!(store.remove(SongId(42)), Err(Error::NotFound(SongId(42)))));
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut store = MemoryStore::new();
        let a = store.add(new_song("A")).unwrap();
        store.remove(a.id).unwrap();
        let b = store.add(new_song("B")).unwrap();

        assert_ne!(a.id, b.id);
    }

    #[test]
    fn clear_empties_the_playlist() {
        let mut store = MemoryStore::new();
        store.add(new_song("A")).unwrap();
        store.clear().unwrap();

        assert!(store.list().unwrap().is_empty());
    }
}
