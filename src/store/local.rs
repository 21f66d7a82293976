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

//! Durable song store.
//!
//! The playlist is kept as a single JSON array under a namespaced key in a
//! small SQLite key/value table. It is read once when the store is opened
//! and rewritten in full after every mutation.
//!
//! # Tables
//!
//! * `storage` - `key` / `value` text pairs.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info, warn};

use crate::{
    error::{Error, Result},
    model::{NewSong, Song, SongId},
    store::SongStore,
};

const SONGS_KEY: &str = "tunedeck.songs";
const NEXT_ID_KEY: &str = "tunedeck.nextId";

pub struct LocalStore {
    conn: Connection,
    songs: Vec<Song>,
    next_id: u64,
}

impl LocalStore {
    /// Opens (or creates) the store at `path` and loads the saved playlist.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * The database file cannot be opened or the schema cannot be created.
    /// * The saved playlist is not valid JSON.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = init_db(path.as_ref())?;

        let songs: Vec<Song> = match read_value(&conn, SONGS_KEY)? {
            Some(json) => serde_json::from_str(&json)?,
            None => Vec::new(),
        };

        let saved_next_id = read_value(&conn, NEXT_ID_KEY)?
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(1);
        let highest_id = songs.iter().map(|song| song.id.0).max().unwrap_or(0);

        debug!(path = %path.as_ref().display(), songs = songs.len(), "Opened local store");

        Ok(Self {
            conn,
            songs,
            next_id: saved_next_id.max(highest_id + 1),
        })
    }

    // Writes the playlist and id sequence in one transaction.
    fn persist(&mut self, songs: &[Song], next_id: u64) -> Result<()> {
        let json = serde_json::to_string(songs)?;

        let tx = self.conn.transaction()?;
        write_value(&tx, SONGS_KEY, &json)?;
        write_value(&tx, NEXT_ID_KEY, &next_id.to_string())?;
        tx.commit()?;

        Ok(())
    }
}

impl SongStore for LocalStore {
    fn list(&self) -> Result<Vec<Song>> {
        Ok(self.songs.clone())
    }

    fn add(&mut self, song: NewSong) -> Result<Song> {
        song.validate()?;

        let song = song.into_song(SongId(self.next_id));
        let mut songs = self.songs.clone();
        songs.push(song.clone());

        self.persist(&songs, self.next_id + 1)?;
        self.songs = songs;
        self.next_id += 1;

        info!(id = %song.id, title = %song.title, "Added song");

        Ok(song)
    }

    fn remove(&mut self, id: SongId) -> Result<()> {
        if !self.songs.iter().any(|song| song.id == id) {
            return Err(Error::NotFound(id));
        }

        let songs: Vec<Song> = self.songs.iter().filter(|song| song.id != id).cloned().collect();

        self.persist(&songs, self.next_id)?;
        self.songs = songs;

        info!(%id, "Removed song");

        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.persist(&[], self.next_id)?;
        self.songs.clear();

        Ok(())
    }
}

/// Opens a connection to the SQLite database and configures it.
///
/// Write-ahead logging is requested; if the filesystem does not allow it the
/// store still works with the default journal.
fn init_db(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;

    let journal_mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |r| r.get(0))?;
    if journal_mode != "wal" {
        warn!(journal_mode = %journal_mode, "Failed to switch to WAL mode");
    }

    conn.execute_batch("PRAGMA synchronous = NORMAL;")?;

    conn.execute_batch(
        "BEGIN;

        CREATE TABLE IF NOT EXISTS storage (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        COMMIT;",
    )?;

    Ok(conn)
}

fn read_value(conn: &Connection, key: &str) -> Result<Option<String>> {
    let mut stmt = conn.prepare_cached("SELECT value FROM storage WHERE key = ?")?;
    let value = stmt.query_row([key], |row| row.get(0)).optional()?;

    Ok(value)
}

fn write_value(conn: &Connection, key: &str, value: &str) -> Result<()> {
    let sql = "
        INSERT INTO storage (key, value)
        VALUES (?1, ?2)
        ON CONFLICT (key)
        DO UPDATE SET value = ?2";

    let mut stmt = conn.prepare_cached(sql)?;
    stmt.execute(params![key, value])?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AudioRef;

    fn new_song(title: &str) -> NewSong {
        NewSong::new(title, "Artist", 120, AudioRef::parse("/music/a.mp3"))
    }

    #[test]
    fn playlist_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("songs.db");

        let (a, b) = {
            let mut store = LocalStore::open(&path).unwrap();
            let a = store.add(new_song("A")).unwrap();
            let b = store.add(new_song("B")).unwrap();
            (a, b)
        };

        let store = LocalStore::open(&path).unwrap();
        assert_eq!(store.list().unwrap(), vec![a, b]);
    }

    #[test]
    fn removal_and_clear_are_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("songs.db");

        {
            let mut store = LocalStore::open(&path).unwrap();
            let a = store.add(new_song("A")).unwrap();
            store.add(new_song("B")).unwrap();
            store.remove(a.id).unwrap();
        }

        let mut store = LocalStore::open(&path).unwrap();
        let titles: Vec<_> = store.list().unwrap().into_iter().map(|s| s.title).collect();
        assert_eq!(titles, vec!["B"]);

        store.clear().unwrap();
        drop(store);

        assert!(LocalStore::open(&path).unwrap().list().unwrap().is_empty());
    }

    #[test]
    fn id_sequence_continues_across_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("songs.db");

        let first = {
            let mut store = LocalStore::open(&path).unwrap();
            let song = store.add(new_song("A")).unwrap();
            store.clear().unwrap();
            song
        };

        let mut store = LocalStore::open(&path).unwrap();
        let second = store.add(new_song("B")).unwrap();
        assert!(second.id > first.id);
    }

    #[test]
    fn missing_song_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = LocalStore::open(dir.path().join("songs.db")).unwrap();

        assert!(matches!(store.remove(SongId(3)), Err(Error::NotFound(_))));
    }

    #[test]
    fn corrupt_playlist_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("songs.db");

        {
            let conn = init_db(&path).unwrap();
            write_value(&conn, SONGS_KEY, "not json").unwrap();
        }

        assert!(matches!(LocalStore::open(&path), Err(Error::Malformed(_))));
    }
}
