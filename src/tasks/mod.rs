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

//! Asynchronous song store processing.
//!
//! This module implements the command pattern used to keep store calls,
//! which may hit the disk or the network, off the UI thread. A dedicated
//! worker owns the [`SongStore`], executes [`StoreTask`] requests one at a
//! time and reports each completion back as a [`StoreEvent`].
//!
//! Completions arrive in the order tasks were processed. Every successful
//! mutation is followed by a fresh [`StoreEvent::Listed`] snapshot so the
//! caller never has to issue its own reload. A failed task produces a single
//! [`StoreEvent::Failed`] and the caller's cached playlist is left as it was.

use std::{
    sync::mpsc::{Receiver, Sender},
    thread::{self, JoinHandle},
};

use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    model::{NewSong, Song, SongId},
    store::SongStore,
};

#[derive(Debug)]
pub enum StoreTask {
    Refresh,
    Add(NewSong),
    Remove(SongId),
    Clear,
    FetchCurrent,
}

impl StoreTask {
    /// Short name for logging; `Add` may carry a whole embedded audio file.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreTask::Refresh => "refresh",
            StoreTask::Add(_) => "add",
            StoreTask::Remove(_) => "remove",
            StoreTask::Clear => "clear",
            StoreTask::FetchCurrent => "fetch_current",
        }
    }
}

#[derive(Debug)]
pub enum StoreEvent {
    Listed(Vec<Song>),
    Added(Song),
    Removed(SongId),
    Cleared,
    Current(Option<SongId>),
    Failed(Error),
}

/// Spawns a background thread that owns `store` and processes tasks.
///
/// The worker exits when the task channel is closed or the event receiver
/// has gone away.
///
/// # Arguments
///
/// * `store` - The store to operate on.
/// * `task_rx` - The receiving end of the task channel.
/// * `event_tx` - The channel used to broadcast completions. Any event type
///   that can be built from a [`StoreEvent`] is accepted, so a front-end can
///   feed completions straight into its own event loop.
pub fn spawn_store_worker<S, E>(mut store: S, task_rx: Receiver<StoreTask>, event_tx: Sender<E>) -> JoinHandle<()>
where
    S: SongStore + 'static,
    E: From<StoreEvent> + Send + 'static,
{
    thread::spawn(move || {
        while let Ok(task) = task_rx.recv() {
            debug!(task = task.kind(), "Processing store task");

            let events = match handle_task(&mut store, task) {
                Ok(events) => events,
                Err(e) => {
                    warn!(error = %e, "Store task failed");
                    vec![StoreEvent::Failed(e)]
                }
            };

            for event in events {
                if event_tx.send(E::from(event)).is_err() {
                    return;
                }
            }
        }
    })
}

/// Executes a single task, returning the completions to report.
fn handle_task<S: SongStore + ?Sized>(store: &mut S, task: StoreTask) -> Result<Vec<StoreEvent>> {
    let events = match task {
        StoreTask::Refresh => vec![StoreEvent::Listed(store.list()?)],

        StoreTask::Add(song) => {
            let song = store.add(song)?;
            vec![StoreEvent::Added(song), StoreEvent::Listed(store.list()?)]
        }

        StoreTask::Remove(id) => {
            store.remove(id)?;
            vec![StoreEvent::Removed(id), StoreEvent::Listed(store.list()?)]
        }

        StoreTask::Clear => {
            store.clear()?;
            vec![StoreEvent::Cleared, StoreEvent::Listed(store.list()?)]
        }

        StoreTask::FetchCurrent => vec![StoreEvent::Current(store.current()?)],
    };

    Ok(events)
}

#[cfg(test)]
mod tests {
    use std::{sync::mpsc, time::Duration};

    use super::*;
    use crate::{model::AudioRef, store::MemoryStore};

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn new_song(title: &str, duration: u32) -> NewSong {
        NewSong::new(title, "Artist", duration, AudioRef::parse("/music/a.mp3"))
    }

    fn worker() -> (Sender<StoreTask>, Receiver<StoreEvent>) {
        let (task_tx, task_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        spawn_store_worker(MemoryStore::new(), task_rx, event_tx);
        (task_tx, event_rx)
    }

    #[test]
    fn add_reports_song_then_snapshot() {
        let (tasks, events) = worker();
        tasks.send(StoreTask::Add(new_song("A", 30))).unwrap();

        let added = match events.recv_timeout(TIMEOUT).unwrap() {
            StoreEvent::Added(song) => song,
            other => panic!("unexpected event {other:?}"),
        };
        assert_eq!(added.title, "A");

        match events.recv_timeout(TIMEOUT).unwrap() {
            StoreEvent::Listed(songs) => assert_eq!(songs, vec![added]),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn failure_is_reported_without_snapshot() {
        let (tasks, events) = worker();
        tasks.send(StoreTask::Add(new_song("A", 0))).unwrap();
        tasks.send(StoreTask::Refresh).unwrap();

        assert!(matches!(
            events.recv_timeout(TIMEOUT).unwrap(),
            StoreEvent::Failed(Error::Validation(_))
        ));
        match events.recv_timeout(TIMEOUT).unwrap() {
            StoreEvent::Listed(songs) => assert!(songs.is_empty()),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn completions_follow_task_order() {
        let (tasks, events) = worker();
        tasks.send(StoreTask::Add(new_song("A", 30))).unwrap();
        tasks.send(StoreTask::Remove(SongId(99))).unwrap();
        tasks.send(StoreTask::Clear).unwrap();
        tasks.send(StoreTask::FetchCurrent).unwrap();

        let kinds: Vec<&str> = (0..6)
            .map(|_| match events.recv_timeout(TIMEOUT).unwrap() {
                StoreEvent::Listed(_) => "listed",
                StoreEvent::Added(_) => "added",
                StoreEvent::Removed(_) => "removed",
                StoreEvent::Cleared => "cleared",
                StoreEvent::Current(_) => "current",
                StoreEvent::Failed(_) => "failed",
            })
            .collect();

        assert_eq!(kinds, vec!["added", "listed", "failed", "cleared", "listed", "current"]);
    }
}
