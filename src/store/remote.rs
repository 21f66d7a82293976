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

//! Song store backed by a remote song service.
//!
//! The service exposes a CRUD-style JSON API:
//!
//! * `GET /songs` - the ordered playlist.
//! * `POST /songs` - add a song, body `{title, artist, duration, audioData}`.
//! * `DELETE /songs/{id}` - remove a song.
//! * `POST /player/next`, `POST /player/previous`, `POST /player/shuffle` and
//!   `GET /player/current` - the service's own notion of the current song.
//!
//! Navigation is driven by the local [`crate::player::PlayerController`];
//! the front-end only reads `/player/current` (through [`SongStore::current`])
//! to restore the selection at startup. The other `player_*` calls are
//! exposed for library users that want the service to track the selection.
//!
//! Every failure to reach the service, or an unexpected status, surfaces as
//! [`Error::Transport`] and leaves the caller's cached playlist untouched.

use std::time::Duration;

use reqwest::{
    StatusCode,
    blocking::{Client, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    audio,
    error::{Error, Result},
    model::{AudioRef, NewSong, Song, SongId},
    store::SongStore,
};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// A song as the service reports it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SongRecord {
    id: SongId,
    title: String,
    artist: String,
    duration: u32,
    #[serde(default)]
    audio_data: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateSong<'a> {
    title: &'a str,
    artist: &'a str,
    duration: u32,
    audio_data: String,
}

/// The `{success, ...}` envelope returned by mutating endpoints.
#[derive(Debug, Default, Deserialize)]
struct Reply {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    song: Option<SongRecord>,
    #[serde(default)]
    current: Option<SongRecord>,
    #[serde(default)]
    message: Option<String>,
}

pub struct RemoteStore {
    http: Client,
    base_url: String,
    fallback_urls: Vec<String>,
}

impl RemoteStore {
    /// Creates a client for the service at `base_url`.
    ///
    /// `fallback_urls` are played for songs the service holds no audio for.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the URL is empty or not `http(s)`, and
    /// [`Error::Transport`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration, fallback_urls: Vec<String>) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();

        if base_url.is_empty() {
            return Err(Error::Validation("Song service URL cannot be empty".into()));
        }

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(Error::Validation(format!(
                "Song service URL must start with http:// or https://: {}",
                base_url
            )));
        }

        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .user_agent(format!("tunedeck/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            fallback_urls,
        })
    }

    /// Asks the service to advance its current song.
    ///
    /// Returns `None` when the service declines, for example at the end of
    /// its playlist.
    pub fn player_next(&self) -> Result<Option<Song>> {
        self.player_step("next")
    }

    /// Asks the service to step its current song back.
    pub fn player_previous(&self) -> Result<Option<Song>> {
        self.player_step("previous")
    }

    /// Asks the service to reorder its playlist at random.
    ///
    /// Returns whether the service reported success.
    pub fn player_shuffle(&self) -> Result<bool> {
        let url = self.url("/player/shuffle");
        debug!(url = %url, "Shuffling remote playlist");

        let reply: Reply = check(self.http.post(&url).send()?)?.json()?;

        Ok(reply.success)
    }

    /// The song the service currently considers selected.
    pub fn player_current(&self) -> Result<Option<Song>> {
        let url = self.url("/player/current");
        debug!(url = %url, "Fetching remote current song");

        let value: Option<serde_json::Value> = check(self.http.get(&url).send()?)?.json()?;

        let record = value
            .filter(|v| v.get("id").is_some_and(|id| !id.is_null()))
            .map(serde_json::from_value::<SongRecord>)
            .transpose()?;

        Ok(record.map(|r| self.to_song(r)))
    }

    fn player_step(&self, direction: &str) -> Result<Option<Song>> {
        let url = self.url(&format!("/player/{}", direction));
        debug!(url = %url, "Stepping remote player");

        let reply: Reply = check(self.http.post(&url).send()?)?.json()?;

        if !reply.success {
            return Ok(None);
        }

        Ok(reply.current.map(|r| self.to_song(r)))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn to_song(&self, record: SongRecord) -> Song {
        let audio = match record.audio_data.filter(|data| !data.is_empty()) {
            Some(data) => AudioRef::parse(&data),
            None => self.fallback_audio(record.id),
        };

        Song {
            id: record.id,
            title: record.title,
            artist: record.artist,
            duration: record.duration,
            audio,
        }
    }

    // Songs without a payload map onto the fallback list by id.
    fn fallback_audio(&self, id: SongId) -> AudioRef {
        if self.fallback_urls.is_empty() {
            return AudioRef::Url(String::new());
        }

        let index = (id.0.saturating_sub(1) % self.fallback_urls.len() as u64) as usize;
        AudioRef::Url(self.fallback_urls[index].clone())
    }
}

impl SongStore for RemoteStore {
    fn list(&self) -> Result<Vec<Song>> {
        let url = self.url("/songs");
        debug!(url = %url, "Loading playlist");

        let records: Vec<SongRecord> = check(self.http.get(&url).send()?)?.json()?;

        Ok(records.into_iter().map(|r| self.to_song(r)).collect())
    }

    fn add(&mut self, song: NewSong) -> Result<Song> {
        song.validate()?;

        // The service stores the payload itself, so local files are embedded.
        let audio_data = match &song.audio {
            AudioRef::File(path) => audio::data_url(path)?,
            other => other.to_reference(),
        };

        let body = CreateSong {
            title: song.title.trim(),
            artist: song.artist.trim(),
            duration: song.duration,
            audio_data,
        };

        let url = self.url("/songs");
        debug!(url = %url, title = %body.title, "Adding song");

        let reply: Reply = check(self.http.post(&url).json(&body).send()?)?.json()?;

        if !reply.success {
            let message = reply.message.unwrap_or_else(|| "song was not added".to_string());
            warn!(message = %message, "Service rejected song");
            return Err(Error::Transport(message));
        }

        let added = match reply.song {
            Some(record) => self.to_song(record),
            None => self
                .list()?
                .pop()
                .ok_or_else(|| Error::Transport("added song missing from playlist".into()))?,
        };

        info!(id = %added.id, title = %added.title, "Added song");

        Ok(added)
    }

    fn remove(&mut self, id: SongId) -> Result<()> {
        let url = self.url(&format!("/songs/{}", id));
        debug!(url = %url, "Removing song");

        let response = self.http.delete(&url).send()?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(id));
        }

        let reply: Reply = check(response)?.json()?;
        if !reply.success {
            return Err(Error::NotFound(id));
        }

        info!(%id, "Removed song");

        Ok(())
    }

    // The service has no bulk delete, songs are removed one at a time.
    fn clear(&mut self) -> Result<()> {
        for song in self.list()? {
            match self.remove(song.id) {
                Ok(()) | Err(Error::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }

    fn current(&self) -> Result<Option<SongId>> {
        Ok(self.player_current()?.map(|song| song.id))
    }
}

fn check(response: Response) -> Result<Response> {
    let status = response.status();

    if status.is_success() {
        Ok(response)
    } else {
        warn!(status = status.as_u16(), url = %response.url(), "Song service error");
        Err(Error::Transport(format!("server returned {}", status)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(urls: &[&str]) -> RemoteStore {
        RemoteStore::new(
            "http://localhost:8080/api/",
            Duration::from_secs(1),
            urls.iter().map(|u| u.to_string()).collect(),
        )
        .unwrap()
    }

    #[test]
    fn rejects_bad_urls() {
        assert!(matches!(
            RemoteStore::new("", Duration::from_secs(1), vec![]),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            RemoteStore::new("ftp://host", Duration::from_secs(1), vec![]),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn trailing_slash_is_normalised() {
        assert_eq!(store(&[]).url("/songs"), "http://localhost:8080/api/songs");
    }

    #[test]
    fn songs_without_audio_use_fallback_by_id() {
        let store = store(&["https://a/1.mp3", "https://a/2.mp3"]);

        let record = |id| SongRecord {
            id: SongId(id),
            title: "T".into(),
            artist: "A".into(),
            duration: 10,
            audio_data: None,
        };

        assert_eq!(store.to_song(record(1)).audio, AudioRef::Url("https://a/1.mp3".into()));
        assert_eq!(store.to_song(record(2)).audio, AudioRef::Url("https://a/2.mp3".into()));
        assert_eq!(store.to_song(record(3)).audio, AudioRef::Url("https://a/1.mp3".into()));
    }

    #[test]
    fn inline_audio_is_kept() {
        let store = store(&["https://a/1.mp3"]);
        let record = SongRecord {
            id: SongId(1),
            title: "T".into(),
            artist: "A".into(),
            duration: 10,
            audio_data: Some("data:audio/mpeg;base64,AAAA".into()),
        };

        assert!(matches!(store.to_song(record).audio, AudioRef::Inline(_)));
    }
}
