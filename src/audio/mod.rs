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

//! Turning local audio files into playable references.
//!
//! A file chosen by the user is either referenced by path or embedded as a
//! `data:` URL, which is what the remote song service stores. Tags are read
//! with `lofty` so that title, artist and duration can be filled in when the
//! user leaves them out, and whole directories can be imported with
//! `walkdir`.

use std::{
    borrow::Cow,
    fs,
    path::{Path, PathBuf},
};

use base64::{Engine, engine::general_purpose::STANDARD};
use lofty::{prelude::*, probe::Probe};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::{
    error::{Error, Result},
    model::{AudioRef, NewSong},
};

const AUDIO_EXTENSIONS: &[&str] = &["mp3", "ogg", "oga", "opus", "flac", "wav", "m4a", "aac"];

/// Metadata read from an audio file's tags and stream properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub duration: Option<u32>,
}

/// Optional details supplied by the user when adding a file.
#[derive(Debug, Clone, Default)]
pub struct SongDetails {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub duration: Option<u32>,
}

/// Guesses the MIME type of an audio file from its extension.
pub fn mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "mp3" => "audio/mpeg",
        "ogg" | "oga" => "audio/ogg",
        "opus" => "audio/opus",
        "flac" => "audio/flac",
        "wav" => "audio/wav",
        "m4a" => "audio/mp4",
        "aac" => "audio/aac",
        _ => "application/octet-stream",
    }
}

/// Reads a file and encodes it as a `data:<mime>;base64,<payload>` URL.
///
/// # Errors
///
/// Returns [`Error::Validation`] if the file does not exist and
/// [`Error::Io`] if it cannot be read.
pub fn data_url(path: &Path) -> Result<String> {
    require_file(path)?;

    let bytes = fs::read(path)?;
    Ok(format!("data:{};base64,{}", mime_type(path), STANDARD.encode(bytes)))
}

/// Splits a base64 `data:` URL into its MIME type and decoded payload.
///
/// # Errors
///
/// Returns [`Error::Playback`] if the URL is not a base64 data URL.
pub fn decode_data_url(url: &str) -> Result<(String, Vec<u8>)> {
    let invalid = || Error::Playback("audio data is not a base64 data URL".to_string());

    let rest = url.strip_prefix("data:").ok_or_else(invalid)?;
    let (header, payload) = rest.split_once(',').ok_or_else(invalid)?;
    let mime = header.strip_suffix(";base64").ok_or_else(invalid)?;

    let bytes = STANDARD.decode(payload.trim()).map_err(|e| Error::Playback(e.to_string()))?;

    Ok((mime.to_string(), bytes))
}

/// Builds a playable reference for a local file.
///
/// # Errors
///
/// Returns [`Error::Validation`] if the file does not exist.
pub fn audio_ref(path: &Path, embed: bool) -> Result<AudioRef> {
    if embed {
        Ok(AudioRef::Inline(data_url(path)?))
    } else {
        require_file(path)?;
        Ok(AudioRef::File(path.to_path_buf()))
    }
}

/// Reads tags and the stream duration from an audio file.
///
/// # Errors
///
/// Returns [`Error::Validation`] if the file cannot be probed.
pub fn read_tags(path: &Path) -> Result<FileTags> {
    let tagged_file = Probe::open(path)
        .and_then(|p| p.read())
        .map_err(|e| Error::Validation(format!("Unreadable audio file {}: {}", path.display(), e)))?;

    let duration = u32::try_from(tagged_file.properties().duration().as_secs())
        .ok()
        .filter(|secs| *secs > 0);

    let tag = tagged_file.primary_tag().or_else(|| tagged_file.first_tag());

    Ok(FileTags {
        title: tag.and_then(|t| tag_text(t.title())),
        artist: tag.and_then(|t| tag_text(t.artist())),
        duration,
    })
}

/// Prepares a song from a local file, filling missing details from its tags.
///
/// The title falls back to the file name. Details the user supplied always
/// win over tags.
///
/// # Errors
///
/// Returns [`Error::Validation`] if the file is missing, or if no artist or
/// duration is available from either the user or the tags.
pub fn new_song_from_file(path: &Path, details: SongDetails, embed: bool) -> Result<NewSong> {
    require_file(path)?;

    let needs_tags = details.title.is_none() || details.artist.is_none() || details.duration.is_none();
    let tags = if needs_tags {
        read_tags(path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "Could not read tags");
            FileTags::default()
        })
    } else {
        FileTags::default()
    };

    let title = details
        .title
        .or(tags.title)
        .or_else(|| path.file_stem().map(|stem| stem.to_string_lossy().into_owned()))
        .unwrap_or_default();
    let artist = details.artist.or(tags.artist).unwrap_or_default();
    let duration = details.duration.or(tags.duration).unwrap_or(0);

    let song = NewSong::new(title, artist, duration, audio_ref(path, embed)?);
    song.validate()?;

    Ok(song)
}

/// Recursively collects every importable audio file under `root`.
///
/// Files that cannot be read, or that have no artist tag or duration, are
/// skipped with a warning. Results are ordered by path.
pub fn scan_dir(root: &Path, embed: bool) -> Vec<NewSong> {
    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_audio_file(e.path()))
        .map(|e| e.into_path())
        .collect();
    paths.sort();

    let mut songs = Vec::new();
    for path in paths {
        match new_song_from_file(&path, SongDetails::default(), embed) {
            Ok(song) => songs.push(song),
            Err(e) => warn!(path = %path.display(), error = %e, "Skipping file"),
        }
    }

    debug!(root = %root.display(), count = songs.len(), "Scanned directory");

    songs
}

fn tag_text(value: Option<Cow<'_, str>>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| AUDIO_EXTENSIONS.contains(&ext.as_str()))
}

fn require_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(Error::Validation(format!("Music file not found: {}", path.display())))
    }
}
