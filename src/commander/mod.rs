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

//! Command-line input logic and state management.
//!
//! This module implements a command-line component: `:` enters command mode,
//! text is collected by a managed input, and `Enter` parses the line into an
//! application event.
//!
//! # Commands
//!
//! * `add <file>` - add a song, taking title, artist and duration from tags
//! * `add <title> | <artist> | [duration] | <file>` - add with explicit details
//! * `import <dir>` - add every audio file found below a directory
//! * `rm` - remove the highlighted song
//! * `clear` - remove every song
//! * `seek <percent>` - jump within the current song
//! * `next`, `prev`, `shuffle`, `play`, `pause`
//! * `q` - quit

use std::{path::PathBuf, sync::mpsc::Sender};

use anyhow::{Result, bail};
use crossterm::event::{Event, KeyCode};
use tui_input::{Input, backend::crossterm::EventHandler};

use tunedeck::{audio::SongDetails, util::format::parse_duration};

use crate::events::AppEvent;

pub(crate) struct Commander {
    active: bool,
    pub(crate) input: Input,
}

impl Commander {
    pub(crate) fn new() -> Self {
        Self {
            active: false,
            input: Input::default(),
        }
    }

    pub(crate) fn active(&self) -> bool {
        self.active
    }

    /// Feeds a terminal event to the command line.
    ///
    /// Returns `true` if the event was consumed.
    pub(crate) fn handle_event(&mut self, event: &Event, event_tx: &Sender<AppEvent>) -> Result<bool> {
        let Event::Key(key_event) = event else {
            return Ok(false);
        };

        if !self.active {
            if key_event.code == KeyCode::Char(':') {
                self.active = true;
                return Ok(true);
            }
            return Ok(false);
        }

        match key_event.code {
            KeyCode::Esc => {
                self.input.reset();
                self.active = false;
            }

            KeyCode::Enter => {
                let buffer = self.input.value().trim().to_string();
                self.input.reset();
                self.active = false;

                if !buffer.is_empty() {
                    let event = parse_command(&buffer).unwrap_or_else(|e| AppEvent::Error(e.to_string()));
                    event_tx.send(event)?;
                }
            }

            _ => {
                // Delegate all other key events to the managed input component.
                self.input.handle_event(event);
            }
        }

        Ok(true)
    }
}

/// Parses one command line into the event that carries it out.
fn parse_command(buffer: &str) -> Result<AppEvent> {
    let parts: Vec<&str> = buffer.split_whitespace().collect();

    let event = match parts.as_slice() {
        ["q"] | ["quit"] => AppEvent::ExitApplication,

        ["add", rest @ ..] if !rest.is_empty() => parse_add(&rest.join(" "))?,

        ["import", dir @ ..] if !dir.is_empty() => AppEvent::ImportDirectory(PathBuf::from(dir.join(" "))),

        ["rm"] => AppEvent::RemoveSelected,
        ["clear"] => AppEvent::ClearPlaylist,

        ["seek", percent] => match percent.trim_end_matches('%').parse::<f64>() {
            Ok(percent) => AppEvent::Seek(percent),
            Err(_) => bail!("Invalid seek position: {percent}"),
        },

        ["next"] => AppEvent::Next,
        ["prev"] => AppEvent::Previous,
        ["shuffle"] => AppEvent::Shuffle,
        ["play"] => AppEvent::Play,
        ["pause"] => AppEvent::Pause,

        [cmd, ..] => bail!("Unknown command: {cmd}"),
        [] => bail!("Empty command"),
    };

    Ok(event)
}

/// Parses the arguments of `add`.
///
/// Either a single file path, or `title | artist | [duration] | file`.
fn parse_add(args: &str) -> Result<AppEvent> {
    let fields: Vec<&str> = args.split('|').map(str::trim).collect();

    let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());

    let (details, path) = match fields.as_slice() {
        [path] => (SongDetails::default(), *path),
        [title, artist, path] => (
            SongDetails {
                title: non_empty(title),
                artist: non_empty(artist),
                duration: None,
            },
            *path,
        ),
        [title, artist, duration, path] => (
            SongDetails {
                title: non_empty(title),
                artist: non_empty(artist),
                duration: if duration.is_empty() { None } else { Some(parse_duration(duration)?) },
            },
            *path,
        ),
        _ => bail!("Usage: add <title> | <artist> | [duration] | <file>"),
    };

    if path.is_empty() {
        bail!("Please select a music file");
    }

    Ok(AppEvent::AddSong {
        path: PathBuf::from(path),
        details,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_with_details() {
        match parse_command("add Song A | Some Artist | 1:30 | /music/a.mp3").unwrap() {
            AppEvent::AddSong { path, details } => {
                assert_eq!(path, PathBuf::from("/music/a.mp3"));
                assert_eq!(details.title.as_deref(), Some("Song A"));
                assert_eq!(details.artist.as_deref(), Some("Some Artist"));
                assert_eq!(details.duration, Some(90));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn add_file_only() {
        match parse_command("add /music/My Song.mp3").unwrap() {
            AppEvent::AddSong { path, details } => {
                assert_eq!(path, PathBuf::from("/music/My Song.mp3"));
                assert!(details.title.is_none());
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn rejected_commands() {
        assert!(parse_command("add A | B | 0 | /music/a.mp3").is_err());
        assert!(parse_command("add A | B |").is_err());
        assert!(parse_command("seek half").is_err());
        assert!(parse_command("dance").is_err());
    }

    #[test]
    fn seek_accepts_percent_sign() {
        assert!(matches!(parse_command("seek 25%").unwrap(), AppEvent::Seek(p) if p == 25.0));
    }
}
