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

//! Human-readable time formatting.

use crate::error::{Error, Result};

/// Formats a duration in seconds as `M:SS`, or `H:MM:SS` from one hour up.
///
/// Used for song durations, playback position and playlist totals.
///
/// # Examples
///
/// ```
/// use tunedeck::util::format::format_time;
///
/// assert_eq!(format_time(65), "1:05");
/// assert_eq!(format_time(3600), "1:00:00");
/// ```
pub fn format_time(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let mins = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{}:{:02}", mins, secs)
    }
}

/// Formats a fractional number of seconds, as reported by a media player.
///
/// Negative and non-finite values are shown as `0:00`.
pub fn format_seconds(seconds: f64) -> String {
    if seconds.is_finite() && seconds > 0.0 {
        format_time(seconds.floor() as u64)
    } else {
        format_time(0)
    }
}

/// Parses a duration typed by the user: `SS`, `M:SS` or `H:MM:SS`.
///
/// # Errors
///
/// Returns [`Error::Validation`] for anything that is not a positive whole
/// number of seconds in one of those forms.
pub fn parse_duration(text: &str) -> Result<u32> {
    let invalid = || Error::Validation(format!("Invalid duration: {}", text.trim()));

    let parts = text
        .trim()
        .split(':')
        .map(|part| part.parse::<u32>().map_err(|_| invalid()))
        .collect::<Result<Vec<_>>>()?;

    let seconds = match parts.as_slice() {
        [s] => *s,
        [m, s] if *s < 60 => m * 60 + s,
        [h, m, s] if *m < 60 && *s < 60 => h * 3600 + m * 60 + s,
        _ => return Err(invalid()),
    };

    if seconds == 0 {
        return Err(invalid());
    }

    Ok(seconds)
}
