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

//! Playback position as reported by the media primitive.

use crate::{
    error::{Error, Result},
    util::format::format_seconds,
};

/// Position and duration of the active source, in seconds.
///
/// The duration is the one reported by the media primitive once metadata is
/// ready, not the duration stored with the song.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Progress {
    pub position: f64,
    pub duration: Option<f64>,
}

impl Progress {
    /// The duration, if it is known and usable for arithmetic.
    pub fn known_duration(&self) -> Option<f64> {
        self.duration.filter(|d| d.is_finite() && *d > 0.0)
    }

    /// Percentage of the source played, always within `0..=100`.
    pub fn percent(&self) -> f64 {
        match self.known_duration() {
            Some(duration) if self.position.is_finite() => (self.position / duration * 100.0).clamp(0.0, 100.0),
            _ => 0.0,
        }
    }

    pub fn elapsed_label(&self) -> String {
        format_seconds(self.position)
    }

    pub fn total_label(&self) -> String {
        format_seconds(self.known_duration().unwrap_or_default())
    }

    /// Converts a seek percentage into a position in seconds.
    ///
    /// Returns `None` when the duration is not known yet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `percent` is not within `0..=100`.
    pub fn seek_target(&self, percent: f64) -> Result<Option<f64>> {
        if !(0.0..=100.0).contains(&percent) {
            return Err(Error::Validation(format!("Seek position must be between 0 and 100, got {percent}")));
        }

        Ok(self.known_duration().map(|duration| percent / 100.0 * duration))
    }

    /// The percentage reached by moving `seconds` from the current position,
    /// clamped to the source.
    ///
    /// Returns `None` while the duration is unknown.
    pub fn percent_after(&self, seconds: f64) -> Option<f64> {
        let duration = self.known_duration()?;
        let position = if self.position.is_finite() { self.position } else { 0.0 };
        Some(((position + seconds) / duration * 100.0).clamp(0.0, 100.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(position: f64, duration: Option<f64>) -> Progress {
        Progress { position, duration }
    }

    #[test]
    fn percent_is_guarded_when_duration_unknown() {
        assert_eq!(progress(12.0, None).percent(), 0.0);
        assert_eq!(progress(12.0, Some(0.0)).percent(), 0.0);
        assert_eq!(progress(12.0, Some(f64::NAN)).percent(), 0.0);
    }

    #[test]
    fn percent_is_clamped() {
        assert_eq!(progress(15.0, Some(60.0)).percent(), 25.0);
        assert_eq!(progress(90.0, Some(60.0)).percent(), 100.0);
        assert_eq!(progress(-1.0, Some(60.0)).percent(), 0.0);
        assert_eq!(progress(f64::INFINITY, Some(60.0)).percent(), 0.0);
    }

    #[test]
    fn labels() {
        let p = progress(65.4, Some(3725.0));
        assert_eq!(p.elapsed_label(), "1:05");
        assert_eq!(p.total_label(), "1:02:05");
        assert_eq!(progress(0.0, None).total_label(), "0:00");
    }

    #[test]
    fn seek_target() {
        let p = progress(0.0, Some(200.0));
        assert_eq!(p.seek_target(25.0).unwrap(), Some(50.0));
        assert_eq!(p.seek_target(100.0).unwrap(), Some(200.0));
        assert_eq!(progress(0.0, None).seek_target(50.0).unwrap(), None);
        assert!(matches!(p.seek_target(100.5), Err(Error::Validation(_))));
        assert!(matches!(p.seek_target(f64::NAN), Err(Error::Validation(_))));
    }

    #[test]
    fn relative_seek_moves_by_seconds() {
        let hour = progress(600.0, Some(3600.0));
        let target = hour.percent_after(5.0).unwrap();
        assert!((target / 100.0 * 3600.0 - 605.0).abs() < 1e-9);

        let short = progress(10.0, Some(40.0));
        assert_eq!(short.percent_after(10.0), Some(50.0));
        assert_eq!(short.percent_after(-20.0), Some(0.0));
        assert_eq!(short.percent_after(60.0), Some(100.0));
        assert_eq!(progress(10.0, None).percent_after(5.0), None);
    }
}
