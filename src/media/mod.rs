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

//! The single audio output shared by the whole application.
//!
//! Playback itself is delegated to an implementation of [`MediaPrimitive`].
//! Commands are fire-and-forget: the primitive reports what actually happens
//! asynchronously as [`MediaNotification`]s, each tagged with the [`LoadId`]
//! of the source it belongs to. A notification for anything other than the
//! most recent load is stale and must be ignored by the receiver.

#[cfg(feature = "mpv")]
mod mpv;

#[cfg(feature = "mpv")]
pub use self::mpv::MpvMedia;

use std::{collections::VecDeque, fmt};

use crate::{error::Result, model::AudioRef};

/// Identifies one call to [`MediaPrimitive::load`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadId(pub u64);

impl LoadId {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for LoadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum MediaEvent {
    /// The source's duration in seconds is now known.
    MetadataReady { duration: f64 },
    /// The playback position moved, in seconds.
    TimeChanged(f64),
    Started,
    Paused,
    /// Playback reached the end of the source.
    Ended,
    /// The source could not be loaded or played.
    Failed(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct MediaNotification {
    pub load: LoadId,
    pub event: MediaEvent,
}

impl MediaNotification {
    pub fn new(load: LoadId, event: MediaEvent) -> Self {
        Self { load, event }
    }
}

/// An audio output able to play one source at a time.
///
/// Loading a source replaces whatever was loaded before and leaves the
/// output paused at the start of the new source.
pub trait MediaPrimitive {
    /// Replaces the current source, returning the id that tags every
    /// notification produced for it.
    fn load(&mut self, audio: &AudioRef) -> Result<LoadId>;

    fn play(&mut self) -> Result<()>;

    fn pause(&mut self) -> Result<()>;

    /// Moves the playback position of the current source, in seconds.
    fn seek(&mut self, seconds: f64) -> Result<()>;
}

/// Attributes backend events to loads for outputs that switch sources
/// asynchronously.
///
/// A load stays pending from the moment it is issued until the backend
/// reports that its source has started. Anything the backend emits in between
/// still comes from the previous source and is tagged with the previous id.
/// Each load carries a resource that must live as long as its source plays.
#[derive(Debug)]
pub struct LoadTracker<T> {
    current: LoadId,
    resource: Option<T>,
    pending: VecDeque<(LoadId, Option<T>)>,
}

impl<T> LoadTracker<T> {
    pub fn new() -> Self {
        Self {
            current: LoadId::default(),
            resource: None,
            pending: VecDeque::new(),
        }
    }

    /// The load that events coming out of the backend belong to.
    pub fn current(&self) -> LoadId {
        self.current
    }

    /// The most recently issued load, pending or not. Commands act on it.
    pub fn latest(&self) -> LoadId {
        self.pending.back().map_or(self.current, |(load, _)| *load)
    }

    /// The resource held for the current load.
    pub fn resource(&self) -> Option<&T> {
        self.resource.as_ref()
    }

    pub fn is_switching(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Records a load the backend accepted but has not started yet.
    pub fn issued(&mut self, load: LoadId, resource: Option<T>) {
        self.pending.push_back((load, resource));
    }

    /// The backend started the oldest pending source.
    ///
    /// Returns the load that is now current, or `None` when nothing was
    /// pending.
    pub fn started(&mut self) -> Option<LoadId> {
        let (load, resource) = self.pending.pop_front()?;
        self.current = load;
        self.resource = resource;
        Some(load)
    }
}

impl<T> Default for LoadTracker<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: MediaPrimitive + ?Sized> MediaPrimitive for Box<M> {
    fn load(&mut self, audio: &AudioRef) -> Result<LoadId> {
        (**self).load(audio)
    }

    fn play(&mut self) -> Result<()> {
        (**self).play()
    }

    fn pause(&mut self) -> Result<()> {
        (**self).pause()
    }

    fn seek(&mut self, seconds: f64) -> Result<()> {
        (**self).seek(seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_belong_to_previous_load_until_new_source_starts() {
        let mut tracker = LoadTracker::new();
        tracker.issued(LoadId(1), Some("first"));
        tracker.started();
        assert_eq!(tracker.current(), LoadId(1));

        // The old source ends while the replacement is still being opened.
        tracker.issued(LoadId(2), Some("second"));
        assert!(tracker.is_switching());
        assert_eq!(tracker.current(), LoadId(1));
        assert_eq!(tracker.latest(), LoadId(2));

        assert_eq!(tracker.started(), Some(LoadId(2)));
        assert!(!tracker.is_switching());
        assert_eq!(tracker.current(), LoadId(2));
        assert_eq!(tracker.resource(), Some(&"second"));
    }

    #[test]
    fn rapid_loads_start_in_issue_order() {
        let mut tracker: LoadTracker<()> = LoadTracker::new();
        tracker.issued(LoadId(1), None);
        tracker.issued(LoadId(2), None);
        tracker.issued(LoadId(3), None);

        assert_eq!(tracker.started(), Some(LoadId(1)));
        assert_eq!(tracker.current(), LoadId(1));
        assert_eq!(tracker.started(), Some(LoadId(2)));
        assert_eq!(tracker.started(), Some(LoadId(3)));
        assert_eq!(tracker.current(), LoadId(3));
    }

    #[test]
    fn start_without_pending_load_keeps_current() {
        let mut tracker: LoadTracker<()> = LoadTracker::new();
        tracker.issued(LoadId(4), None);
        tracker.started();

        assert_eq!(tracker.started(), None);
        assert_eq!(tracker.current(), LoadId(4));
    }
}
