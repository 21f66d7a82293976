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

//! MPV-backed media primitive.
//!
//! A background worker owns the `libmpv` context. [`MpvMedia`] is a command
//! proxy: it assigns load ids and forwards commands to the worker, which
//! observes MPV properties and reports them as [`MediaNotification`]s tagged
//! with the id of the source MPV is actually playing. After a `loadfile`, events
//! keep the previous id until MPV announces that the new file has started.

use std::{
    io::Write,
    sync::mpsc::{self, Receiver, Sender},
    thread,
};

use anyhow::{Context, Result};
use mpv::Format;
use tempfile::NamedTempFile;
use tracing::{debug, error, warn};

use crate::{
    audio,
    error::Error,
    media::{LoadId, LoadTracker, MediaEvent, MediaNotification, MediaPrimitive},
    model::AudioRef,
};

#[derive(Debug)]
enum MediaCommand {
    Load(LoadId, AudioRef),
    Play,
    Pause,
    Seek(f64),
}

pub struct MpvMedia {
    command_tx: Sender<MediaCommand>,
    last_load: LoadId,
}

impl MpvMedia {
    /// Spawns the MPV worker thread and returns a handle to it.
    ///
    /// # Arguments
    ///
    /// * `event_tx` - A channel to receive media notifications on. Any event
    ///   type that can be built from a [`MediaNotification`] is accepted.
    pub fn new<E>(event_tx: Sender<E>) -> Self
    where
        E: From<MediaNotification> + Send + 'static,
    {
        let (command_tx, command_rx) = mpsc::channel::<MediaCommand>();

        spawn_media_worker(command_rx, event_tx);

        Self {
            command_tx,
            last_load: LoadId::default(),
        }
    }

    fn send(&self, command: MediaCommand) -> crate::Result<()> {
        self.command_tx
            .send(command)
            .map_err(|_| Error::Playback("media worker has stopped".to_string()))
    }
}

impl MediaPrimitive for MpvMedia {
    fn load(&mut self, audio: &AudioRef) -> crate::Result<LoadId> {
        let load = self.last_load.next();
        self.send(MediaCommand::Load(load, audio.clone()))?;
        self.last_load = load;
        Ok(load)
    }

    fn play(&mut self) -> crate::Result<()> {
        self.send(MediaCommand::Play)
    }

    fn pause(&mut self) -> crate::Result<()> {
        self.send(MediaCommand::Pause)
    }

    fn seek(&mut self, seconds: f64) -> crate::Result<()> {
        self.send(MediaCommand::Seek(seconds))
    }
}

type Tracker = LoadTracker<NamedTempFile>;

fn spawn_media_worker<E>(command_rx: Receiver<MediaCommand>, event_tx: Sender<E>)
where
    E: From<MediaNotification> + Send + 'static,
{
    thread::spawn(move || {
        if let Err(e) = media_worker(command_rx, &event_tx) {
            error!(error = ?e, "MPV worker failure");
            let notification = MediaNotification::new(LoadId::default(), MediaEvent::Failed(format!("{e:#}")));
            let _ = event_tx.send(E::from(notification));
        }
    });
}

fn media_worker<E: From<MediaNotification>>(command_rx: Receiver<MediaCommand>, event_tx: &Sender<E>) -> Result<()> {
    let mut handler = (|| {
        let mut builder = mpv::MpvHandlerBuilder::new().context("Failed to create MPV builder")?;
        builder.set_option("vo", "null").context("Failed to set no video output")?;
        builder.build().context("Failed to build MPV handler")
    })()?;

    handler
        .observe_property::<f64>("duration", 0)
        .context("Failed to observe duration")?;
    handler
        .observe_property::<bool>("pause", 0)
        .context("Failed to observe pause")?;
    handler
        .observe_property::<f64>("time-pos", 0)
        .context("Failed to observe time-pos")?;

    // Inline audio is spooled to a temporary file owned by the tracker until
    // the next source starts.
    let mut tracker = Tracker::new();

    loop {
        if !process_commands(&mut handler, &command_rx, &mut tracker, event_tx)? {
            return Ok(());
        }
        process_mpv_events(&mut handler, &mut tracker, event_tx)?;
    }
}

/// Drains and executes pending commands.
///
/// Returns `false` once the controlling [`MpvMedia`] has been dropped.
fn process_commands<E: From<MediaNotification>>(
    handler: &mut mpv::MpvHandler,
    command_rx: &Receiver<MediaCommand>,
    tracker: &mut Tracker,
    event_tx: &Sender<E>,
) -> Result<bool> {
    loop {
        let command = match command_rx.try_recv() {
            Ok(command) => command,
            Err(mpsc::TryRecvError::Empty) => return Ok(true),
            Err(mpsc::TryRecvError::Disconnected) => return Ok(false),
        };

        let result = match command {
            MediaCommand::Load(load, audio) => {
                debug!(load = %load, "Loading media source");
                match load_source(handler, &audio) {
                    Ok(spool) => {
                        tracker.issued(load, spool);
                        Ok(())
                    }
                    Err(e) => {
                        // MPV is still on the previous source.
                        warn!(load = %load, error = ?e, "Failed to load media source");
                        notify(event_tx, load, MediaEvent::Failed(format!("{e:#}")))?;
                        continue;
                    }
                }
            }
            MediaCommand::Play => handler.set_property("pause", false),
            MediaCommand::Pause => handler.set_property("pause", true),
            MediaCommand::Seek(seconds) => handler.command(&["seek", &seconds.to_string(), "absolute"]),
        };

        if let Err(e) = result {
            let load = tracker.latest();
            warn!(load = %load, error = ?e, "Media command failed");
            notify(event_tx, load, MediaEvent::Failed(format!("{e:?}")))?;
        }
    }
}

fn load_source(handler: &mut mpv::MpvHandler, audio: &AudioRef) -> Result<Option<NamedTempFile>> {
    let (target, spool) = resolve(audio)?;
    handler.set_property("pause", true)?;
    handler
        .command(&["loadfile", &target, "replace"])
        .context(format!("Failed to load {target}"))?;
    Ok(spool)
}

/// Turns a song's audio reference into something MPV can open.
fn resolve(audio: &AudioRef) -> Result<(String, Option<NamedTempFile>)> {
    match audio {
        AudioRef::Url(url) => Ok((url.clone(), None)),
        AudioRef::File(path) => Ok((path.to_string_lossy().into_owned(), None)),
        AudioRef::Inline(data) => {
            let (mime, bytes) = audio::decode_data_url(data)?;
            let suffix = format!(".{}", mime.rsplit('/').next().unwrap_or("bin"));

            let mut spool = tempfile::Builder::new()
                .prefix("tunedeck-")
                .suffix(&suffix)
                .tempfile()
                .context("Failed to create audio spool file")?;
            spool.write_all(&bytes).context("Failed to write audio spool file")?;
            spool.flush()?;

            Ok((spool.path().to_string_lossy().into_owned(), Some(spool)))
        }
    }
}

/// Forwards every queued MPV event, waiting up to 50ms for the first one.
fn process_mpv_events<E: From<MediaNotification>>(
    handler: &mut mpv::MpvHandler,
    tracker: &mut Tracker,
    event_tx: &Sender<E>,
) -> Result<()> {
    let mut timeout = 0.05;

    while let Some(mpv_event) = handler.wait_event(timeout) {
        timeout = 0.0;

        if let mpv::Event::StartFile = mpv_event {
            if let Some(load) = tracker.started() {
                debug!(load = %load, "Media source started");
            }
            continue;
        }

        if let Some(event) = translate(mpv_event) {
            // Until the replacement starts this is still the old source speaking.
            notify(event_tx, tracker.current(), event)?;
        }
    }

    Ok(())
}

fn translate(mpv_event: mpv::Event) -> Option<MediaEvent> {
    match mpv_event {
        mpv::Event::PropertyChange { name, change, .. } => match (name, change) {
            ("duration", Format::Double(duration)) if duration > 0.0 => Some(MediaEvent::MetadataReady { duration }),
            ("pause", Format::Flag(true)) => Some(MediaEvent::Paused),
            ("pause", Format::Flag(false)) => Some(MediaEvent::Started),
            ("time-pos", Format::Double(seconds)) if seconds >= 0.0 => Some(MediaEvent::TimeChanged(seconds)),
            _ => None,
        },
        mpv::Event::EndFile(result) => match result {
            Ok(mpv::EndFileReason::MPV_END_FILE_REASON_EOF) => Some(MediaEvent::Ended),
            Ok(mpv::EndFileReason::MPV_END_FILE_REASON_ERROR) => {
                Some(MediaEvent::Failed("unable to play audio source".to_string()))
            }
            Ok(_) => None,
            Err(e) => Some(MediaEvent::Failed(format!("{e:?}"))),
        },
        _ => None,
    }
}

fn notify<E: From<MediaNotification>>(event_tx: &Sender<E>, load: LoadId, event: MediaEvent) -> Result<()> {
    event_tx
        .send(E::from(MediaNotification::new(load, event)))
        .context("Failed to send media notification")
}
