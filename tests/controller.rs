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

//! Playback scenarios for the player controller, driven through a media
//! double that records every command it receives.

use std::sync::mpsc::Receiver;

use tunedeck::{
    AudioRef, Error, PlaybackStatus, PlayerState, Song, SongId,
    media::{LoadId, MediaEvent, MediaNotification, MediaPrimitive},
    player::{PlayerController, PlayerEvent},
};

#[derive(Clone, Debug, PartialEq)]
enum Call {
    Load(AudioRef),
    Play,
    Pause,
    Seek(f64),
}

#[derive(Default)]
struct RecordingMedia {
    calls: Vec<Call>,
    loads: u64,
    refuse_play: bool,
}

impl RecordingMedia {
    fn last_load(&self) -> LoadId {
        LoadId(self.loads)
    }

    fn loaded(&self) -> Vec<&AudioRef> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Load(audio) => Some(audio),
                _ => None,
            })
            .collect()
    }
}

impl MediaPrimitive for RecordingMedia {
    fn load(&mut self, audio: &AudioRef) -> tunedeck::Result<LoadId> {
        self.calls.push(Call::Load(audio.clone()));
        self.loads += 1;
        Ok(LoadId(self.loads))
    }

    fn play(&mut self) -> tunedeck::Result<()> {
        if self.refuse_play {
            return Err(Error::Playback("decoder rejected source".to_string()));
        }
        self.calls.push(Call::Play);
        Ok(())
    }

    fn pause(&mut self) -> tunedeck::Result<()> {
        self.calls.push(Call::Pause);
        Ok(())
    }

    fn seek(&mut self, seconds: f64) -> tunedeck::Result<()> {
        self.calls.push(Call::Seek(seconds));
        Ok(())
    }
}

fn song(id: u64, title: &str, duration: u32) -> Song {
    Song {
        id: SongId(id),
        title: title.to_string(),
        artist: "Artist".to_string(),
        duration,
        audio: AudioRef::parse(&format!("https://cdn.example.com/{title}.mp3")),
    }
}

fn playlist(count: u64) -> Vec<Song> {
    (1..=count).map(|id| song(id, &format!("song{id}"), 30)).collect()
}

fn controller(songs: Vec<Song>) -> PlayerController<RecordingMedia> {
    let mut controller = PlayerController::with_seed(RecordingMedia::default(), 42);
    controller.sync_playlist(songs).unwrap();
    controller
}

fn current(controller: &PlayerController<RecordingMedia>) -> Option<SongId> {
    controller.state().current_song_id
}

fn drain(events: &Receiver<PlayerEvent>) -> Vec<PlayerEvent> {
    events.try_iter().collect()
}

fn notify(controller: &mut PlayerController<RecordingMedia>, event: MediaEvent) -> tunedeck::Result<()> {
    let load = controller.media().last_load();
    controller.handle_media(MediaNotification::new(load, event))
}

// =============================================================================
// Navigation
// =============================================================================

mod navigation {
    use super::*;

    #[test]
    fn test_next_loads_following_song_and_wraps() {
        let a = song(1, "A", 30);
        let b = song(2, "B", 45);
        let mut controller = controller(vec![a.clone(), b.clone()]);

        controller.select_song(a.id).unwrap();
        assert_eq!(controller.status(), PlaybackStatus::Playing);

        controller.next().unwrap();
        assert_eq!(current(&controller), Some(b.id));
        assert_eq!(controller.media().loaded().last(), Some(&&b.audio));
        assert_eq!(controller.media().calls.last(), Some(&Call::Play));
        assert_eq!(controller.status(), PlaybackStatus::Playing);

        controller.next().unwrap();
        assert_eq!(current(&controller), Some(a.id));
    }

    #[test]
    fn test_previous_wraps_to_last_song() {
        let mut controller = controller(playlist(3));

        controller.select_song(SongId(1)).unwrap();
        controller.previous().unwrap();

        assert_eq!(current(&controller), Some(SongId(3)));
    }

    #[test]
    fn test_empty_playlist_navigation_fails_and_stays_idle() {
        let mut controller = controller(vec![]);

        assert!(matches!(controller.next(), Err(Error::EmptyPlaylist)));
        assert!(matches!(controller.previous(), Err(Error::EmptyPlaylist)));
        assert!(matches!(controller.shuffle(), Err(Error::NotEnoughSongs)));
        assert_eq!(controller.status(), PlaybackStatus::Idle);
        assert!(controller.media().calls.is_empty());
    }

    #[test]
    fn test_shuffle_needs_two_songs() {
        let mut controller = controller(playlist(1));
        controller.select_song(SongId(1)).unwrap();

        assert!(matches!(controller.shuffle(), Err(Error::NotEnoughSongs)));
        assert_eq!(current(&controller), Some(SongId(1)));
    }

    #[test]
    fn test_shuffle_with_two_songs_always_switches() {
        let mut controller = controller(playlist(2));
        controller.select_song(SongId(1)).unwrap();

        for _ in 0..20 {
            let before = current(&controller);
            controller.shuffle().unwrap();
            assert_ne!(current(&controller), before);
        }
    }

    #[test]
    fn test_selecting_unknown_song_changes_nothing() {
        let mut controller = controller(playlist(2));
        controller.select_song(SongId(2)).unwrap();
        let before = controller.state();

        assert!(matches!(controller.select_song(SongId(77)), Err(Error::NotFound(SongId(77)))));
        assert_eq!(controller.state(), before);
    }
}

// =============================================================================
// Play And Pause
// =============================================================================

mod play_pause {
    use super::*;

    #[test]
    fn test_play_with_empty_playlist_reports_nothing_selected() {
        let mut controller = controller(vec![]);
        let events = controller.subscribe();

        let result = controller.play();

        assert!(matches!(result, Err(Error::NothingSelected)));
        assert_eq!(controller.state(), PlayerState::default());
        assert_eq!(drain(&events), vec![PlayerEvent::Error("Nothing selected".to_string())]);
    }

    #[test]
    fn test_play_from_idle_starts_first_song() {
        let mut controller = controller(playlist(3));

        controller.play().unwrap();

        assert_eq!(current(&controller), Some(SongId(1)));
        assert_eq!(controller.status(), PlaybackStatus::Playing);
    }

    #[test]
    fn test_toggle_pauses_and_resumes_without_reloading() {
        let mut controller = controller(playlist(2));
        controller.play().unwrap();

        controller.toggle_play().unwrap();
        assert_eq!(controller.status(), PlaybackStatus::Loaded);

        controller.toggle_play().unwrap();
        assert_eq!(controller.status(), PlaybackStatus::Playing);

        assert_eq!(controller.media().loaded().len(), 1);
        assert_eq!(
            controller.media().calls[1..],
            [Call::Play, Call::Pause, Call::Play]
        );
    }

    #[test]
    fn test_pause_is_noop_unless_playing() {
        let mut controller = controller(playlist(1));

        controller.pause().unwrap();

        assert_eq!(controller.status(), PlaybackStatus::Idle);
        assert!(controller.media().calls.is_empty());
    }

    #[test]
    fn test_refused_playback_leaves_song_loaded() {
        let mut controller = PlayerController::with_seed(
            RecordingMedia {
                refuse_play: true,
                ..RecordingMedia::default()
            },
            1,
        );
        controller.sync_playlist(playlist(2)).unwrap();
        let events = controller.subscribe();

        let result = controller.select_song(SongId(2));

        assert!(matches!(result, Err(Error::Playback(_))));
        assert_eq!(controller.status(), PlaybackStatus::Loaded);
        assert_eq!(current(&controller), Some(SongId(2)));
        assert!(drain(&events).iter().any(|e| matches!(e, PlayerEvent::Error(_))));
    }

    #[test]
    fn test_media_pause_notification_updates_state() {
        let mut controller = controller(playlist(1));
        controller.play().unwrap();

        notify(&mut controller, MediaEvent::Paused).unwrap();
        assert_eq!(controller.status(), PlaybackStatus::Loaded);

        notify(&mut controller, MediaEvent::Started).unwrap();
        assert_eq!(controller.status(), PlaybackStatus::Playing);
    }

    #[test]
    fn test_media_failure_reverts_to_loaded() {
        let mut controller = controller(playlist(1));
        controller.play().unwrap();

        let result = notify(&mut controller, MediaEvent::Failed("bad stream".to_string()));

        assert!(matches!(result, Err(Error::Playback(_))));
        assert_eq!(controller.status(), PlaybackStatus::Loaded);
    }
}

// =============================================================================
// Media Notifications
// =============================================================================

mod media_notifications {
    use super::*;

    #[test]
    fn test_end_of_track_advances_with_wraparound() {
        let mut controller = controller(playlist(2));
        controller.select_song(SongId(2)).unwrap();

        notify(&mut controller, MediaEvent::Ended).unwrap();

        assert_eq!(current(&controller), Some(SongId(1)));
        assert_eq!(controller.status(), PlaybackStatus::Playing);
    }

    #[test]
    fn test_stale_notifications_are_discarded() {
        let mut controller = controller(playlist(3));
        controller.select_song(SongId(1)).unwrap();
        let stale = controller.media().last_load();
        controller.select_song(SongId(3)).unwrap();

        controller
            .handle_media(MediaNotification::new(stale, MediaEvent::Ended))
            .unwrap();
        controller
            .handle_media(MediaNotification::new(stale, MediaEvent::MetadataReady { duration: 99.0 }))
            .unwrap();

        assert_eq!(current(&controller), Some(SongId(3)));
        assert_eq!(controller.progress().duration, None);
    }

    #[test]
    fn test_progress_tracks_media_duration() {
        let mut controller = controller(vec![song(1, "A", 30)]);
        let events = controller.subscribe();
        controller.play().unwrap();

        notify(&mut controller, MediaEvent::MetadataReady { duration: 200.0 }).unwrap();
        notify(&mut controller, MediaEvent::TimeChanged(50.0)).unwrap();

        let progress = controller.progress();
        assert_eq!(progress.percent(), 25.0);
        assert_eq!(progress.elapsed_label(), "0:50");
        assert_eq!(progress.total_label(), "3:20");
        assert!(drain(&events).contains(&PlayerEvent::Progress(progress)));
    }

    #[test]
    fn test_progress_is_zero_before_metadata() {
        let mut controller = controller(playlist(1));
        controller.play().unwrap();

        notify(&mut controller, MediaEvent::TimeChanged(12.0)).unwrap();

        assert_eq!(controller.progress().percent(), 0.0);
    }

    #[test]
    fn test_seek_uses_media_duration() {
        let mut controller = controller(playlist(1));
        controller.play().unwrap();
        notify(&mut controller, MediaEvent::MetadataReady { duration: 180.0 }).unwrap();

        controller.seek(50.0).unwrap();

        assert_eq!(controller.media().calls.last(), Some(&Call::Seek(90.0)));
        assert_eq!(controller.progress().position, 90.0);
        assert!(matches!(controller.seek(150.0), Err(Error::Validation(_))));
    }

    #[test]
    fn test_switching_song_resets_progress() {
        let mut controller = controller(playlist(2));
        controller.play().unwrap();
        notify(&mut controller, MediaEvent::MetadataReady { duration: 180.0 }).unwrap();
        notify(&mut controller, MediaEvent::TimeChanged(60.0)).unwrap();

        controller.next().unwrap();

        assert_eq!(controller.progress().position, 0.0);
        assert_eq!(controller.progress().duration, None);
    }
}

// =============================================================================
// Playlist Changes
// =============================================================================

mod playlist_changes {
    use super::*;

    fn without(songs: &[Song], id: u64) -> Vec<Song> {
        songs.iter().filter(|s| s.id != SongId(id)).cloned().collect()
    }

    #[test]
    fn test_removing_only_song_goes_idle() {
        let mut controller = controller(playlist(1));
        controller.play().unwrap();

        controller.sync_playlist(vec![]).unwrap();

        assert_eq!(controller.state(), PlayerState::default());
        assert_eq!(controller.media().calls.last(), Some(&Call::Pause));
    }

    #[test]
    fn test_removing_other_song_keeps_selection() {
        let songs = playlist(3);
        let mut controller = controller(songs.clone());
        controller.select_song(SongId(2)).unwrap();
        let loads = controller.media().loaded().len();

        controller.sync_playlist(without(&songs, 3)).unwrap();

        assert_eq!(current(&controller), Some(SongId(2)));
        assert_eq!(controller.status(), PlaybackStatus::Playing);
        assert_eq!(controller.media().loaded().len(), loads);
    }

    #[test]
    fn test_removing_current_song_plays_song_at_same_index() {
        let songs = playlist(3);
        let mut controller = controller(songs.clone());
        controller.select_song(SongId(2)).unwrap();

        controller.sync_playlist(without(&songs, 2)).unwrap();

        assert_eq!(current(&controller), Some(SongId(3)));
        assert_eq!(controller.status(), PlaybackStatus::Playing);
        assert_eq!(controller.media().loaded().last(), Some(&&songs[2].audio));
    }

    #[test]
    fn test_removing_last_current_song_selects_new_last() {
        let songs = playlist(3);
        let mut controller = controller(songs.clone());
        controller.select_song(SongId(3)).unwrap();
        controller.pause().unwrap();

        controller.sync_playlist(without(&songs, 3)).unwrap();

        assert_eq!(current(&controller), Some(SongId(2)));
        assert_eq!(controller.status(), PlaybackStatus::Loaded);
    }

    #[test]
    fn test_restore_selection_does_not_play() {
        let mut controller = controller(playlist(3));

        controller.restore_selection(SongId(2)).unwrap();

        assert_eq!(current(&controller), Some(SongId(2)));
        assert_eq!(controller.status(), PlaybackStatus::Loaded);
        assert!(controller.media().calls.is_empty());

        controller.play().unwrap();
        assert_eq!(controller.media().loaded(), vec![&AudioRef::parse("https://cdn.example.com/song2.mp3")]);
    }
}

// =============================================================================
// Subscribers
// =============================================================================

mod subscribers {
    use super::*;

    #[test]
    fn test_selection_publishes_state_and_now_playing() {
        let mut controller = controller(playlist(2));
        let events = controller.subscribe();

        controller.select_song(SongId(2)).unwrap();

        let selected = PlayerState {
            current_song_id: Some(SongId(2)),
            is_playing: false,
        };
        assert_eq!(
            drain(&events),
            vec![
                PlayerEvent::StateChanged(selected),
                PlayerEvent::NowPlaying(playlist(2)[1].clone()),
                PlayerEvent::StateChanged(PlayerState {
                    is_playing: true,
                    ..selected
                }),
            ]
        );
    }

    #[test]
    fn test_every_subscriber_sees_errors() {
        let mut controller = controller(vec![]);
        let first = controller.subscribe();
        let second = controller.subscribe();

        let _ = controller.next();

        let expected = vec![PlayerEvent::Error("Playlist is empty".to_string())];
        assert_eq!(drain(&first), expected);
        assert_eq!(drain(&second), expected);
    }
}
