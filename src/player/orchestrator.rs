//! Playback orchestration: the rules that tie the player state to the
//! media primitive.
//!
//! The [`Orchestrator`] is the only owner of [`PlaybackState`] and the only
//! component allowed to command the media primitive. Every UI intent and
//! every primitive event is applied here, one at a time.
//!
//! # End of track
//!
//! When the primitive reports the end of a track the rules are checked in
//! order, first match wins:
//!
//! | repeat | shuffle | position    | result                         |
//! |--------|---------|-------------|--------------------------------|
//! | One    | any     | any         | restart the same track         |
//! | All    | any     | any         | advance (random if shuffling)  |
//! | Off    | on      | any         | advance to a random other track|
//! | Off    | off     | not last    | advance to the next track      |
//! | Off    | off     | last        | stop, rewind, keep the index   |

use rand::Rng;

use crate::catalog::{Catalog, Track};

use super::PlayerError;
use super::media::{MediaEvent, MediaPrimitive};
use super::state::{PlaybackRate, PlaybackState, RepeatMode};

/// Ticks within this distance of a seek target confirm the seek.
const SEEK_SETTLE_TOLERANCE: f64 = 0.5;

/// Stale ticks ignored before a seek guard gives up.
const MAX_STALE_TICKS: u32 = 8;

/// A seek the primitive has not confirmed yet.
#[derive(Debug, Clone, Copy)]
struct PendingSeek {
    target: f64,
    stale_ticks: u32,
}

/// Owns the playback state and drives the media primitive.
#[derive(Debug)]
pub struct Orchestrator<M> {
    catalog: Catalog,
    state: PlaybackState,
    media: M,
    /// Duration reported by the primitive for the current track
    media_duration: Option<f64>,
    pending_seek: Option<PendingSeek>,
    /// First failure while setting up the session, until someone reports it
    startup_fault: Option<PlayerError>,
}

impl<M: MediaPrimitive> Orchestrator<M> {
    /// Start a session with default state on the first catalog track.
    ///
    /// The first track is loaded (but not played) and the audio properties
    /// are pushed to the primitive once.
    pub fn new(catalog: Catalog, media: M) -> Self {
        let mut orchestrator = Self {
            catalog,
            state: PlaybackState::default(),
            media,
            media_duration: None,
            pending_seek: None,
            startup_fault: None,
        };

        let sync = orchestrator.sync_primitive_audio_properties();
        if let Err(e) = &sync {
            tracing::error!(target: "player::orchestrator", "Initial audio sync failed: {}", e);
        }
        let load = orchestrator.change_track(0);
        if let Err(e) = &load {
            tracing::error!(target: "player::orchestrator", "Initial track load failed: {}", e);
        }
        orchestrator.startup_fault = sync.and(load).err();

        orchestrator
    }

    /// Take the error, if any, from syncing and loading the first track.
    pub fn take_startup_fault(&mut self) -> Option<PlayerError> {
        self.startup_fault.take()
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The track at the current index.
    pub fn current_track(&self) -> Option<&Track> {
        self.catalog.get(self.state.current_track_index)
    }

    /// Track length reported by the primitive, if it has reported one.
    pub fn media_duration(&self) -> Option<f64> {
        self.media_duration
    }

    #[cfg(test)]
    pub(crate) fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    // ------------------------------------------------------------------
    // User intents
    // ------------------------------------------------------------------

    /// Pause if playing, play otherwise. Ignored until the primitive is ready.
    pub fn toggle_play_pause(&mut self) -> Result<(), PlayerError> {
        if !self.media.is_ready() {
            tracing::debug!(target: "player::orchestrator", "Media not ready, ignoring play/pause");
            return Ok(());
        }

        if self.state.is_playing {
            self.state.is_playing = false;
            self.media.pause()
        } else {
            self.state.is_playing = true;
            self.media.play()
        }
    }

    /// Step back one track, wrapping to the end of the catalog.
    pub fn previous(&mut self) -> Result<(), PlayerError> {
        let len = self.catalog.len();
        let index = (self.state.current_track_index + len - 1) % len;
        self.change_track(index)
    }

    /// Step forward using the next-index rule.
    pub fn next(&mut self) -> Result<(), PlayerError> {
        let index = self.next_index();
        self.change_track(index)
    }

    /// Jump to a position in the current track.
    ///
    /// The displayed time moves immediately; ticks from the primitive that
    /// still report the old position are held back until it catches up.
    pub fn seek(&mut self, target_seconds: f64) -> Result<(), PlayerError> {
        if !self.media.is_ready() {
            tracing::debug!(target: "player::orchestrator", "Media not ready, ignoring seek");
            return Ok(());
        }

        let mut target = if target_seconds.is_finite() {
            target_seconds.max(0.0)
        } else {
            0.0
        };
        if let Some(duration) = self.media_duration {
            target = target.min(duration);
        }

        self.seek_media(target)
    }

    /// Store a clamped volume and resync the audio properties.
    pub fn set_volume(&mut self, volume: f32) -> Result<(), PlayerError> {
        self.state.volume = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, 1.0)
        };
        self.sync_primitive_audio_properties()
    }

    pub fn toggle_mute(&mut self) -> Result<(), PlayerError> {
        self.state.is_muted = !self.state.is_muted;
        self.sync_primitive_audio_properties()
    }

    pub fn set_playback_rate(&mut self, rate: PlaybackRate) -> Result<(), PlayerError> {
        self.state.playback_rate = rate;
        self.sync_primitive_audio_properties()
    }

    pub fn toggle_shuffle(&mut self) {
        self.state.shuffle_enabled = !self.state.shuffle_enabled;
    }

    pub fn toggle_repeat_mode(&mut self) {
        self.state.repeat_mode = self.state.repeat_mode.cycled();
    }

    pub fn toggle_fullscreen(&mut self) {
        self.state.is_fullscreen = !self.state.is_fullscreen;
    }

    /// Play a track picked from the playlist.
    ///
    /// Always starts playback from the beginning, whatever the prior state.
    pub fn select_track(&mut self, index: usize) -> Result<(), PlayerError> {
        let len = self.catalog.len();
        if index >= len {
            return Err(PlayerError::TrackOutOfRange { index, len });
        }

        self.state.is_playing = true;
        self.change_track(index)
    }

    // ------------------------------------------------------------------
    // Primitive events
    // ------------------------------------------------------------------

    /// Apply every event the primitive has queued since the last call.
    ///
    /// All events are applied even if one of them fails; the first failure
    /// is returned.
    pub fn pump_events(&mut self) -> Result<(), PlayerError> {
        let mut result = Ok(());
        for event in self.media.drain_events() {
            let outcome = match event {
                MediaEvent::TimeUpdate(seconds) => {
                    self.on_time_tick(seconds);
                    Ok(())
                }
                MediaEvent::Ended => self.on_track_ended(),
                MediaEvent::Loaded { duration_seconds } => {
                    tracing::debug!(
                        target: "player::orchestrator",
                        "Media duration {:.1}s",
                        duration_seconds
                    );
                    self.media_duration = Some(duration_seconds);
                    Ok(())
                }
                MediaEvent::Failed(e) => {
                    tracing::warn!(target: "player::orchestrator", "Media failure: {}", e);
                    Err(e)
                }
            };
            if result.is_ok() {
                result = outcome;
            }
        }
        result
    }

    /// Progress report from the primitive.
    pub fn on_time_tick(&mut self, observed_seconds: f64) {
        if let Some(pending) = self.pending_seek.as_mut() {
            if (observed_seconds - pending.target).abs() <= SEEK_SETTLE_TOLERANCE {
                self.pending_seek = None;
            } else if pending.stale_ticks < MAX_STALE_TICKS {
                pending.stale_ticks += 1;
                tracing::trace!(
                    target: "player::orchestrator",
                    "Ignoring tick at {:.2}s while seeking to {:.2}s",
                    observed_seconds,
                    pending.target
                );
                return;
            } else {
                tracing::debug!(
                    target: "player::orchestrator",
                    "Seek to {:.2}s never confirmed, accepting {:.2}s",
                    pending.target,
                    observed_seconds
                );
                self.pending_seek = None;
            }
        }

        if observed_seconds.is_finite() {
            self.state.current_time_seconds = observed_seconds.max(0.0);
        }
    }

    /// The current track finished playing.
    pub fn on_track_ended(&mut self) -> Result<(), PlayerError> {
        let index = self.state.current_track_index;
        let last = self.catalog.len() - 1;

        if self.state.repeat_mode == RepeatMode::One {
            tracing::debug!(target: "player::orchestrator", index, "Track ended, repeating");
            self.state.is_playing = true;
            let seek = self.seek_media(0.0);
            let play = self.media.play();
            seek.and(play)
        } else if self.state.repeat_mode == RepeatMode::All || self.state.shuffle_enabled {
            self.state.is_playing = true;
            let next = self.next_index();
            self.change_track(next)
        } else if index < last {
            self.state.is_playing = true;
            self.change_track(index + 1)
        } else {
            tracing::info!(target: "player::orchestrator", "End of playlist");
            self.state.is_playing = false;
            self.state.current_time_seconds = 0.0;
            self.pending_seek = None;
            Ok(())
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Pick the index `next` and end-of-track advancement move to.
    pub fn next_index(&self) -> usize {
        self.next_index_with(&mut rand::rng())
    }

    /// Next-index rule with an explicit random source.
    ///
    /// Shuffle picks uniformly among every index except the current one; a
    /// single-track catalog keeps its only index. Otherwise the index after
    /// the current one, wrapping around.
    pub fn next_index_with<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let len = self.catalog.len();
        let current = self.state.current_track_index;

        if !self.state.shuffle_enabled {
            return (current + 1) % len;
        }
        if len < 2 {
            return current;
        }

        // Draw from the len - 1 other slots, skipping over the current one
        let pick = rng.random_range(0..len - 1);
        if pick >= current { pick + 1 } else { pick }
    }

    /// Push volume, mute and rate to the primitive as one group.
    ///
    /// The three properties are coupled on the primitive side, so any change
    /// to one of them re-applies all of them.
    pub fn sync_primitive_audio_properties(&mut self) -> Result<(), PlayerError> {
        let volume = self.media.set_volume(self.state.volume);
        let muted = self.media.set_muted(self.state.is_muted);
        let rate = self
            .media
            .set_playback_rate(self.state.playback_rate.factor());
        volume.and(muted).and(rate)
    }

    fn seek_media(&mut self, target: f64) -> Result<(), PlayerError> {
        self.state.current_time_seconds = target;
        self.pending_seek = Some(PendingSeek {
            target,
            stale_ticks: 0,
        });
        self.media.seek(target)
    }

    /// Move to `index`, rewind, and hand the new media to the primitive.
    fn change_track(&mut self, index: usize) -> Result<(), PlayerError> {
        let Some(track) = self.catalog.get(index) else {
            return Err(PlayerError::TrackOutOfRange {
                index,
                len: self.catalog.len(),
            });
        };
        let url = track.media_url.clone();
        tracing::info!(
            target: "player::orchestrator",
            "Track {}: {} - {}",
            index,
            track.artist,
            track.title
        );

        self.state.current_track_index = index;
        self.state.current_time_seconds = 0.0;
        self.pending_seek = None;
        self.media_duration = None;

        self.media.load(&url)?;
        if self.state.is_playing {
            self.media.play()?;
        }
        Ok(())
    }
}


/// Property-based tests for navigation
#[cfg(test)]
mod proptests {
    use super::*;
    use crate::test_utils::orchestrator_with;
    use proptest::prelude::*;

    proptest! {
        /// Sequential next moves one step forward and wraps
        #[test]
        fn next_is_successor(len in 2usize..20, start in 0usize..20) {
            let start = start % len;
            let mut orch = orchestrator_with(len);
            orch.select_track(start).unwrap();
            orch.next().unwrap();
            prop_assert_eq!(orch.state().current_track_index, (start + 1) % len);
        }

        /// N sequential skips return to the starting track
        #[test]
        fn next_cycles_through_catalog(len in 2usize..20, start in 0usize..20) {
            let start = start % len;
            let mut orch = orchestrator_with(len);
            orch.select_track(start).unwrap();
            for _ in 0..len {
                orch.next().unwrap();
            }
            prop_assert_eq!(orch.state().current_track_index, start);
        }

        /// previous undoes next without shuffle
        #[test]
        fn previous_inverts_next(len in 1usize..20, start in 0usize..20) {
            let start = start % len;
            let mut orch = orchestrator_with(len);
            orch.select_track(start).unwrap();
            orch.previous().unwrap();
            orch.next().unwrap();
            prop_assert_eq!(orch.state().current_track_index, start);
        }

        /// Stored volume always lands in range
        #[test]
        fn volume_is_clamped(volume in -10.0f32..10.0) {
            let mut orch = orchestrator_with(2);
            orch.set_volume(volume).unwrap();
            prop_assert!((0.0..=1.0).contains(&orch.state().volume));
        }

        /// Shuffle never picks the playing track
        #[test]
        fn shuffle_avoids_current(len in 2usize..20, start in 0usize..20, seed in any::<u64>()) {
            use rand::SeedableRng;
            let start = start % len;
            let mut orch = orchestrator_with(len);
            orch.select_track(start).unwrap();
            orch.toggle_shuffle();
            let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
            let next = orch.next_index_with(&mut rng);
            prop_assert_ne!(next, start);
            prop_assert!(next < len);
        }
    }
}
