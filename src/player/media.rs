//! The media primitive contract.
//!
//! The orchestrator only ever talks to audio output through this trait, so
//! the playback rules can run against the real [`AudioEngine`](super::AudioEngine)
//! or against a recording double in tests.

use super::PlayerError;

/// Notifications from the media primitive back to the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Periodic playback progress, in seconds from the start of the track
    TimeUpdate(f64),
    /// The current track played through to the end
    Ended,
    /// The loaded media reported its real duration
    Loaded { duration_seconds: f64 },
    /// The media could not be fetched, opened, or decoded
    Failed(PlayerError),
}

/// Audio playback capability commanded by the orchestrator.
///
/// Commands are fire-and-forget: an `Ok` means the command was accepted,
/// not that the audio has reached the requested state. Progress and
/// completion arrive later through [`drain_events`](Self::drain_events).
pub trait MediaPrimitive {
    /// Whether the primitive can accept transport commands yet.
    fn is_ready(&self) -> bool;

    fn load(&mut self, url: &str) -> Result<(), PlayerError>;
    fn play(&mut self) -> Result<(), PlayerError>;
    fn pause(&mut self) -> Result<(), PlayerError>;
    fn seek(&mut self, seconds: f64) -> Result<(), PlayerError>;

    fn set_volume(&mut self, volume: f32) -> Result<(), PlayerError>;
    fn set_muted(&mut self, muted: bool) -> Result<(), PlayerError>;
    fn set_playback_rate(&mut self, rate: f32) -> Result<(), PlayerError>;

    /// Take every event emitted since the last call, oldest first.
    fn drain_events(&mut self) -> Vec<MediaEvent>;
}

impl<M: MediaPrimitive + ?Sized> MediaPrimitive for Box<M> {
    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }

    fn load(&mut self, url: &str) -> Result<(), PlayerError> {
        (**self).load(url)
    }

    fn play(&mut self) -> Result<(), PlayerError> {
        (**self).play()
    }

    fn pause(&mut self) -> Result<(), PlayerError> {
        (**self).pause()
    }

    fn seek(&mut self, seconds: f64) -> Result<(), PlayerError> {
        (**self).seek(seconds)
    }

    fn set_volume(&mut self, volume: f32) -> Result<(), PlayerError> {
        (**self).set_volume(volume)
    }

    fn set_muted(&mut self, muted: bool) -> Result<(), PlayerError> {
        (**self).set_muted(muted)
    }

    fn set_playback_rate(&mut self, rate: f32) -> Result<(), PlayerError> {
        (**self).set_playback_rate(rate)
    }

    fn drain_events(&mut self) -> Vec<MediaEvent> {
        (**self).drain_events()
    }
}

/// Stand-in used when no audio output could be opened.
///
/// Never ready, so transport commands are skipped by the orchestrator;
/// everything else is accepted and dropped.
#[derive(Debug, Default)]
pub struct Unavailable;

impl MediaPrimitive for Unavailable {
    fn is_ready(&self) -> bool {
        false
    }

    fn load(&mut self, _url: &str) -> Result<(), PlayerError> {
        Ok(())
    }

    fn play(&mut self) -> Result<(), PlayerError> {
        Ok(())
    }

    fn pause(&mut self) -> Result<(), PlayerError> {
        Ok(())
    }

    fn seek(&mut self, _seconds: f64) -> Result<(), PlayerError> {
        Ok(())
    }

    fn set_volume(&mut self, _volume: f32) -> Result<(), PlayerError> {
        Ok(())
    }

    fn set_muted(&mut self, _muted: bool) -> Result<(), PlayerError> {
        Ok(())
    }

    fn set_playback_rate(&mut self, _rate: f32) -> Result<(), PlayerError> {
        Ok(())
    }

    fn drain_events(&mut self) -> Vec<MediaEvent> {
        Vec::new()
    }
}
