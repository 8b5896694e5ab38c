//! Playback: session state, the orchestrator, and the audio engine.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Orchestrator (UI thread)                    │
//! │   Owns PlaybackState, applies intents and end-of-track rules    │
//! └────────────────────────────┬────────────────────────────────────┘
//!                              │ MediaPrimitive trait
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  AudioEngine (decoder thread)                   │
//! │     Fetches media, decodes, converts rate, reports progress     │
//! └────────────────────────────┬────────────────────────────────────┘
//!                              │ cpal callback
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          Audio device                           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

mod decoder;
mod engine;
mod media;
mod orchestrator;
mod resampler;
mod source;
mod state;

pub use engine::{AudioEngine, EngineConfig};
pub use media::{MediaEvent, MediaPrimitive, Unavailable};
pub use orchestrator::Orchestrator;
pub use source::local_path;
pub use state::{PlaybackRate, PlaybackState, RepeatMode, format_time};

/// List available audio output devices.
pub fn list_audio_devices() -> Vec<String> {
    use cpal::traits::{DeviceTrait, HostTrait};
    let host = cpal::default_host();
    host.output_devices()
        .map(|devices| devices.filter_map(|d| d.name().ok()).collect())
        .unwrap_or_default()
}

/// Get the default audio device name.
pub fn default_audio_device() -> Option<String> {
    use cpal::traits::{DeviceTrait, HostTrait};
    cpal::default_host()
        .default_output_device()
        .and_then(|d| d.name().ok())
}

/// Player errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlayerError {
    #[error("Audio output initialization failed: {0}")]
    AudioInit(String),

    #[error("Failed to fetch media: {0}")]
    Fetch(String),

    #[error("Failed to decode audio: {0}")]
    Decode(String),

    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("No media loaded")]
    NoMedia,

    #[error("Audio channel closed")]
    ChannelClosed,

    #[error("Track {index} out of range (catalog has {len})")]
    TrackOutOfRange { index: usize, len: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_error_messages() {
        assert_eq!(PlayerError::ChannelClosed.to_string(), "Audio channel closed");
        assert_eq!(
            PlayerError::TrackOutOfRange { index: 5, len: 3 }.to_string(),
            "Track 5 out of range (catalog has 3)"
        );
    }

    #[test]
    fn test_unavailable_is_never_ready() {
        let orch = Orchestrator::new(crate::catalog::Catalog::builtin(), Unavailable);
        assert!(!orch.state().is_playing);
        assert_eq!(orch.state().current_track_index, 0);
    }

    #[test]
    fn test_unavailable_ignores_transport() {
        let mut orch = Orchestrator::new(crate::catalog::Catalog::builtin(), Unavailable);
        orch.toggle_play_pause().unwrap();
        orch.seek(30.0).unwrap();
        assert!(!orch.state().is_playing);
        assert_eq!(orch.state().current_time_seconds, 0.0);
    }
}
