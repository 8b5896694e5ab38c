//! Test utilities and fixtures for music-deck tests.
//!
//! This module provides a recording media primitive, mock catalogs, and
//! orchestrator factories to reduce boilerplate in tests.
//!
//! # Example
//!
//! ```ignore
//! use music_deck::test_utils::{orchestrator_with, MediaCall};
//!
//! #[test]
//! fn test_something() {
//!     let mut orch = orchestrator_with(3);
//!     orch.next().unwrap();
//!     assert_eq!(orch.media_mut().take_calls(), vec![MediaCall::Load("track-1.mp3".into())]);
//! }
//! ```

use std::collections::VecDeque;
use std::sync::Arc;

use crate::catalog::{Catalog, Track};
use crate::player::{MediaEvent, MediaPrimitive, Orchestrator, PlayerError};

/// A command received by [`RecordingMedia`].
#[derive(Debug, Clone, PartialEq)]
pub enum MediaCall {
    Load(String),
    Play,
    Pause,
    Seek(f64),
    Volume(f32),
    Muted(bool),
    Rate(f32),
}

/// Media primitive double that records every command it receives.
///
/// Events pushed with [`push_event`](Self::push_event) are handed out on
/// the next drain. Setting `fail_next` makes the next command fail with
/// that error (the command is still recorded).
#[derive(Debug)]
pub struct RecordingMedia {
    pub ready: bool,
    pub calls: Vec<MediaCall>,
    pub fail_next: Option<PlayerError>,
    events: VecDeque<MediaEvent>,
}

impl RecordingMedia {
    pub fn new() -> Self {
        Self {
            ready: true,
            calls: Vec::new(),
            fail_next: None,
            events: VecDeque::new(),
        }
    }

    pub fn push_event(&mut self, event: MediaEvent) {
        self.events.push_back(event);
    }

    /// Return and clear the recorded calls.
    pub fn take_calls(&mut self) -> Vec<MediaCall> {
        std::mem::take(&mut self.calls)
    }

    fn record(&mut self, call: MediaCall) -> Result<(), PlayerError> {
        self.calls.push(call);
        match self.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl MediaPrimitive for RecordingMedia {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn load(&mut self, url: &str) -> Result<(), PlayerError> {
        self.record(MediaCall::Load(url.to_string()))
    }

    fn play(&mut self) -> Result<(), PlayerError> {
        self.record(MediaCall::Play)
    }

    fn pause(&mut self) -> Result<(), PlayerError> {
        self.record(MediaCall::Pause)
    }

    fn seek(&mut self, seconds: f64) -> Result<(), PlayerError> {
        self.record(MediaCall::Seek(seconds))
    }

    fn set_volume(&mut self, volume: f32) -> Result<(), PlayerError> {
        self.record(MediaCall::Volume(volume))
    }

    fn set_muted(&mut self, muted: bool) -> Result<(), PlayerError> {
        self.record(MediaCall::Muted(muted))
    }

    fn set_playback_rate(&mut self, rate: f32) -> Result<(), PlayerError> {
        self.record(MediaCall::Rate(rate))
    }

    fn drain_events(&mut self) -> Vec<MediaEvent> {
        self.events.drain(..).collect()
    }
}

/// Creates a mock Track with the given catalog index.
///
/// Ids start at 1, media URLs are `track-{index}.mp3`.
pub fn mock_track(index: usize) -> Track {
    Track {
        id: index as u32 + 1,
        title: format!("Track {}", index + 1),
        artist: "Test Artist".to_string(),
        duration_label: "3:00".to_string(),
        media_url: format!("track-{}.mp3", index),
        cover_art_url: format!("cover-{}.jpg", index),
    }
}

/// Creates a catalog of `len` mock tracks.
pub fn catalog_of(len: usize) -> Catalog {
    Catalog::new((0..len).map(mock_track).collect()).expect("mock catalog is valid")
}

/// Creates an orchestrator over `len` mock tracks with the startup calls
/// already cleared from the recorder.
pub fn orchestrator_with(len: usize) -> Orchestrator<RecordingMedia> {
    let mut orch = Orchestrator::new(catalog_of(len), RecordingMedia::new());
    orch.media_mut().take_calls();
    orch
}

/// 16-bit PCM WAV with `frames` stereo frames of silence.
pub fn wav_bytes(sample_rate: u32, frames: u32) -> Arc<[u8]> {
    let channels = 2u16;
    let block_align = channels * 2;
    let data_len = frames * block_align as u32;
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
    bytes.extend_from_slice(b"WAVEfmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&channels.to_le_bytes());
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&(sample_rate * block_align as u32).to_le_bytes());
    bytes.extend_from_slice(&block_align.to_le_bytes());
    bytes.extend_from_slice(&16u16.to_le_bytes());
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    bytes.resize(bytes.len() + data_len as usize, 0);
    Arc::from(bytes)
}

/// Writes [`wav_bytes`] to a temporary `.wav` file.
pub fn wav_file(sample_rate: u32, frames: u32) -> tempfile::NamedTempFile {
    let file = tempfile::Builder::new()
        .suffix(".wav")
        .tempfile()
        .expect("temp file");
    std::fs::write(file.path(), wav_bytes(sample_rate, frames)).expect("write wav");
    file
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_track_defaults() {
        let track = mock_track(0);
        assert_eq!(track.id, 1);
        assert_eq!(track.media_url, "track-0.mp3");
        assert_eq!(track.title, "Track 1");
    }

    #[test]
    fn test_recording_media_fails_once() {
        let mut media = RecordingMedia::new();
        media.fail_next = Some(PlayerError::ChannelClosed);
        assert!(media.play().is_err());
        assert!(media.play().is_ok());
        assert_eq!(media.take_calls(), vec![MediaCall::Play, MediaCall::Play]);
    }

    #[test]
    fn test_orchestrator_with_clears_startup_calls() {
        let mut orch = orchestrator_with(2);
        assert!(orch.media_mut().take_calls().is_empty());
    }
}
