//! Playback state and command types.

use std::fmt;

/// Default volume for a fresh session.
pub const DEFAULT_VOLUME: f32 = 0.7;

/// Repeat mode for end-of-track handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatMode {
    /// Stop after the last track
    #[default]
    Off,
    /// Loop the current track
    One,
    /// Keep advancing through the catalog
    All,
}

impl RepeatMode {
    /// The mode that follows this one when the repeat button is pressed.
    ///
    /// Cycles `Off -> One -> All -> Off`.
    pub fn cycled(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::One,
            RepeatMode::One => RepeatMode::All,
            RepeatMode::All => RepeatMode::Off,
        }
    }

    pub fn is_active(self) -> bool {
        self != RepeatMode::Off
    }
}

/// One of the six playback speeds the rate selector offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackRate {
    Half,
    ThreeQuarters,
    #[default]
    Normal,
    OneAndQuarter,
    OneAndHalf,
    Double,
}

impl PlaybackRate {
    /// All rates in selector order.
    pub const ALL: [PlaybackRate; 6] = [
        PlaybackRate::Half,
        PlaybackRate::ThreeQuarters,
        PlaybackRate::Normal,
        PlaybackRate::OneAndQuarter,
        PlaybackRate::OneAndHalf,
        PlaybackRate::Double,
    ];

    /// Speed multiplier.
    pub fn factor(self) -> f32 {
        match self {
            PlaybackRate::Half => 0.5,
            PlaybackRate::ThreeQuarters => 0.75,
            PlaybackRate::Normal => 1.0,
            PlaybackRate::OneAndQuarter => 1.25,
            PlaybackRate::OneAndHalf => 1.5,
            PlaybackRate::Double => 2.0,
        }
    }
}

impl fmt::Display for PlaybackRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.factor())
    }
}

/// The session's playback settings and position.
///
/// Owned by the [`Orchestrator`](super::Orchestrator); the fields are only
/// mutated through its operations so the invariants hold:
/// - `current_track_index` indexes a catalog track
/// - `volume` is within `0.0..=1.0`
/// - `current_time_seconds` is reset whenever the track changes
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub current_time_seconds: f64,
    pub volume: f32,
    pub current_track_index: usize,
    pub shuffle_enabled: bool,
    pub repeat_mode: RepeatMode,
    pub is_fullscreen: bool,
    pub is_muted: bool,
    pub playback_rate: PlaybackRate,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            is_playing: false,
            current_time_seconds: 0.0,
            volume: DEFAULT_VOLUME,
            current_track_index: 0,
            shuffle_enabled: false,
            repeat_mode: RepeatMode::Off,
            is_fullscreen: false,
            is_muted: false,
            playback_rate: PlaybackRate::Normal,
        }
    }
}

impl PlaybackState {
    /// Format elapsed time as M:SS.
    pub fn elapsed_str(&self) -> String {
        format_time(self.current_time_seconds)
    }
}

/// Format seconds as `minutes:seconds`, seconds zero-padded.
///
/// Minutes are not rolled over into hours, so an hour reads `60:00`.
/// Negative and non-finite input reads as `0:00`.
pub fn format_time(seconds: f64) -> String {
    let secs = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Commands sent to the decoder thread.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCommand {
    /// Fetch and open a new media URL
    Load(String),
    /// Start/resume playback
    Play,
    /// Pause playback
    Pause,
    /// Seek to an absolute position in seconds
    Seek(f64),
    /// Shutdown the decoder thread
    Shutdown,
}
