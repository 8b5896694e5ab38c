//! Message types for the Music Deck UI.

use iced::keyboard;
use iced::widget::image;

use crate::player::PlaybackRate;

/// All possible messages that can be sent in the application
#[derive(Debug, Clone)]
pub enum Message {
    // Transport intents
    TogglePlayPause,
    Previous,
    Next,
    SeekPreview(f64),
    SeekRelease,
    VolumeChanged(f32),
    ToggleMute,
    PlaybackRateSelected(PlaybackRate),
    ToggleShuffle,
    CycleRepeat,
    ToggleFullscreen,

    // Playlist
    SelectTrack(usize),

    // Media event polling
    Tick,

    // Keyboard
    KeyPressed(keyboard::Key, keyboard::Modifiers),

    // Cover art
    CoverLoaded(String, Result<image::Handle, String>),

    DismissStatus,
}
