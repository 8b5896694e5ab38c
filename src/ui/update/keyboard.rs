//! Keyboard shortcut handling.
//!
//! Maps key presses to the same intents the on-screen controls send.
//! Modifiers are ignored, so Shift+Space still toggles playback.

use iced::Task;
use iced::keyboard::{self, key};

use super::super::messages::Message;
use super::super::state::DeckState;

/// Volume change per arrow key press.
const VOLUME_STEP: f32 = 0.1;

/// Handle keyboard shortcuts.
///
/// Returns a Task if the key triggered an action, or Task::none() if unhandled.
pub fn handle_keyboard(
    s: &DeckState,
    key: keyboard::Key,
    _modifiers: keyboard::Modifiers,
) -> Task<Message> {
    match key_intent(&key, s.orchestrator.state().volume) {
        Some(msg) => {
            tracing::debug!(target: "ui::keyboard", "{:?} -> {:?}", key, msg);
            Task::done(msg)
        }
        None => Task::none(),
    }
}

/// The intent a key press stands for, given the current volume.
pub fn key_intent(key: &keyboard::Key, volume: f32) -> Option<Message> {
    match key.as_ref() {
        keyboard::Key::Named(key::Named::Space) => Some(Message::TogglePlayPause),
        keyboard::Key::Named(key::Named::ArrowLeft) => Some(Message::Previous),
        keyboard::Key::Named(key::Named::ArrowRight) => Some(Message::Next),
        keyboard::Key::Named(key::Named::ArrowUp) => Some(Message::VolumeChanged(
            (volume + VOLUME_STEP).min(1.0),
        )),
        keyboard::Key::Named(key::Named::ArrowDown) => Some(Message::VolumeChanged(
            (volume - VOLUME_STEP).max(0.0),
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(k: key::Named) -> keyboard::Key {
        keyboard::Key::Named(k)
    }

    #[test]
    fn test_transport_keys() {
        assert!(matches!(
            key_intent(&named(key::Named::Space), 0.5),
            Some(Message::TogglePlayPause)
        ));
        assert!(matches!(
            key_intent(&named(key::Named::ArrowLeft), 0.5),
            Some(Message::Previous)
        ));
        assert!(matches!(
            key_intent(&named(key::Named::ArrowRight), 0.5),
            Some(Message::Next)
        ));
    }

    #[test]
    fn test_volume_keys_step_and_clamp() {
        match key_intent(&named(key::Named::ArrowUp), 0.5) {
            Some(Message::VolumeChanged(v)) => assert!((v - 0.6).abs() < 1e-6),
            other => panic!("unexpected intent {:?}", other),
        }
        match key_intent(&named(key::Named::ArrowUp), 0.95) {
            Some(Message::VolumeChanged(v)) => assert_eq!(v, 1.0),
            other => panic!("unexpected intent {:?}", other),
        }
        match key_intent(&named(key::Named::ArrowDown), 0.05) {
            Some(Message::VolumeChanged(v)) => assert_eq!(v, 0.0),
            other => panic!("unexpected intent {:?}", other),
        }
    }

    #[test]
    fn test_unmapped_keys() {
        assert!(key_intent(&named(key::Named::Enter), 0.5).is_none());
        assert!(key_intent(&keyboard::Key::Character("k".into()), 0.5).is_none());
    }
}
