//! Transport intents and media event polling.
//!
//! All player commands (buttons, playlist rows, keyboard shortcuts) flow
//! through `handle_player()`, so each intent reaches the orchestrator the
//! same way whatever triggered it.

use iced::Task;
use iced::window;

use super::super::messages::Message;
use super::super::state::DeckState;

/// Handle player-related messages.
///
/// Faults from the media primitive are logged and shown in the status
/// line; the state transition has already been applied either way.
pub fn handle_player(s: &mut DeckState, msg: Message) -> Task<Message> {
    let orch = &mut s.orchestrator;

    let result = match msg {
        Message::TogglePlayPause => orch.toggle_play_pause(),
        Message::Previous => orch.previous(),
        Message::Next => orch.next(),
        Message::SelectTrack(index) => orch.select_track(index),

        // Preview while dragging, seek once on release
        Message::SeekPreview(position) => {
            s.seek_preview = Some(position);
            Ok(())
        }
        Message::SeekRelease => match s.seek_preview.take() {
            Some(target) => orch.seek(target),
            None => Ok(()),
        },

        Message::VolumeChanged(volume) => orch.set_volume(volume),
        Message::ToggleMute => orch.toggle_mute(),
        Message::PlaybackRateSelected(rate) => orch.set_playback_rate(rate),

        Message::ToggleShuffle => {
            orch.toggle_shuffle();
            Ok(())
        }
        Message::CycleRepeat => {
            orch.toggle_repeat_mode();
            Ok(())
        }
        Message::ToggleFullscreen => {
            orch.toggle_fullscreen();
            return fullscreen_task(orch.state().is_fullscreen);
        }

        Message::Tick => orch.pump_events(),

        _ => Ok(()),
    };

    if let Err(e) = result {
        s.report("Playback error", e);
    }
    Task::none()
}

/// Switch the window between fullscreen and windowed.
fn fullscreen_task(fullscreen: bool) -> Task<Message> {
    let mode = if fullscreen {
        window::Mode::Fullscreen
    } else {
        window::Mode::Windowed
    };
    tracing::debug!(target: "ui::update", "Window mode -> {:?}", mode);
    window::get_latest().and_then(move |id| window::change_mode(id, mode))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{MediaEvent, MediaPrimitive, PlaybackRate, PlayerError};
    use crate::test_utils::{RecordingMedia, catalog_of};
    use crate::ui::state::DeckOrchestrator;
    use std::time::Duration;

    fn deck() -> DeckState {
        let media: Box<dyn MediaPrimitive> = Box::new(RecordingMedia::new());
        let orch: DeckOrchestrator = crate::player::Orchestrator::new(catalog_of(3), media);
        DeckState::new(orch, Duration::from_millis(250))
    }

    #[test]
    fn test_seek_commits_on_release() {
        let mut s = deck();
        let _ = handle_player(&mut s, Message::SeekPreview(42.0));
        assert_eq!(s.seek_preview, Some(42.0));
        assert_eq!(s.orchestrator.state().current_time_seconds, 0.0);

        let _ = handle_player(&mut s, Message::SeekRelease);
        assert_eq!(s.seek_preview, None);
        assert_eq!(s.orchestrator.state().current_time_seconds, 42.0);
    }

    #[test]
    fn test_release_without_preview_is_ignored() {
        let mut s = deck();
        let _ = handle_player(&mut s, Message::SeekRelease);
        assert_eq!(s.orchestrator.state().current_time_seconds, 0.0);
    }

    #[test]
    fn test_intents_reach_orchestrator() {
        let mut s = deck();
        let _ = handle_player(&mut s, Message::SelectTrack(2));
        let _ = handle_player(&mut s, Message::ToggleShuffle);
        let _ = handle_player(&mut s, Message::CycleRepeat);
        let _ = handle_player(&mut s, Message::PlaybackRateSelected(PlaybackRate::Double));

        let state = s.orchestrator.state();
        assert_eq!(state.current_track_index, 2);
        assert!(state.is_playing);
        assert!(state.shuffle_enabled);
        assert_eq!(state.playback_rate, PlaybackRate::Double);
    }

    #[test]
    fn test_out_of_range_select_reaches_status_line() {
        let mut s = deck();
        let _ = handle_player(&mut s, Message::SelectTrack(7));
        assert!(
            s.status_message
                .as_deref()
                .is_some_and(|m| m.contains("out of range"))
        );
        assert_eq!(s.orchestrator.state().current_track_index, 0);
    }

    #[test]
    fn test_tick_pumps_events() {
        let mut media = RecordingMedia::new();
        media.push_event(MediaEvent::TimeUpdate(12.5));
        let media: Box<dyn MediaPrimitive> = Box::new(media);
        let orch: DeckOrchestrator = crate::player::Orchestrator::new(catalog_of(3), media);
        let mut s = DeckState::new(orch, Duration::from_millis(250));

        let _ = handle_player(&mut s, Message::Tick);
        assert_eq!(s.orchestrator.state().current_time_seconds, 12.5);
    }

    #[test]
    fn test_media_failure_reaches_status_line() {
        let mut media = RecordingMedia::new();
        media.push_event(MediaEvent::Failed(PlayerError::Fetch(
            "track-0.mp3: not found".into(),
        )));
        let media: Box<dyn MediaPrimitive> = Box::new(media);
        let orch: DeckOrchestrator = crate::player::Orchestrator::new(catalog_of(3), media);
        let mut s = DeckState::new(orch, Duration::from_millis(250));

        let _ = handle_player(&mut s, Message::Tick);
        assert_eq!(
            s.status_message.as_deref(),
            Some("Playback error: Failed to fetch media: track-0.mp3: not found")
        );
        assert_eq!(s.orchestrator.state().current_track_index, 0);
    }

    #[test]
    fn test_volume_intent() {
        let mut s = deck();
        let _ = handle_player(&mut s, Message::VolumeChanged(0.25));
        let _ = handle_player(&mut s, Message::ToggleMute);
        assert_eq!(s.orchestrator.state().volume, 0.25);
        assert!(s.orchestrator.state().is_muted);
    }
}
