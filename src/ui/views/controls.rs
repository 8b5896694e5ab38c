//! Transport controls: seek bar, buttons, toggles, volume, and rate.

use std::ops::RangeInclusive;

use iced::widget::{Space, button, column, pick_list, row, slider, text};
use iced::{Alignment, Element, Length};

use crate::player::{PlaybackRate, PlaybackState, RepeatMode, format_time};
use crate::ui::messages::Message;
use crate::ui::theme::{self, color, layout, spacing, typography};

/// Seek bar span used until the media reports its duration.
const UNKNOWN_DURATION_RANGE: f64 = 100.0;

/// Range of the seek bar for a (possibly unknown) media duration.
pub fn seek_range(duration: Option<f64>) -> RangeInclusive<f64> {
    match duration {
        Some(d) if d > 0.0 => 0.0..=d,
        _ => 0.0..=UNKNOWN_DURATION_RANGE,
    }
}

/// Label for the repeat toggle.
pub fn repeat_label(mode: RepeatMode) -> &'static str {
    match mode {
        RepeatMode::Off => "Repeat: Off",
        RepeatMode::One => "Repeat: One",
        RepeatMode::All => "Repeat: All",
    }
}

/// Elapsed and total time labels.
///
/// While dragging, the elapsed label follows the preview position. The
/// total falls back to the catalog label until the media reports its
/// duration.
pub fn time_labels(
    state: &PlaybackState,
    duration: Option<f64>,
    seek_preview: Option<f64>,
    catalog_label: &str,
) -> (String, String) {
    let elapsed = match seek_preview {
        Some(preview) => format_time(preview),
        None => state.elapsed_str(),
    };
    let total = match duration {
        Some(d) => format_time(d),
        None => catalog_label.to_string(),
    };
    (elapsed, total)
}

fn control_button(label: &str, msg: Message) -> iced::widget::Button<'_, Message> {
    let label = text(label)
        .size(typography::SIZE_BODY)
        .width(Length::Fill)
        .align_x(iced::alignment::Horizontal::Center);
    button(label)
        .padding([spacing::SM, spacing::SM])
        .width(Length::Fixed(layout::CONTROL_BUTTON_WIDTH))
        .style(theme::button_ghost)
        .on_press(msg)
}

/// The full controls block for the current state.
pub fn controls<'a>(
    state: &PlaybackState,
    duration: Option<f64>,
    seek_preview: Option<f64>,
    catalog_label: &str,
) -> Element<'a, Message> {
    let range = seek_range(duration);
    let position = seek_preview
        .unwrap_or(state.current_time_seconds)
        .clamp(*range.start(), *range.end());

    // on_change only previews, on_release commits one seek
    let seek_slider = slider(range, position, Message::SeekPreview)
        .on_release(Message::SeekRelease)
        .step(0.1)
        .style(theme::slider_style)
        .width(Length::Fill);

    let (elapsed, total) = time_labels(state, duration, seek_preview, catalog_label);
    let seek_row = row![
        text(elapsed).size(typography::SIZE_SMALL).color(color::TEXT_MUTED),
        seek_slider,
        text(total).size(typography::SIZE_SMALL).color(color::TEXT_MUTED),
    ]
    .spacing(spacing::SM)
    .align_y(Alignment::Center);

    let play_label = if state.is_playing { "||" } else { "|>" };
    let transport = row![
        control_button("|<", Message::Previous),
        control_button(play_label, Message::TogglePlayPause).style(theme::button_active),
        control_button(">|", Message::Next),
    ]
    .spacing(spacing::XS);

    let toggles = row![
        button(text("Shuffle").size(typography::SIZE_SMALL))
            .padding([spacing::XS, spacing::SM])
            .style(theme::toggle_style(state.shuffle_enabled))
            .on_press(Message::ToggleShuffle),
        button(text(repeat_label(state.repeat_mode)).size(typography::SIZE_SMALL))
            .padding([spacing::XS, spacing::SM])
            .style(theme::toggle_style(state.repeat_mode.is_active()))
            .on_press(Message::CycleRepeat),
    ]
    .spacing(spacing::XS);

    let mute_label = if state.is_muted { "Unmute" } else { "Mute" };
    let audio = row![
        button(text(mute_label).size(typography::SIZE_SMALL))
            .padding([spacing::XS, spacing::SM])
            .style(theme::toggle_style(state.is_muted))
            .on_press(Message::ToggleMute),
        slider(0.0..=1.0, state.volume, Message::VolumeChanged)
            .step(0.01)
            .style(theme::slider_style)
            .width(Length::Fixed(layout::VOLUME_SLIDER_WIDTH)),
        pick_list(
            PlaybackRate::ALL,
            Some(state.playback_rate),
            Message::PlaybackRateSelected,
        )
        .text_size(typography::SIZE_SMALL),
    ]
    .spacing(spacing::SM)
    .align_y(Alignment::Center);

    column![
        seek_row,
        row![
            transport,
            Space::with_width(Length::Fill),
            toggles,
            Space::with_width(spacing::LG),
            audio,
        ]
        .align_y(Alignment::Center),
    ]
    .spacing(spacing::MD)
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seek_range() {
        assert_eq!(seek_range(Some(215.5)), 0.0..=215.5);
        assert_eq!(seek_range(None), 0.0..=100.0);
        assert_eq!(seek_range(Some(0.0)), 0.0..=100.0);
    }

    #[test]
    fn test_repeat_labels() {
        assert_eq!(repeat_label(RepeatMode::Off), "Repeat: Off");
        assert_eq!(repeat_label(RepeatMode::One), "Repeat: One");
        assert_eq!(repeat_label(RepeatMode::All), "Repeat: All");
    }

    #[test]
    fn test_time_labels() {
        let state = PlaybackState {
            current_time_seconds: 65.0,
            ..Default::default()
        };

        assert_eq!(
            time_labels(&state, None, None, "3:45"),
            ("1:05".to_string(), "3:45".to_string())
        );
        assert_eq!(
            time_labels(&state, Some(3600.0), Some(125.0), "3:45"),
            ("2:05".to_string(), "60:00".to_string())
        );
    }

    #[test]
    fn test_rate_selector_offers_six_rates() {
        let labels: Vec<String> = PlaybackRate::ALL.iter().map(|r| r.to_string()).collect();
        assert_eq!(labels, ["0.5x", "0.75x", "1x", "1.25x", "1.5x", "2x"]);
    }
}
