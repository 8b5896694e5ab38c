//! View rendering functions for the UI components.
//!
//! This module is organized into submodules by concern:
//! - `controls`: Seek bar, transport buttons, toggles, volume, rate
//! - `playlist`: Catalog track rows

mod controls;
mod playlist;

use iced::widget::{Space, button, column, container, row, text};
use iced::{Alignment, Element, Length};

use crate::ui::messages::Message;
use crate::ui::state::DeckState;
use crate::ui::theme::{self, color, layout, spacing, typography};

/// The whole window: header, now playing, controls, playlist, status.
///
/// Fullscreen enlarges the cover and hides the playlist.
pub fn deck_view(s: &DeckState) -> Element<'_, Message> {
    let state = s.orchestrator.state();

    let fullscreen_label = if state.is_fullscreen {
        "Exit fullscreen"
    } else {
        "Fullscreen"
    };
    let header = row![
        text("Music Deck").size(typography::SIZE_TITLE),
        Space::with_width(Length::Fill),
        button(text(fullscreen_label).size(typography::SIZE_SMALL))
            .padding([spacing::XS, spacing::SM])
            .style(theme::toggle_style(state.is_fullscreen))
            .on_press(Message::ToggleFullscreen),
    ]
    .align_y(Alignment::Center);

    let cover_size = if state.is_fullscreen {
        layout::COVER_ART_FULLSCREEN
    } else {
        layout::COVER_ART
    };

    let (now_playing, catalog_label) = match s.orchestrator.current_track() {
        Some(track) => (
            row![
                playlist::cover_thumb(s.cover(&track.cover_art_url), cover_size),
                column![
                    text(&track.title).size(typography::SIZE_HEADING),
                    text(&track.artist)
                        .size(typography::SIZE_BODY)
                        .color(color::TEXT_MUTED),
                ]
                .spacing(spacing::XS),
            ]
            .spacing(spacing::XL)
            .align_y(Alignment::Center),
            track.duration_label.as_str(),
        ),
        None => (row![text("Nothing loaded")], "0:00"),
    };

    let player = container(
        column![
            now_playing,
            controls::controls(
                state,
                s.orchestrator.media_duration(),
                s.seek_preview,
                catalog_label,
            ),
        ]
        .spacing(spacing::LG),
    )
    .padding(spacing::LG)
    .width(Length::Fill)
    .style(theme::card_style);

    let mut content = column![header, player].spacing(spacing::LG);

    if !state.is_fullscreen {
        content = content.push(playlist::playlist(s));
    }

    if let Some(status) = &s.status_message {
        content = content.push(status_line(status));
    }

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(spacing::XL)
        .into()
}

fn status_line(message: &str) -> Element<'_, Message> {
    row![
        text(message)
            .size(typography::SIZE_SMALL)
            .color(color::ERROR)
            .width(Length::Fill),
        button(text("Dismiss").size(typography::SIZE_SMALL))
            .padding([spacing::XS, spacing::SM])
            .style(theme::button_ghost)
            .on_press(Message::DismissStatus),
    ]
    .spacing(spacing::SM)
    .align_y(Alignment::Center)
    .into()
}
