//! Playlist: one clickable row per catalog track.

use iced::widget::{Space, button, column, container, image, row, scrollable, text};
use iced::{Alignment, Element, Length};

use crate::catalog::Track;
use crate::ui::messages::Message;
use crate::ui::state::DeckState;
use crate::ui::theme::{self, color, layout, spacing, typography};

/// Marker shown in front of the active row.
pub fn row_marker(is_active: bool, is_playing: bool) -> &'static str {
    match (is_active, is_playing) {
        (true, true) => ">",
        (true, false) => "=",
        _ => " ",
    }
}

/// Cover thumbnail, or a placeholder box while it is missing.
pub fn cover_thumb<'a>(cover: Option<&image::Handle>, size: f32) -> Element<'a, Message> {
    match cover {
        Some(handle) => image(handle.clone())
            .width(Length::Fixed(size))
            .height(Length::Fixed(size))
            .into(),
        None => container(Space::new(Length::Fixed(size), Length::Fixed(size)))
            .style(theme::cover_placeholder_style)
            .into(),
    }
}

fn track_row<'a>(
    index: usize,
    track: &'a Track,
    is_active: bool,
    is_playing: bool,
    cover: Option<&image::Handle>,
) -> Element<'a, Message> {
    let marker = text(row_marker(is_active, is_playing))
        .size(typography::SIZE_BODY)
        .width(Length::Fixed(12.0));

    let info = column![
        text(&track.title).size(typography::SIZE_BODY),
        text(&track.artist)
            .size(typography::SIZE_SMALL)
            .color(color::TEXT_MUTED),
    ]
    .width(Length::Fill);

    button(
        row![
            marker,
            cover_thumb(cover, layout::COVER_ART_THUMB),
            info,
            text(&track.duration_label)
                .size(typography::SIZE_SMALL)
                .color(color::TEXT_MUTED),
        ]
        .spacing(spacing::MD)
        .align_y(Alignment::Center),
    )
    .padding([spacing::XS, spacing::SM])
    .width(Length::Fill)
    .style(theme::toggle_style(is_active))
    .on_press(Message::SelectTrack(index))
    .into()
}

/// Scrollable list of every catalog track.
pub fn playlist(s: &DeckState) -> Element<'_, Message> {
    let state = s.orchestrator.state();

    let rows: Vec<Element<Message>> = s
        .orchestrator
        .catalog()
        .tracks()
        .iter()
        .enumerate()
        .map(|(index, track)| {
            track_row(
                index,
                track,
                index == state.current_track_index,
                state.is_playing,
                s.cover(&track.cover_art_url),
            )
        })
        .collect();

    column![
        text("Playlist").size(typography::SIZE_HEADING),
        scrollable(column(rows).spacing(spacing::XS)).height(Length::Fill),
    ]
    .spacing(spacing::SM)
    .into()
}
