//! Design System Theme Constants
//!
//! Centralized theme definitions for consistent UI across the application.
//! All colors, spacing, and sizing should be defined here.
//!
//! # Color Philosophy
//! - Base surfaces follow the configured iced theme (dark or light)
//! - Indigo primary accent for actions and active toggles
//! - Semantic colors for status (success/error)

use iced::widget::{button, container, slider};
use iced::{Background, Border, Color, Theme};

// =============================================================================
// COLORS
// =============================================================================

pub mod color {
    use super::*;

    /// Primary action color
    /// Hex: #6366f1
    pub const PRIMARY: Color = Color::from_rgb(
        0x63 as f32 / 255.0,
        0x66 as f32 / 255.0,
        0xf1 as f32 / 255.0,
    );

    /// Primary hover state
    /// Hex: #818cf8
    pub const PRIMARY_HOVER: Color = Color::from_rgb(
        0x81 as f32 / 255.0,
        0x8c as f32 / 255.0,
        0xf8 as f32 / 255.0,
    );

    /// Primary pressed/muted state
    /// Hex: #4f46e5
    pub const PRIMARY_PRESSED: Color = Color::from_rgb(
        0x4f as f32 / 255.0,
        0x46 as f32 / 255.0,
        0xe5 as f32 / 255.0,
    );

    /// Muted text - hints, timestamps, inactive toggles
    /// Hex: #71717a
    pub const TEXT_MUTED: Color = Color::from_rgb(
        0x71 as f32 / 255.0,
        0x71 as f32 / 255.0,
        0x7a as f32 / 255.0,
    );

    /// Text on the primary accent
    pub const TEXT_ON_PRIMARY: Color = Color::WHITE;

    /// Error - failed media, status line faults
    /// Hex: #ef4444
    pub const ERROR: Color = Color::from_rgb(
        0xef as f32 / 255.0,
        0x44 as f32 / 255.0,
        0x44 as f32 / 255.0,
    );

    /// Create a color with alpha transparency
    pub const fn with_alpha(color: Color, alpha: f32) -> Color {
        Color {
            r: color.r,
            g: color.g,
            b: color.b,
            a: alpha,
        }
    }
}

// =============================================================================
// SPACING
// =============================================================================

pub mod spacing {
    /// Tight spacing inside controls
    pub const XS: u16 = 4;
    pub const SM: u16 = 8;
    pub const MD: u16 = 12;
    pub const LG: u16 = 16;
    /// Section gaps
    pub const XL: u16 = 24;
}

// =============================================================================
// LAYOUT
// =============================================================================

pub mod layout {
    /// Cover art in the now-playing block
    pub const COVER_ART: f32 = 220.0;

    /// Cover art while fullscreen
    pub const COVER_ART_FULLSCREEN: f32 = 420.0;

    /// Thumbnail in playlist rows
    pub const COVER_ART_THUMB: f32 = 40.0;

    /// Transport buttons
    pub const CONTROL_BUTTON_WIDTH: f32 = 44.0;

    pub const VOLUME_SLIDER_WIDTH: f32 = 110.0;
}

// =============================================================================
// TYPOGRAPHY
// =============================================================================

pub mod typography {
    pub const SIZE_TITLE: u16 = 24;
    pub const SIZE_HEADING: u16 = 18;
    pub const SIZE_BODY: u16 = 14;
    pub const SIZE_SMALL: u16 = 12;
}

pub mod radius {
    pub const SM: f32 = 4.0;
    pub const MD: f32 = 8.0;
}

/// The iced theme for a configured theme name.
pub fn app_theme(name: &str) -> Theme {
    match name {
        "light" => Theme::Light,
        _ => Theme::Dark,
    }
}

// =============================================================================
// CONTAINER STYLE HELPERS
// =============================================================================

/// Card style - raised surface with subtle border and radius
pub fn card_style(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();
    container::Style {
        background: Some(Background::Color(palette.background.weak.color)),
        border: Border {
            color: palette.background.strong.color,
            width: 1.0,
            radius: radius::MD.into(),
        },
        ..Default::default()
    }
}

/// Placeholder shown where cover art has not loaded
pub fn cover_placeholder_style(theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(
            theme.extended_palette().background.strong.color,
        )),
        border: Border {
            radius: radius::MD.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

// =============================================================================
// BUTTON STYLE HELPERS
// =============================================================================

/// Ghost button - minimal, for inactive toggles and playlist rows
pub fn button_ghost(theme: &Theme, status: button::Status) -> button::Style {
    let palette = theme.extended_palette();
    let (bg, text) = match status {
        button::Status::Active => (Color::TRANSPARENT, palette.background.base.text),
        button::Status::Hovered => (palette.background.weak.color, palette.background.base.text),
        button::Status::Pressed => (palette.background.strong.color, palette.background.base.text),
        button::Status::Disabled => (Color::TRANSPARENT, color::TEXT_MUTED),
    };

    button::Style {
        background: Some(Background::Color(bg)),
        text_color: text,
        border: Border {
            radius: radius::SM.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Active/selected state button (e.g., enabled shuffle, current track row)
pub fn button_active(_theme: &Theme, status: button::Status) -> button::Style {
    let (bg, text) = match status {
        button::Status::Active => (color::PRIMARY, color::TEXT_ON_PRIMARY),
        button::Status::Hovered => (color::PRIMARY_HOVER, color::TEXT_ON_PRIMARY),
        button::Status::Pressed => (color::PRIMARY_PRESSED, color::TEXT_ON_PRIMARY),
        button::Status::Disabled => (color::with_alpha(color::PRIMARY, 0.4), color::TEXT_MUTED),
    };

    button::Style {
        background: Some(Background::Color(bg)),
        text_color: text,
        border: Border {
            radius: radius::SM.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Pick the active or ghost style for a toggle.
pub fn toggle_style(active: bool) -> fn(&Theme, button::Status) -> button::Style {
    if active { button_active } else { button_ghost }
}

// =============================================================================
// SLIDER STYLE HELPERS
// =============================================================================

/// Standard slider style (volume, seek)
pub fn slider_style(theme: &Theme, status: slider::Status) -> slider::Style {
    let rail_bg = theme.extended_palette().background.strong.color;
    let (rail_fill, handle_color) = match status {
        slider::Status::Active => (color::PRIMARY, color::PRIMARY),
        slider::Status::Hovered => (color::PRIMARY_HOVER, color::PRIMARY_HOVER),
        slider::Status::Dragged => (color::PRIMARY_PRESSED, color::PRIMARY_PRESSED),
    };

    slider::Style {
        rail: slider::Rail {
            backgrounds: (Background::Color(rail_fill), Background::Color(rail_bg)),
            width: 4.0,
            border: Border {
                radius: 2.0.into(),
                ..Default::default()
            },
        },
        handle: slider::Handle {
            shape: slider::HandleShape::Circle { radius: 6.0 },
            background: Background::Color(handle_color),
            border_width: 0.0,
            border_color: Color::TRANSPARENT,
        },
    }
}
