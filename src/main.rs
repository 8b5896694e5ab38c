//! Music Deck - A desktop audio player for a fixed song catalog.
//!
//! Plays the built-in catalog (or one loaded from a JSON file) with the
//! usual transport controls, shuffle, repeat, and playback speed. It can be
//! run as a GUI application or used via CLI commands.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod player;
#[cfg(test)]
pub mod test_utils;
pub mod ui;

use clap::Parser;
use iced::{Size, application, window};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use ui::MusicDeck;

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env().add_directive("music_deck=info".parse()?))
        .init();

    let config = config::load(args.config.as_deref());

    // Try to run a CLI command
    if cli::run_command(&args, &config)? {
        // A command was executed, exit normally
        return Ok(());
    }

    let catalog = args.load_catalog(&config)?;
    tracing::info!("Starting with {} track(s)", catalog.len());

    let window_size = Size::new(
        config.appearance.window_width,
        config.appearance.window_height,
    );

    // No command specified, launch the GUI
    application("Music Deck", MusicDeck::update, MusicDeck::view)
        .subscription(MusicDeck::subscription)
        .theme(MusicDeck::theme)
        .window(window::Settings {
            size: window_size,
            ..Default::default()
        })
        .run_with(move || MusicDeck::new(catalog, &config))
        .map_err(|e| anyhow::anyhow!("GUI Error: {}", e))
}
