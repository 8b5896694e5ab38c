//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `playlist`: Print the catalog
//! - `devices`: List audio output devices

mod devices;
mod playlist;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::catalog::Catalog;
use crate::config::Config;

pub use devices::cmd_devices;
pub use playlist::cmd_playlist;

/// Music Deck CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON catalog to play instead of the built-in one
    #[arg(long, env = "MUSIC_DECK_CATALOG", global = true)]
    pub catalog: Option<PathBuf>,

    /// Config file to read instead of the standard location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Catalog file from the command line, falling back to the config.
    pub fn catalog_path(&self, config: &Config) -> Option<PathBuf> {
        self.catalog.clone().or_else(|| config.catalog.path.clone())
    }

    /// Load the catalog this session should play.
    pub fn load_catalog(&self, config: &Config) -> crate::error::Result<Catalog> {
        match self.catalog_path(config) {
            Some(path) => Catalog::load(&path),
            None => Ok(Catalog::builtin()),
        }
    }
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Print the tracks in playback order
    Playlist {
        /// Include media URLs
        #[arg(short, long)]
        verbose: bool,
    },
    /// List audio output devices
    Devices,
}

/// Run the specified CLI command.
///
/// Returns `Ok(true)` if a command was run, `Ok(false)` if no command was specified
/// (meaning the GUI should launch).
pub fn run_command(cli: &Cli, config: &Config) -> anyhow::Result<bool> {
    match &cli.command {
        Some(Commands::Playlist { verbose }) => {
            let catalog = cli.load_catalog(config)?;
            cmd_playlist(&catalog, *verbose)?;
            Ok(true)
        }
        Some(Commands::Devices) => {
            cmd_devices(&config.audio.output_device)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_no_command() {
        let cli = Cli::try_parse_from(["music-deck"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.catalog.is_none());
    }

    #[test]
    fn test_parse_playlist_with_catalog() {
        let cli = Cli::try_parse_from([
            "music-deck",
            "--catalog",
            "songs.json",
            "playlist",
            "--verbose",
        ])
        .unwrap();
        assert_eq!(cli.catalog, Some(PathBuf::from("songs.json")));
        assert!(matches!(cli.command, Some(Commands::Playlist { verbose: true })));
    }

    #[test]
    fn test_catalog_path_prefers_command_line() {
        let mut config = Config::default();
        config.catalog.path = Some(PathBuf::from("/from/config.json"));

        let cli = Cli::try_parse_from(["music-deck"]).unwrap();
        assert_eq!(cli.catalog_path(&config), Some(PathBuf::from("/from/config.json")));

        let cli = Cli::try_parse_from(["music-deck", "--catalog", "/cli.json"]).unwrap();
        assert_eq!(cli.catalog_path(&config), Some(PathBuf::from("/cli.json")));
    }

    #[test]
    fn test_load_catalog_defaults_to_builtin() {
        let cli = Cli::try_parse_from(["music-deck"]).unwrap();
        let catalog = cli.load_catalog(&Config::default()).unwrap();
        assert_eq!(catalog, Catalog::builtin());
    }

    #[test]
    fn test_unknown_command_rejected() {
        assert!(Cli::try_parse_from(["music-deck", "scan"]).is_err());
    }
}
