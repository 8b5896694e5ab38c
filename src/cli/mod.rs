//! Command-line interface for music-deck.
//!
//! This module provides CLI commands for inspecting the catalog and the
//! audio setup without launching the GUI.

mod commands;

pub use commands::{Cli, Commands, run_command};
