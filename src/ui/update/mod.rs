//! Update handlers for application messages.
//!
//! This module is split into submodules for maintainability:
//! - `player`: Transport intents and media event polling
//! - `keyboard`: Keyboard shortcuts
//! - `cover`: Background cover art loading

mod cover;
mod keyboard;
mod player;

pub use cover::{handle_cover_loaded, request_catalog_covers};
pub use keyboard::handle_keyboard;
pub use player::handle_player;
