//! Application state types for the Music Deck UI.

use std::collections::HashMap;
use std::time::Duration;

use iced::widget::image;

use crate::player::{MediaPrimitive, Orchestrator};

/// The orchestrator as the UI owns it: real engine or a stand-in.
pub type DeckOrchestrator = Orchestrator<Box<dyn MediaPrimitive>>;

/// Cover art for one URL.
///
/// Covers are fetched in the background and cached for the session. The
/// UI shows a placeholder for anything not `Loaded`.
#[derive(Debug, Clone)]
pub enum CoverArt {
    Loading,
    Loaded(image::Handle),
    Failed,
}

/// Everything the UI needs between messages
pub struct DeckState {
    pub orchestrator: DeckOrchestrator,

    /// Seek slider position while the user is dragging it
    pub seek_preview: Option<f64>,

    /// Cover art cache keyed by URL
    pub covers: HashMap<String, CoverArt>,

    /// Last reported fault, shown in the status line
    pub status_message: Option<String>,

    pub tick_interval: Duration,
}

impl DeckState {
    pub fn new(orchestrator: DeckOrchestrator, tick_interval: Duration) -> Self {
        Self {
            orchestrator,
            seek_preview: None,
            covers: HashMap::new(),
            status_message: None,
            tick_interval,
        }
    }

    /// Loaded cover for a URL, if any.
    pub fn cover(&self, url: &str) -> Option<&image::Handle> {
        match self.covers.get(url) {
            Some(CoverArt::Loaded(handle)) => Some(handle),
            _ => None,
        }
    }

    /// Record a fault for the status line.
    pub fn report(&mut self, context: &str, error: impl std::fmt::Display) {
        tracing::error!(target: "ui::update", "{}: {}", context, error);
        self.status_message = Some(format!("{}: {}", context, error));
    }
}
