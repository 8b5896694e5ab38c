//! UI module for Music Deck.

mod messages;
mod state;
pub mod theme;
mod update;
mod views;

use iced::{Element, Subscription, Task, Theme, keyboard, time};

use std::time::Duration;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::{self, ResultExt};
use crate::player::{AudioEngine, MediaPrimitive, Orchestrator, Unavailable};

pub use messages::Message;
use state::DeckState;

pub struct MusicDeck {
    state: DeckState,
    theme: Theme,
}

impl MusicDeck {
    /// Open the audio output and start a session on the first track.
    ///
    /// Without an audio device the session still runs against a primitive
    /// that never becomes ready, so the UI stays usable.
    pub fn new(catalog: Catalog, config: &Config) -> (Self, Task<Message>) {
        let media = AudioEngine::new(&config.engine_config())
            .with_context("opening audio output")
            .map(|engine| Box::new(engine) as Box<dyn MediaPrimitive>);

        let mut state = start_session(catalog, media, config.tick_interval());
        let covers = update::request_catalog_covers(&mut state);

        (
            Self {
                state,
                theme: theme::app_theme(&config.appearance.theme),
            },
            covers,
        )
    }

    pub fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            // Drains media events; playback itself runs on the audio thread
            time::every(self.state.tick_interval).map(|_| Message::Tick),
            // Keyboard shortcuts - global within the app
            keyboard::on_key_press(|key, modifiers| Some(Message::KeyPressed(key, modifiers))),
        ])
    }

    pub fn view(&self) -> Element<'_, Message> {
        views::deck_view(&self.state)
    }

    pub fn theme(&self) -> Theme {
        self.theme.clone()
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        if !matches!(message, Message::Tick) {
            tracing::trace!(target: "ui::update", message = ?message, "Update received");
        }

        let s = &mut self.state;
        match message {
            Message::KeyPressed(key, modifiers) => update::handle_keyboard(s, key, modifiers),
            Message::CoverLoaded(url, result) => update::handle_cover_loaded(s, url, result),
            Message::DismissStatus => {
                s.status_message = None;
                Task::none()
            }
            other => update::handle_player(s, other),
        }
    }
}

/// Start the orchestrator, putting any startup failure in the status line.
fn start_session(
    catalog: Catalog,
    media: error::Result<Box<dyn MediaPrimitive>>,
    tick_interval: Duration,
) -> DeckState {
    let (media, startup_error) = match media {
        Ok(media) => (media, None),
        Err(e) => {
            tracing::error!("Audio output unavailable: {}", e);
            let media: Box<dyn MediaPrimitive> = Box::new(Unavailable);
            (media, Some(e))
        }
    };

    let mut orchestrator = Orchestrator::new(catalog, media);
    let fault = orchestrator.take_startup_fault();
    let mut state = DeckState::new(orchestrator, tick_interval);

    if let Some(e) = startup_error {
        state.status_message = Some(format!("Playback disabled: {}", e));
    } else if let Some(e) = fault {
        state.report("Playback error", e);
    }
    state
}
