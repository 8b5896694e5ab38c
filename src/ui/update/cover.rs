//! Background cover art loading.
//!
//! Every distinct cover URL in the catalog is fetched once per session.
//! Remote covers come over HTTP, local ones from disk; a failed cover
//! leaves the placeholder in place.

use iced::Task;
use iced::widget::image;

use crate::player::local_path;

use super::super::messages::Message;
use super::super::state::{CoverArt, DeckState};

/// Start fetching every catalog cover that is not cached yet.
pub fn request_catalog_covers(s: &mut DeckState) -> Task<Message> {
    let urls: Vec<String> = s
        .orchestrator
        .catalog()
        .tracks()
        .iter()
        .map(|t| t.cover_art_url.clone())
        .collect();

    let tasks: Vec<Task<Message>> = urls
        .into_iter()
        .filter_map(|url| request_cover(s, url))
        .collect();

    tracing::debug!(target: "ui::cover", "Fetching {} cover(s)", tasks.len());
    Task::batch(tasks)
}

/// Task fetching one cover, or `None` if it is cached or in flight.
fn request_cover(s: &mut DeckState, url: String) -> Option<Task<Message>> {
    if url.is_empty() || s.covers.contains_key(&url) {
        return None;
    }
    s.covers.insert(url.clone(), CoverArt::Loading);

    let target = url.clone();
    Some(Task::perform(fetch_cover(target), move |result| {
        Message::CoverLoaded(url.clone(), result)
    }))
}

/// Store a finished cover fetch.
pub fn handle_cover_loaded(
    s: &mut DeckState,
    url: String,
    result: Result<image::Handle, String>,
) -> Task<Message> {
    let entry = match result {
        Ok(handle) => CoverArt::Loaded(handle),
        Err(e) => {
            tracing::warn!(target: "ui::cover", "Cover art unavailable for {}: {}", url, e);
            CoverArt::Failed
        }
    };
    s.covers.insert(url, entry);
    Task::none()
}

async fn fetch_cover(url: String) -> Result<image::Handle, String> {
    let bytes = match local_path(&url) {
        Some(path) => tokio::fs::read(path).await.map_err(|e| e.to_string())?,
        None => reqwest::get(&url)
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| e.to_string())?
            .bytes()
            .await
            .map_err(|e| e.to_string())?
            .to_vec(),
    };
    Ok(image::Handle::from_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::MediaPrimitive;
    use crate::test_utils::{RecordingMedia, catalog_of};
    use crate::ui::state::DeckOrchestrator;
    use std::time::Duration;

    fn deck(len: usize) -> DeckState {
        let media: Box<dyn MediaPrimitive> = Box::new(RecordingMedia::new());
        let orch: DeckOrchestrator = crate::player::Orchestrator::new(catalog_of(len), media);
        DeckState::new(orch, Duration::from_millis(250))
    }

    #[test]
    fn test_request_marks_covers_loading_once() {
        let mut s = deck(3);
        let _ = request_catalog_covers(&mut s);
        assert_eq!(s.covers.len(), 3);
        assert!(
            s.covers
                .values()
                .all(|c| matches!(c, CoverArt::Loading))
        );

        assert!(request_cover(&mut s, "cover-0.jpg".to_string()).is_none());
        assert!(request_cover(&mut s, String::new()).is_none());
    }

    #[test]
    fn test_failed_cover_keeps_placeholder() {
        let mut s = deck(1);
        let _ = handle_cover_loaded(&mut s, "cover-0.jpg".to_string(), Err("404".to_string()));
        assert!(matches!(s.covers.get("cover-0.jpg"), Some(CoverArt::Failed)));
        assert!(s.cover("cover-0.jpg").is_none());
    }

    #[test]
    fn test_loaded_cover_is_cached() {
        let mut s = deck(1);
        let handle = image::Handle::from_bytes(vec![0u8; 4]);
        let _ = handle_cover_loaded(&mut s, "cover-0.jpg".to_string(), Ok(handle));
        assert!(s.cover("cover-0.jpg").is_some());
    }

    #[test]
    fn test_fetch_local_cover() {
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"\x89PNG").unwrap();

        let url = file.path().to_string_lossy().to_string();
        assert!(rt.block_on(fetch_cover(url)).is_ok());
        assert!(
            rt.block_on(fetch_cover("/nonexistent/cover.jpg".to_string()))
                .is_err()
        );
    }
}
