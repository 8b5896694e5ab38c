//! The song catalog: an ordered, immutable list of tracks.
//!
//! A session uses either the built-in catalog or one loaded from a JSON
//! array at startup. Both camelCase field names and the short aliases
//! (`duration`, `url`, `coverArt`) are accepted:
//!
//! ```json
//! [
//!   {
//!     "id": 1,
//!     "title": "Summer Breeze",
//!     "artist": "Ambient Dreams",
//!     "duration": "3:45",
//!     "url": "https://example.com/song-1.mp3",
//!     "coverArt": "https://example.com/cover-1.jpg"
//!   }
//! ]
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result, ResultExt};

/// One playable catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: u32,
    pub title: String,
    pub artist: String,
    /// Display only; the media reports the real duration once loaded.
    #[serde(alias = "duration")]
    pub duration_label: String,
    #[serde(alias = "url")]
    pub media_url: String,
    #[serde(alias = "coverArt")]
    pub cover_art_url: String,
}

/// Non-empty ordered list of tracks, indexed `0..len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    /// Build a catalog, rejecting empty lists and duplicate ids.
    pub fn new(tracks: Vec<Track>) -> Result<Self> {
        if tracks.is_empty() {
            return Err(Error::invalid_catalog("catalog contains no tracks"));
        }

        let mut seen = HashSet::with_capacity(tracks.len());
        for track in &tracks {
            if !seen.insert(track.id) {
                return Err(Error::invalid_catalog(format!(
                    "duplicate track id {}",
                    track.id
                )));
            }
        }

        Ok(Self { tracks })
    }

    /// Parse a catalog from a JSON array.
    pub fn from_json(json: &str) -> Result<Self> {
        let tracks: Vec<Track> = serde_json::from_str(json)?;
        Self::new(tracks)
    }

    /// Load a catalog from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(format!("reading catalog {}", path.display()))?;
        let catalog =
            Self::from_json(&contents).with_context(format!("parsing {}", path.display()))?;
        tracing::info!("Loaded {} tracks from {:?}", catalog.len(), path);
        Ok(catalog)
    }

    /// The catalog shipped with the application.
    pub fn builtin() -> Self {
        let tracks = vec![
            Track {
                id: 1,
                title: "Summer Breeze".to_string(),
                artist: "Ambient Dreams".to_string(),
                duration_label: "3:45".to_string(),
                media_url: "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-1.mp3"
                    .to_string(),
                cover_art_url: "https://images.unsplash.com/photo-1459749411175-04bf5292ceea?auto=format&fit=crop&q=80&w=300&h=300".to_string(),
            },
            Track {
                id: 2,
                title: "Ocean Waves".to_string(),
                artist: "Nature Sounds".to_string(),
                duration_label: "4:20".to_string(),
                media_url: "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-2.mp3"
                    .to_string(),
                cover_art_url: "https://images.unsplash.com/photo-1470225620780-dba8ba36b745?auto=format&fit=crop&q=80&w=300&h=300".to_string(),
            },
            Track {
                id: 3,
                title: "Mountain Echo".to_string(),
                artist: "Wilderness".to_string(),
                duration_label: "3:55".to_string(),
                media_url: "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-3.mp3"
                    .to_string(),
                cover_art_url: "https://images.unsplash.com/photo-1493225457124-a3eb161ffa5f?auto=format&fit=crop&q=80&w=300&h=300".to_string(),
            },
        ];
        Self { tracks }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }
}
