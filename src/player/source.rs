//! Media fetching for the decoder thread.
//!
//! Catalog URLs may point at a web server or at the local filesystem:
//! - `http://` and `https://` are downloaded with a blocking HTTP client
//! - `file://` URLs and bare paths are read from disk
//!
//! The whole file is buffered so the decoder can seek freely and the
//! track can be reopened after it ends without another download.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;

use super::PlayerError;

/// How long a single media download may take.
const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Filesystem path for a local media URL, `None` for web URLs.
///
/// `file://` URLs are percent-decoded; anything that does not parse as an
/// absolute URL is taken as a plain path.
pub fn local_path(url: &str) -> Option<PathBuf> {
    match Url::parse(url) {
        Ok(parsed) if parsed.scheme() == "file" => parsed.to_file_path().ok(),
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => None,
        _ => Some(PathBuf::from(url)),
    }
}

/// Downloads or reads media bytes.
pub struct MediaFetcher {
    http_client: Option<reqwest::blocking::Client>,
}

impl MediaFetcher {
    pub fn new() -> Self {
        let http_client = reqwest::blocking::Client::builder()
            .user_agent(concat!("MusicDeck/", env!("CARGO_PKG_VERSION")))
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| tracing::warn!("HTTP client unavailable, remote media disabled: {}", e))
            .ok();

        Self { http_client }
    }

    /// Fetch the full contents of `url`.
    pub fn fetch(&self, url: &str) -> Result<Arc<[u8]>, PlayerError> {
        match local_path(url) {
            Some(path) => std::fs::read(&path)
                .map(Arc::from)
                .map_err(|e| PlayerError::Fetch(format!("{}: {}", path.display(), e))),
            None => self.download(url),
        }
    }

    fn download(&self, url: &str) -> Result<Arc<[u8]>, PlayerError> {
        let client = self
            .http_client
            .as_ref()
            .ok_or_else(|| PlayerError::Fetch(format!("{}: no HTTP client", url)))?;

        tracing::debug!("Downloading {}", url);
        let response = client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| PlayerError::Fetch(format!("{}: {}", url, e)))?;

        let bytes = response
            .bytes()
            .map_err(|e| PlayerError::Fetch(format!("{}: {}", url, e)))?;

        tracing::debug!("Downloaded {} bytes from {}", bytes.len(), url);
        Ok(Arc::from(bytes.as_ref()))
    }
}

/// File extension of the URL's last path segment, lowercased.
///
/// Query strings and fragments are ignored.
pub fn extension_hint(url: &str) -> Option<String> {
    let ext = match local_path(url) {
        Some(path) => path.extension()?.to_str()?.to_string(),
        None => {
            let parsed = Url::parse(url).ok()?;
            let file_name = parsed.path_segments()?.last()?;
            let (stem, ext) = file_name.rsplit_once('.')?;
            if stem.is_empty() {
                return None;
            }
            ext.to_string()
        }
    };
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_local_path() {
        assert_eq!(local_path("https://example.com/a.mp3"), None);
        assert_eq!(local_path("http://example.com/a.mp3"), None);
        assert_eq!(local_path("file:///music/a.flac"), Some(PathBuf::from("/music/a.flac")));
        assert_eq!(local_path("songs/a.ogg"), Some(PathBuf::from("songs/a.ogg")));
        assert_eq!(
            local_path("file:///music/My%20Song.wav"),
            Some(PathBuf::from("/music/My Song.wav"))
        );
    }

    #[test]
    fn test_extension_hint() {
        assert_eq!(
            extension_hint("https://www.soundhelix.com/examples/mp3/SoundHelix-Song-1.mp3"),
            Some("mp3".to_string())
        );
        assert_eq!(
            extension_hint("https://cdn.example.com/track.FLAC?token=abc#t=3"),
            Some("flac".to_string())
        );
        assert_eq!(extension_hint("https://example.com/stream"), None);
        assert_eq!(extension_hint("/music/.hidden"), None);
        assert_eq!(extension_hint("songs/a.OGG"), Some("ogg".to_string()));
        assert_eq!(
            extension_hint("file:///music/My%20Song.wav"),
            Some("wav".to_string())
        );
    }

    #[test]
    fn test_fetch_local_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"RIFF").unwrap();

        let fetcher = MediaFetcher::new();
        let bytes = fetcher.fetch(&file.path().to_string_lossy()).unwrap();
        assert_eq!(&bytes[..], b"RIFF");

        let url = format!("file://{}", file.path().display());
        assert_eq!(&fetcher.fetch(&url).unwrap()[..], b"RIFF");
    }

    #[test]
    fn test_fetch_file_url_with_space() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("My Song.wav");
        std::fs::write(&path, b"RIFF").unwrap();

        let url = Url::from_file_path(&path).unwrap();
        assert!(url.as_str().ends_with("My%20Song.wav"));

        let bytes = MediaFetcher::new().fetch(url.as_str()).unwrap();
        assert_eq!(&bytes[..], b"RIFF");
    }

    #[test]
    fn test_fetch_missing_file() {
        let err = MediaFetcher::new()
            .fetch("/nonexistent/song.mp3")
            .unwrap_err();
        assert!(matches!(err, PlayerError::Fetch(_)));
        assert!(err.to_string().contains("/nonexistent/song.mp3"));
    }
}
