//! Catalog listing command.

use crate::catalog::Catalog;

/// Print the catalog in playback order
pub fn cmd_playlist(catalog: &Catalog, verbose: bool) -> anyhow::Result<()> {
    for line in playlist_lines(catalog, verbose) {
        println!("{}", line);
    }
    println!("{} tracks", catalog.len());
    Ok(())
}

/// One line per track, numbered from 1; verbose adds the media URL.
fn playlist_lines(catalog: &Catalog, verbose: bool) -> Vec<String> {
    catalog
        .tracks()
        .iter()
        .enumerate()
        .map(|(index, track)| {
            let mut line = format!(
                "{:>3}. {} - {} ({})",
                index + 1,
                track.title,
                track.artist,
                track.duration_label
            );
            if verbose {
                line.push_str(&format!("\n     {}", track.media_url));
            }
            line
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playlist_lines() {
        let lines = playlist_lines(&Catalog::builtin(), false);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "  1. Summer Breeze - Ambient Dreams (3:45)");
        assert_eq!(lines[2], "  3. Mountain Echo - Wilderness (3:55)");
    }

    #[test]
    fn test_playlist_lines_verbose() {
        let lines = playlist_lines(&Catalog::builtin(), true);
        assert!(lines[1].ends_with("SoundHelix-Song-2.mp3"));
    }
}
