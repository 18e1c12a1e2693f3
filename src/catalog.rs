//! Song catalog loading and per-game track selection

use crate::error::{TriviaError, TriviaResult};
use crate::matcher::normalize;
use crate::types::Track;
use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use std::path::PathBuf;

/// Supplies the pool of playable tracks
#[async_trait]
pub trait CatalogLoader: Send + Sync {
    async fn load_tracks(&self) -> TriviaResult<Vec<Track>>;
}

/// Catalog backed by a JSON array of tracks on disk
#[derive(Debug, Clone)]
pub struct JsonCatalog {
    path: PathBuf,
}

impl JsonCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogLoader for JsonCatalog {
    async fn load_tracks(&self) -> TriviaResult<Vec<Track>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| TriviaError::Catalog(format!("{}: {}", self.path.display(), e)))?;

        let tracks: Vec<Track> = serde_json::from_str(&raw)
            .map_err(|e| TriviaError::Catalog(format!("{}: {}", self.path.display(), e)))?;

        let total = tracks.len();
        let tracks: Vec<Track> = tracks
            .into_iter()
            .filter_map(|mut track| {
                if track.preview_url.trim().is_empty() {
                    tracing::warn!("Skipping track without preview: {}", track.title);
                    return None;
                }
                if track.answer.trim().is_empty() {
                    track.answer = track.title.clone();
                }
                Some(track)
            })
            .collect();

        tracing::info!(
            "Loaded {} tracks from {} ({} skipped)",
            tracks.len(),
            self.path.display(),
            total - tracks.len()
        );
        Ok(tracks)
    }
}

/// Fixed in-memory catalog
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    tracks: Vec<Track>,
}

impl StaticCatalog {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }
}

#[async_trait]
impl CatalogLoader for StaticCatalog {
    async fn load_tracks(&self) -> TriviaResult<Vec<Track>> {
        Ok(self.tracks.clone())
    }
}

/// Pick `count` distinct tracks in random order
pub fn select_tracks(tracks: Vec<Track>, count: usize) -> TriviaResult<Vec<Track>> {
    select_tracks_with(tracks, count, &mut rand::rng())
}

/// Like [`select_tracks`] with a caller-supplied RNG
pub fn select_tracks_with<R: Rng + ?Sized>(
    tracks: Vec<Track>,
    count: usize,
    rng: &mut R,
) -> TriviaResult<Vec<Track>> {
    let mut seen = HashSet::new();
    let mut distinct: Vec<Track> = tracks
        .into_iter()
        .filter(|t| seen.insert((normalize(&t.title), normalize(&t.artist))))
        .collect();

    if distinct.len() < count {
        return Err(TriviaError::InsufficientCatalog {
            available: distinct.len(),
            required: count,
        });
    }

    distinct.shuffle(rng);
    distinct.truncate(count);
    Ok(distinct)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Write;

    fn tracks(n: usize) -> Vec<Track> {
        (0..n)
            .map(|i| Track::new(&format!("Song {i}"), "Band", &format!("https://cdn/{i}.mp3")))
            .collect()
    }

    #[test]
    fn test_select_distinct_tracks() {
        let mut rng = StdRng::seed_from_u64(7);
        let selected = select_tracks_with(tracks(12), 10, &mut rng).unwrap();

        assert_eq!(selected.len(), 10);
        let titles: HashSet<_> = selected.iter().map(|t| t.title.clone()).collect();
        assert_eq!(titles.len(), 10);
    }

    #[test]
    fn test_insufficient_catalog() {
        let result = select_tracks(tracks(5), 10);
        assert_eq!(
            result.unwrap_err(),
            TriviaError::InsufficientCatalog {
                available: 5,
                required: 10
            }
        );
    }

    #[test]
    fn test_duplicates_do_not_count() {
        let mut pool = tracks(9);
        pool.push(Track::new("SONG 0", "band", "https://cdn/dupe.mp3"));

        let result = select_tracks(pool, 10);
        assert!(matches!(
            result,
            Err(TriviaError::InsufficientCatalog { available: 9, .. })
        ));
    }

    #[tokio::test]
    async fn test_json_catalog_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"title": "Yellow Submarine", "artist": "The Beatles", "answer": "yellow submarine", "preview_url": "https://cdn/ys.mp3"}},
                {{"title": "Hey Jude", "artist": "The Beatles", "preview_url": "https://cdn/hj.mp3"}},
                {{"title": "No Clip", "artist": "Nobody", "preview_url": ""}}
            ]"#
        )
        .unwrap();

        let catalog = JsonCatalog::new(file.path());
        let tracks = catalog.load_tracks().await.unwrap();

        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].answer, "yellow submarine");
        assert_eq!(tracks[1].answer, "Hey Jude");
    }

    #[tokio::test]
    async fn test_json_catalog_missing_file() {
        let catalog = JsonCatalog::new("/nonexistent/songs.json");
        let result = catalog.load_tracks().await;
        assert!(matches!(result, Err(TriviaError::Catalog(_))));
    }

    #[tokio::test]
    async fn test_json_catalog_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let result = JsonCatalog::new(file.path()).load_tracks().await;
        assert!(matches!(result, Err(TriviaError::Catalog(_))));
    }
}
