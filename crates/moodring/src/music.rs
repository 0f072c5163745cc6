//! Mood-to-music recommendation lookup.

use moodproto::Recommendation;
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One candidate song in the library.
#[derive(Debug, Clone, Deserialize)]
pub struct Song {
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub url: String,
}

/// Errors loading a songs database file.
#[derive(Debug, Error)]
pub enum MusicLibraryError {
    #[error("failed to read songs database {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse songs database {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Static per-mood candidate sets, loaded once at startup.
///
/// Keys are normalized to lowercase so lookups are case-insensitive. Unknown
/// moods and empty pools fall back to `neutral`; when that pool is also
/// missing or empty the lookup yields `None` rather than failing.
#[derive(Debug)]
pub struct MusicLibrary {
    songs: HashMap<String, Vec<Song>>,
}

impl MusicLibrary {
    /// The built-in default library.
    pub fn builtin() -> Self {
        fn song(title: &str, artist: &str, url: &str) -> Song {
            Song {
                title: title.to_string(),
                artist: artist.to_string(),
                url: url.to_string(),
            }
        }

        let mut songs = HashMap::new();
        songs.insert(
            "happy".to_string(),
            vec![
                song("Happy", "Pharrell Williams", "spotify:track:..."),
                song("Good Vibrations", "The Beach Boys", "spotify:track:..."),
                song("Walking on Sunshine", "Katrina and the Waves", "spotify:track:..."),
            ],
        );
        songs.insert(
            "sad".to_string(),
            vec![
                song("Someone Like You", "Adele", "spotify:track:..."),
                song("The Night We Met", "Lord Huron", "spotify:track:..."),
                song("Skinny Love", "Bon Iver", "spotify:track:..."),
            ],
        );
        songs.insert(
            "angry".to_string(),
            vec![
                song("Break Stuff", "Limp Bizkit", "spotify:track:..."),
                song(
                    "Killing in the Name",
                    "Rage Against the Machine",
                    "spotify:track:...",
                ),
            ],
        );
        songs.insert(
            "neutral".to_string(),
            vec![
                song("Weightless", "Marconi Union", "spotify:track:..."),
                song("Clair de Lune", "Debussy", "spotify:track:..."),
            ],
        );
        songs.insert(
            "surprise".to_string(),
            vec![song(
                "Uptown Funk",
                "Mark Ronson ft. Bruno Mars",
                "spotify:track:...",
            )],
        );
        songs.insert(
            "fear".to_string(),
            vec![song("Breathe Me", "Sia", "spotify:track:...")],
        );
        songs.insert(
            "disgust".to_string(),
            vec![song("Toxic", "Britney Spears", "spotify:track:...")],
        );

        Self { songs }
    }

    /// Parse a library from JSON: `{ "<mood>": [ {title, artist, url}, ... ] }`.
    pub fn from_json(json: &str, path: &Path) -> Result<Self, MusicLibraryError> {
        let raw: HashMap<String, Vec<Song>> =
            serde_json::from_str(json).map_err(|e| MusicLibraryError::Parse {
                path: path.to_path_buf(),
                source: e,
            })?;

        let songs = raw
            .into_iter()
            .map(|(mood, songs)| (mood.to_lowercase(), songs))
            .collect();

        Ok(Self { songs })
    }

    /// Load a library from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, MusicLibraryError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| MusicLibraryError::FileRead {
                path: path.to_path_buf(),
                source: e,
            })?;
        Self::from_json(&contents, path)
    }

    /// Number of moods with at least one candidate.
    pub fn mood_count(&self) -> usize {
        self.songs.values().filter(|pool| !pool.is_empty()).count()
    }

    /// Pick a recommendation for `mood`, uniformly at random from its pool.
    ///
    /// The returned `mood` field echoes the query (lowercased), even when the
    /// song came from the `neutral` fallback pool.
    pub fn recommend(&self, mood: &str) -> Option<Recommendation> {
        let mood = mood.to_lowercase();

        let pool = self
            .songs
            .get(&mood)
            .filter(|pool| !pool.is_empty())
            .or_else(|| self.songs.get("neutral").filter(|pool| !pool.is_empty()))?;

        let song = pool.choose(&mut rand::thread_rng())?;

        Some(Recommendation {
            title: song.title.clone(),
            artist: song.artist.clone(),
            url: song.url.clone(),
            mood,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn titles(library: &MusicLibrary, mood: &str) -> Vec<String> {
        library.songs[mood].iter().map(|s| s.title.clone()).collect()
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let library = MusicLibrary::builtin();
        let happy_titles = titles(&library, "happy");

        for _ in 0..10 {
            let upper = library.recommend("HAPPY").unwrap();
            let lower = library.recommend("happy").unwrap();
            assert!(happy_titles.contains(&upper.title));
            assert!(happy_titles.contains(&lower.title));
        }
    }

    #[test]
    fn test_unknown_mood_falls_back_to_neutral() {
        let library = MusicLibrary::builtin();
        let neutral_titles = titles(&library, "neutral");

        for _ in 0..10 {
            let rec = library.recommend("unknown-mood").unwrap();
            assert!(neutral_titles.contains(&rec.title));
            // The echo is the queried mood, not the fallback pool
            assert_eq!(rec.mood, "unknown-mood");
        }
    }

    #[test]
    fn test_empty_pool_falls_back_to_neutral() {
        let json = r#"{"happy": [], "neutral": [{"title": "Weightless", "artist": "Marconi Union"}]}"#;
        let library = MusicLibrary::from_json(json, Path::new("test.json")).unwrap();

        let rec = library.recommend("happy").unwrap();
        assert_eq!(rec.title, "Weightless");
        assert_eq!(rec.mood, "happy");
    }

    #[test]
    fn test_no_candidates_anywhere_is_none() {
        let library = MusicLibrary::from_json(r#"{"happy": [], "neutral": []}"#, Path::new("test.json"))
            .unwrap();
        assert!(library.recommend("happy").is_none());

        let empty = MusicLibrary::from_json("{}", Path::new("test.json")).unwrap();
        assert!(empty.recommend("anything").is_none());
    }

    #[test]
    fn test_selection_covers_the_pool() {
        let library = MusicLibrary::builtin();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(library.recommend("happy").unwrap().title);
        }
        // Uniform selection over 3 candidates should hit all of them
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_from_file_normalizes_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"HAPPY": [{{"title": "Lovely Day", "artist": "Bill Withers", "url": ""}}]}}"#
        )
        .unwrap();

        let library = MusicLibrary::from_file(file.path()).unwrap();
        assert_eq!(library.recommend("happy").unwrap().title, "Lovely Day");
    }

    #[test]
    fn test_from_file_missing_is_an_error() {
        let err = MusicLibrary::from_file(Path::new("/nonexistent/songs.json")).unwrap_err();
        assert!(matches!(err, MusicLibraryError::FileRead { .. }));
    }

    #[test]
    fn test_bad_json_is_a_parse_error() {
        let err = MusicLibrary::from_json("not json", Path::new("test.json")).unwrap_err();
        assert!(matches!(err, MusicLibraryError::Parse { .. }));
    }
}
