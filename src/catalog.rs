//! # Catalog Module
//!
//! The fixed, built-in collection of songs. The catalog is constructed once at
//! start-up with [`Catalog::builtin`] and handed to every route by reference;
//! nothing mutates it afterwards.
//!
//! Song identity lives here: saved songs and the `play=<id>` hand-off both
//! refer back to catalog ids.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Mood tag used to filter the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Chill,
    Workout,
    Party,
    Focus,
}

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Chill, Mood::Workout, Mood::Party, Mood::Focus];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Chill => "chill",
            Mood::Workout => "workout",
            Mood::Party => "party",
            Mood::Focus => "focus",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Mood::ALL
            .into_iter()
            .find(|mood| mood.as_str() == wanted)
            .ok_or_else(|| anyhow::anyhow!("Unknown mood '{s}'. Use one of: chill, workout, party, focus"))
    }
}

/// A catalog entry. Immutable once the catalog is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: u32,
    pub title: String,
    pub artist: String,
    pub mood: Mood,
    /// Media locator handed to the playback engine.
    pub url: String,
    /// Track length in seconds.
    pub length: u32,
}

impl Song {
    /// Length formatted as `m:ss`.
    #[must_use]
    pub fn duration_label(&self) -> String {
        format!("{}:{:02}", self.length / 60, self.length % 60)
    }
}

/// Read-only song collection.
#[derive(Debug, Clone)]
pub struct Catalog {
    songs: Vec<Song>,
}

impl Catalog {
    /// Build a catalog from an explicit song list.
    ///
    /// Used by tests and benchmarks; the application uses [`Catalog::builtin`].
    #[must_use]
    pub fn new(songs: Vec<Song>) -> Self {
        Self { songs }
    }

    /// The songs shipped with moodtune.
    #[must_use]
    pub fn builtin() -> Self {
        let entry = |id: u32, title: &str, artist: &str, mood: Mood, length: u32| Song {
            id,
            title: title.to_string(),
            artist: artist.to_string(),
            mood,
            url: format!("https://www.soundhelix.com/examples/mp3/SoundHelix-Song-{id}.mp3"),
            length,
        };

        Self::new(vec![
            entry(1, "Sunset Drift", "Lo-Fi Lanterns", Mood::Chill, 372),
            entry(2, "Morning Steam", "Cafe Static", Mood::Chill, 425),
            entry(3, "Iron Pulse", "Redline Collective", Mood::Workout, 344),
            entry(4, "Sprint Cycle", "Tempo Engine", Mood::Workout, 302),
            entry(5, "Neon Confetti", "Glow District", Mood::Party, 355),
            entry(6, "After Hours", "The Night Shift", Mood::Party, 383),
            entry(7, "Deep Work", "Quiet Circuit", Mood::Focus, 422),
            entry(8, "Paper Lanterns", "Ambient Atlas", Mood::Focus, 305),
        ])
    }

    #[must_use]
    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// Look a song up by its stable id.
    #[must_use]
    pub fn find(&self, id: u32) -> Option<&Song> {
        self.songs.iter().find(|song| song.id == id)
    }

    /// Songs whose mood equals `mood`, in catalog order.
    ///
    /// The comparison is on the lowercase mood name, so a stored preference
    /// that names no known mood simply matches nothing.
    #[must_use]
    pub fn by_mood(&self, mood: &str) -> Vec<Song> {
        let wanted = mood.trim().to_lowercase();
        self.songs
            .iter()
            .filter(|song| song.mood.as_str() == wanted)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_ids_are_unique() {
        let catalog = Catalog::builtin();
        let ids: HashSet<u32> = catalog.songs().iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), catalog.len());
    }

    #[test]
    fn test_every_mood_has_songs() {
        let catalog = Catalog::builtin();
        for mood in Mood::ALL {
            assert!(!catalog.by_mood(mood.as_str()).is_empty(), "no songs for {mood}");
        }
    }

    #[test]
    fn test_by_mood_preserves_catalog_order() {
        let catalog = Catalog::builtin();
        let ids: Vec<u32> = catalog.by_mood("party").iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![5, 6]);
    }

    #[test]
    fn test_by_mood_unknown_is_empty() {
        let catalog = Catalog::builtin();
        assert!(catalog.by_mood("polka").is_empty());
    }

    #[test]
    fn test_mood_parsing() {
        assert_eq!("Chill".parse::<Mood>().unwrap(), Mood::Chill);
        assert_eq!(" focus ".parse::<Mood>().unwrap(), Mood::Focus);
        assert!("jazz".parse::<Mood>().is_err());
    }

    #[test]
    fn test_song_serializes_with_lowercase_mood() {
        let song = Catalog::builtin().find(3).cloned().unwrap();
        let json = serde_json::to_value(&song).unwrap();
        assert_eq!(json["mood"], "workout");
        assert_eq!(json["length"], 344);
    }

    #[test]
    fn test_duration_label() {
        let song = Catalog::builtin().find(1).cloned().unwrap();
        assert_eq!(song.duration_label(), "6:12");
    }
}
