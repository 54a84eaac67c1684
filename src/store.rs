//! # Local Store Module
//!
//! Key-value persistence for the two records moodtune keeps between runs:
//! the user's preferences and the list of saved songs.
//!
//! Values are serialized to JSON and written into a single SQLite table, so the
//! store behaves like browser local storage: string keys, string values, last
//! write wins.
//!
//! ## Schema
//!
//! ```sql
//! CREATE TABLE kv (key TEXT PRIMARY KEY, value TEXT NOT NULL)
//! ```
//!
//! ## Failure Semantics
//!
//! - Reads never fail: a missing key or a malformed value yields the caller's
//!   fallback (malformed values are logged).
//! - Writes return errors. A failed save means the user's change did not
//!   happen, so callers must report it.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use rusqlite::{Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::catalog::Song;

/// Key holding the single [`UserPreferences`] record.
pub const PREFERENCES_KEY: &str = "user-preferences";

/// Key holding the ordered [`SavedSong`] list.
pub const SAVED_SONGS_KEY: &str = "saved-songs";

/// The one preferences record. Overwritten on every successful submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub name: String,
    pub email: String,
    pub mood: String,
    #[serde(rename = "savedAt")]
    pub saved_at: DateTime<Utc>,
}

/// A catalog song the user bookmarked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSong {
    #[serde(flatten)]
    pub song: Song,
    #[serde(rename = "savedAt")]
    pub saved_at: DateTime<Utc>,
}

impl SavedSong {
    #[must_use]
    pub fn new(song: &Song, saved_at: DateTime<Utc>) -> Self {
        Self {
            song: song.clone(),
            saved_at,
        }
    }

    #[must_use]
    pub fn id(&self) -> u32 {
        self.song.id
    }
}

/// SQLite-backed key-value store.
#[derive(Debug)]
pub struct LocalStore {
    conn: Connection,
}

impl LocalStore {
    /// Open (or create) the store file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or the table cannot be
    /// created.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open local store at {}", path.display()))?;
        Self::with_connection(conn)
    }

    /// Store that lives only as long as the value. Used by tests.
    ///
    /// # Errors
    ///
    /// Returns an error if SQLite cannot create the in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory store")?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create key-value table")?;
        Ok(Self { conn })
    }

    /// Serialize `value` and store it under `key`, replacing any prior value.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the write is rejected
    /// (disk full, read-only file, locked database).
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)
            .with_context(|| format!("Failed to serialize value for '{key}'"))?;
        self.conn
            .execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                (key, &json),
            )
            .with_context(|| format!("Failed to write '{key}' to local store"))?;
        debug!("Stored {} bytes under '{key}'", json.len());
        Ok(())
    }

    /// Load the value stored under `key`, or `fallback` when it is missing or
    /// cannot be read back.
    pub fn load<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        let raw = match self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()
        {
            Ok(Some(raw)) => raw,
            Ok(None) => return fallback,
            Err(e) => {
                warn!("Failed to read '{key}' from local store: {e}");
                return fallback;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("Ignoring malformed value stored under '{key}': {e}");
                fallback
            }
        }
    }

    /// Delete `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete is rejected by SQLite.
    pub fn remove(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", [key])
            .with_context(|| format!("Failed to remove '{key}' from local store"))?;
        Ok(())
    }

    #[must_use]
    pub fn preferences(&self) -> Option<UserPreferences> {
        self.load(PREFERENCES_KEY, None)
    }

    /// # Errors
    ///
    /// See [`LocalStore::save`].
    pub fn set_preferences(&self, prefs: &UserPreferences) -> Result<()> {
        self.save(PREFERENCES_KEY, prefs)
    }

    /// Saved songs in the order they were saved.
    #[must_use]
    pub fn saved_songs(&self) -> Vec<SavedSong> {
        self.load(SAVED_SONGS_KEY, Vec::new())
    }

    /// # Errors
    ///
    /// See [`LocalStore::save`].
    pub fn set_saved_songs(&self, songs: &[SavedSong]) -> Result<()> {
        self.save(SAVED_SONGS_KEY, songs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use chrono::TimeZone;

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_missing_key_returns_fallback() {
        let store = LocalStore::open_in_memory().unwrap();
        assert_eq!(store.load("nothing-here", 42u32), 42);
        assert!(store.preferences().is_none());
        assert!(store.saved_songs().is_empty());
    }

    #[test]
    fn test_save_overwrites_previous_value() {
        let store = LocalStore::open_in_memory().unwrap();
        store.save("counter", &1u32).unwrap();
        store.save("counter", &2u32).unwrap();
        assert_eq!(store.load("counter", 0u32), 2);
    }

    #[test]
    fn test_malformed_value_returns_fallback() {
        let store = LocalStore::open_in_memory().unwrap();
        store.save(SAVED_SONGS_KEY, "definitely not a list").unwrap();
        assert!(store.saved_songs().is_empty());
    }

    #[test]
    fn test_preferences_round_trip() {
        let store = LocalStore::open_in_memory().unwrap();
        let prefs = UserPreferences {
            name: "Ada".to_string(),
            email: "ada@example.org".to_string(),
            mood: "focus".to_string(),
            saved_at: timestamp(),
        };
        store.set_preferences(&prefs).unwrap();
        assert_eq!(store.preferences(), Some(prefs));
    }

    #[test]
    fn test_saved_song_json_shape() {
        let song = Catalog::builtin().find(2).cloned().unwrap();
        let saved = SavedSong::new(&song, timestamp());
        let json = serde_json::to_value(&saved).unwrap();

        assert_eq!(json["id"], 2);
        assert_eq!(json["title"], "Morning Steam");
        assert_eq!(json["mood"], "chill");
        assert_eq!(json["savedAt"], "2024-05-01T12:30:00Z");
    }

    #[test]
    fn test_saved_songs_keep_insertion_order() {
        let store = LocalStore::open_in_memory().unwrap();
        let catalog = Catalog::builtin();
        let list: Vec<SavedSong> = [7, 1, 4]
            .iter()
            .map(|id| SavedSong::new(catalog.find(*id).unwrap(), timestamp()))
            .collect();
        store.set_saved_songs(&list).unwrap();

        let ids: Vec<u32> = store.saved_songs().iter().map(SavedSong::id).collect();
        assert_eq!(ids, vec![7, 1, 4]);
    }

    #[test]
    fn test_remove_key() {
        let store = LocalStore::open_in_memory().unwrap();
        store.save("temp", &true).unwrap();
        store.remove("temp").unwrap();
        store.remove("temp").unwrap();
        assert!(!store.load("temp", false));
    }
}
