//! # Suggestions Route
//!
//! Filters the catalog by the stored mood, describes the resulting list, runs
//! the player over it and saves songs to the profile.
//!
//! ## Displayed List
//!
//! - Stored preferences with a mood: catalog songs with that mood, catalog
//!   order. A mood nothing matches gives an empty list.
//! - No preferences (or an empty mood): the whole catalog.
//!
//! ## Actions
//!
//! Every interaction arrives as an [`Action`] and goes through
//! [`SuggestionsPage::handle`]. The auto-play hand-off uses the same path, so
//! the playback engine only ever has one owner.

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::catalog::{Catalog, Song};
use crate::player::Player;
use crate::playback::PlaybackEngine;
use crate::store::{LocalStore, SavedSong, UserPreferences};
use crate::view::{render_song, ListEntry};

/// Something the user (or the hand-off) asked the route to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Play the displayed song at this zero-based index.
    Play(usize),
    /// Save the displayed song at this zero-based index.
    Save(usize),
    TogglePlay,
    Next,
    Prev,
    Volume(u8),
    /// The engine finished the current track.
    TrackEnded,
    /// Hand-off request for a catalog id.
    AutoPlay(u32),
}

/// What an action changed, for the front end to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Player state may have changed; redraw "Now Playing".
    Player,
    Saved(Song),
    AlreadySaved(Song),
    /// The action referred to nothing (bad index, unknown id).
    Ignored,
}

/// Songs shown for these preferences.
#[must_use]
pub fn displayed_songs(catalog: &Catalog, prefs: Option<&UserPreferences>) -> Vec<Song> {
    match prefs {
        Some(prefs) if !prefs.mood.trim().is_empty() => catalog.by_mood(&prefs.mood),
        _ => catalog.songs().to_vec(),
    }
}

/// Greeting above the list.
#[must_use]
pub fn greeting(prefs: Option<&UserPreferences>) -> String {
    match prefs {
        Some(prefs) if !prefs.mood.trim().is_empty() => {
            format!("Hi {}! Here are some {} tracks for you.", prefs.name, prefs.mood)
        }
        _ => "Showing all songs. Set your preferences to get mood-based picks.".to_string(),
    }
}

/// Append `song` to the saved list unless its id is already there.
///
/// Returns whether the list changed.
///
/// # Errors
///
/// Returns an error if the updated list could not be written.
pub fn save_song(store: &LocalStore, song: &Song, saved_at: DateTime<Utc>) -> Result<bool> {
    let mut saved = store.saved_songs();
    if saved.iter().any(|entry| entry.id() == song.id) {
        debug!("'{}' is already saved", song.title);
        return Ok(false);
    }

    saved.push(SavedSong::new(song, saved_at));
    store.set_saved_songs(&saved)?;
    info!("Saved '{}' to profile", song.title);
    Ok(true)
}

pub struct SuggestionsPage<'a> {
    catalog: &'a Catalog,
    store: &'a LocalStore,
    player: Player,
    greeting: String,
}

impl<'a> SuggestionsPage<'a> {
    /// Read preferences and build the displayed list.
    #[must_use]
    pub fn initialize(catalog: &'a Catalog, store: &'a LocalStore, engine: Box<dyn PlaybackEngine>) -> Self {
        let prefs = store.preferences();
        let songs = displayed_songs(catalog, prefs.as_ref());
        debug!("Suggestions list has {} of {} songs", songs.len(), catalog.len());

        Self {
            catalog,
            store,
            player: Player::new(engine, songs),
            greeting: greeting(prefs.as_ref()),
        }
    }

    #[must_use]
    pub fn greeting(&self) -> &str {
        &self.greeting
    }

    #[must_use]
    pub fn songs(&self) -> &[Song] {
        self.player.playlist()
    }

    #[must_use]
    pub fn entries(&self) -> Vec<ListEntry> {
        self.songs()
            .iter()
            .enumerate()
            .map(|(i, song)| render_song(song, i))
            .collect()
    }

    #[must_use]
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// "Now Playing" line.
    #[must_use]
    pub fn now_playing(&self) -> String {
        match self.player.now_playing() {
            Some(line) => format!("Now Playing: {line}"),
            None => "Now Playing: nothing yet".to_string(),
        }
    }

    /// Apply one action.
    ///
    /// # Errors
    ///
    /// Returns an error only when saving a song fails to write; playback
    /// problems are logged by the player and never surface here.
    pub fn handle(&mut self, action: Action) -> Result<Outcome> {
        match action {
            Action::Play(idx) => {
                if idx >= self.songs().len() {
                    return Ok(Outcome::Ignored);
                }
                self.player.play_at(idx);
                Ok(Outcome::Player)
            }
            Action::Save(idx) => {
                let Some(song) = self.songs().get(idx).cloned() else {
                    return Ok(Outcome::Ignored);
                };
                if save_song(self.store, &song, Utc::now())? {
                    Ok(Outcome::Saved(song))
                } else {
                    Ok(Outcome::AlreadySaved(song))
                }
            }
            Action::TogglePlay => {
                self.player.toggle();
                Ok(Outcome::Player)
            }
            Action::Next => {
                self.player.next();
                Ok(Outcome::Player)
            }
            Action::Prev => {
                self.player.prev();
                Ok(Outcome::Player)
            }
            Action::Volume(volume) => {
                self.player.set_volume(volume);
                Ok(Outcome::Player)
            }
            Action::TrackEnded => {
                self.player.on_ended();
                Ok(Outcome::Player)
            }
            Action::AutoPlay(id) => Ok(self.auto_play(id)),
        }
    }

    fn auto_play(&mut self, id: u32) -> Outcome {
        if let Some(idx) = self.player.position_of(id) {
            self.player.play_at(idx);
            return Outcome::Player;
        }
        match self.catalog.find(id) {
            Some(song) => {
                debug!("Song {id} is not in the displayed list, playing it directly");
                self.player.play_detached(song);
                Outcome::Player
            }
            None => {
                debug!("Ignoring hand-off for unknown song {id}");
                Outcome::Ignored
            }
        }
    }

    /// Poll the engine for a finished track and advance if so.
    pub fn poll_ended(&mut self) -> bool {
        self.player.poll_ended()
    }
}
