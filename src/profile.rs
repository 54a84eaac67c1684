//! # Profile Route
//!
//! Lists saved songs and lets the user remove them, clear them all, or jump
//! to the suggestions route to play one.
//!
//! Every render re-reads the store. Removal filters a freshly loaded list,
//! never a copy captured by an earlier render, so consecutive removals cannot
//! resurrect each other's songs.

use anyhow::Result;
use log::info;

use crate::route::Route;
use crate::store::LocalStore;
use crate::view::{render_saved, ListEntry};

/// Shown when nothing is saved.
pub const EMPTY_PLACEHOLDER: &str = "No saved songs yet. Save some from your suggestions!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileView {
    Empty(&'static str),
    Songs(Vec<ListEntry>),
}

impl ProfileView {
    /// Song ids in display order.
    #[must_use]
    pub fn ids(&self) -> Vec<u32> {
        match self {
            ProfileView::Empty(_) => Vec::new(),
            ProfileView::Songs(entries) => entries.iter().map(|e| e.song_id).collect(),
        }
    }
}

pub struct ProfilePage<'a> {
    store: &'a LocalStore,
}

impl<'a> ProfilePage<'a> {
    #[must_use]
    pub fn new(store: &'a LocalStore) -> Self {
        Self { store }
    }

    /// "Name (email), mood: x" when preferences exist.
    #[must_use]
    pub fn header(&self) -> Option<String> {
        self.store
            .preferences()
            .map(|p| format!("{} ({}), mood: {}", p.name, p.email, p.mood))
    }

    #[must_use]
    pub fn render(&self) -> ProfileView {
        let saved = self.store.saved_songs();
        if saved.is_empty() {
            return ProfileView::Empty(EMPTY_PLACEHOLDER);
        }
        ProfileView::Songs(
            saved
                .iter()
                .enumerate()
                .map(|(i, song)| render_saved(song, i))
                .collect(),
        )
    }

    /// Drop `id` from the saved list and re-render.
    ///
    /// # Errors
    ///
    /// Returns an error if the filtered list could not be written.
    pub fn remove(&self, id: u32) -> Result<ProfileView> {
        let saved = self.store.saved_songs();
        let before = saved.len();
        let kept: Vec<_> = saved.into_iter().filter(|s| s.id() != id).collect();

        if kept.len() != before {
            self.store.set_saved_songs(&kept)?;
            info!("Removed song {id} from profile");
        }
        Ok(self.render())
    }

    /// Forget every saved song.
    ///
    /// # Errors
    ///
    /// Returns an error if the empty list could not be written.
    pub fn clear_all(&self) -> Result<ProfileView> {
        self.store.set_saved_songs(&[])?;
        info!("Cleared all saved songs");
        Ok(self.render())
    }

    /// Hand `id` to the suggestions route for playback.
    #[must_use]
    pub fn play(&self, id: u32) -> Route {
        Route::Suggestions { play: Some(id) }
    }
}
