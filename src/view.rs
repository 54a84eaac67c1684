//! Render descriptions for song lists.
//!
//! Controllers describe what a list row shows and which actions it offers;
//! the front end decides how to draw it and binds the actions once.

use std::fmt;

use crate::catalog::Song;
use crate::store::SavedSong;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryAction {
    Play,
    Save,
    Remove,
}

impl EntryAction {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            EntryAction::Play => "play",
            EntryAction::Save => "save",
            EntryAction::Remove => "remove",
        }
    }
}

/// One row of a song list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    /// 1-based position in the list, as typed by the user.
    pub position: usize,
    pub song_id: u32,
    pub title: String,
    pub subtitle: String,
    pub actions: Vec<EntryAction>,
}

impl fmt::Display for ListEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let actions: Vec<&str> = self.actions.iter().map(|a| a.label()).collect();
        write!(
            f,
            "{:>2}. {}\n    {}  [{}]",
            self.position,
            self.title,
            self.subtitle,
            actions.join(" | ")
        )
    }
}

/// Row for a suggestions list song at zero-based `index`.
#[must_use]
pub fn render_song(song: &Song, index: usize) -> ListEntry {
    ListEntry {
        position: index + 1,
        song_id: song.id,
        title: song.title.clone(),
        subtitle: format!("{} · {} · {}", song.artist, song.mood, song.duration_label()),
        actions: vec![EntryAction::Play, EntryAction::Save],
    }
}

/// Row for a saved song at zero-based `index`.
#[must_use]
pub fn render_saved(saved: &SavedSong, index: usize) -> ListEntry {
    ListEntry {
        position: index + 1,
        song_id: saved.song.id,
        title: saved.song.title.clone(),
        subtitle: format!(
            "{} · saved {}",
            saved.song.artist,
            saved.saved_at.format("%Y-%m-%d %H:%M")
        ),
        actions: vec![EntryAction::Play, EntryAction::Remove],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_render_song() {
        let song = Catalog::builtin().find(4).cloned().unwrap();
        let entry = render_song(&song, 0);
        assert_eq!(entry.position, 1);
        assert_eq!(entry.song_id, 4);
        assert_eq!(entry.title, "Sprint Cycle");
        assert_eq!(entry.subtitle, "Tempo Engine · workout · 5:02");
        assert_eq!(entry.actions, vec![EntryAction::Play, EntryAction::Save]);
    }

    #[test]
    fn test_render_saved() {
        let song = Catalog::builtin().find(7).cloned().unwrap();
        let saved = SavedSong::new(&song, Utc.with_ymd_and_hms(2024, 2, 3, 4, 5, 6).unwrap());
        let entry = render_saved(&saved, 2);
        assert_eq!(entry.position, 3);
        assert_eq!(entry.subtitle, "Quiet Circuit · saved 2024-02-03 04:05");
        assert_eq!(entry.actions, vec![EntryAction::Play, EntryAction::Remove]);
    }

    #[test]
    fn test_display_lists_actions() {
        let song = Catalog::builtin().find(1).cloned().unwrap();
        let text = render_song(&song, 0).to_string();
        assert!(text.contains(" 1. Sunset Drift"));
        assert!(text.contains("[play | save]"));
    }
}
