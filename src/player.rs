//! # Player Module
//!
//! Track navigation over the displayed song list.
//!
//! ## Index Space
//!
//! `current` always indexes the list the user is looking at (the mood-filtered
//! list, or the whole catalog when no mood is stored). Catalog ids are only
//! used to find a song's position in that list, so next/previous wrap over
//! exactly the songs on screen.
//!
//! ## States
//!
//! ```text
//!            toggle / play_at            toggle
//!   Idle ─────────────────────▶ Playing ◀──────▶ Paused
//!                                  │  ▲
//!                     track ended  └──┘ next
//! ```
//!
//! A failed start leaves the track loaded and the player `Paused`.

use log::{debug, warn};

use crate::catalog::Song;
use crate::playback::PlaybackEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    /// Nothing loaded yet.
    Idle,
    Playing,
    Paused,
}

pub struct Player {
    engine: Box<dyn PlaybackEngine>,
    playlist: Vec<Song>,
    current: Option<usize>,
    state: PlayerState,
    now_playing: Option<String>,
}

impl Player {
    #[must_use]
    pub fn new(engine: Box<dyn PlaybackEngine>, playlist: Vec<Song>) -> Self {
        Self {
            engine,
            playlist,
            current: None,
            state: PlayerState::Idle,
            now_playing: None,
        }
    }

    #[must_use]
    pub fn playlist(&self) -> &[Song] {
        &self.playlist
    }

    #[must_use]
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    #[must_use]
    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// "Now Playing" line, once something has been loaded.
    #[must_use]
    pub fn now_playing(&self) -> Option<&str> {
        self.now_playing.as_deref()
    }

    #[must_use]
    pub fn engine(&self) -> &dyn PlaybackEngine {
        self.engine.as_ref()
    }

    /// Position of the song with `id` in the displayed list.
    #[must_use]
    pub fn position_of(&self, id: u32) -> Option<usize> {
        self.playlist.iter().position(|song| song.id == id)
    }

    /// Load and start the song at `idx`. Out-of-range indexes are ignored.
    pub fn play_at(&mut self, idx: usize) {
        let Some(song) = self.playlist.get(idx).cloned() else {
            debug!("Ignoring play request for index {idx}, list has {} songs", self.playlist.len());
            return;
        };

        self.current = Some(idx);
        self.start(&song);
    }

    /// Load and start `song` without moving `current`.
    ///
    /// Used for hand-offs to songs that are not in the displayed list.
    pub fn play_detached(&mut self, song: &Song) {
        self.start(song);
    }

    fn start(&mut self, song: &Song) {
        if let Err(e) = self.engine.load(&song.url) {
            warn!("Could not load '{}': {e:#}", song.title);
            return;
        }
        self.now_playing = Some(format!("{} - {}", song.title, song.artist));

        match self.engine.play() {
            Ok(()) => {
                debug!("Playing '{}' ({})", song.title, song.url);
                self.state = PlayerState::Playing;
            }
            Err(e) => {
                warn!("Playback of '{}' did not start: {e:#}", song.title);
                self.state = PlayerState::Paused;
            }
        }
    }

    /// Play/pause button.
    pub fn toggle(&mut self) {
        match self.state {
            PlayerState::Idle => self.play_at(self.current.unwrap_or(0)),
            PlayerState::Playing => match self.engine.pause() {
                Ok(()) => self.state = PlayerState::Paused,
                Err(e) => warn!("Could not pause: {e:#}"),
            },
            PlayerState::Paused => match self.engine.play() {
                Ok(()) => self.state = PlayerState::Playing,
                Err(e) => warn!("Could not resume playback: {e:#}"),
            },
        }
    }

    /// Move `delta` tracks through the displayed list, wrapping at both ends.
    ///
    /// With no track selected yet, both directions select the first track.
    pub fn change_track(&mut self, delta: isize) {
        let len = self.playlist.len();
        if len == 0 {
            return;
        }

        let next = match self.current {
            None => 0,
            Some(idx) => wrap(idx, delta, len),
        };
        self.play_at(next);
    }

    pub fn next(&mut self) {
        self.change_track(1);
    }

    pub fn prev(&mut self) {
        self.change_track(-1);
    }

    /// Called when the engine reports the end of a track.
    pub fn on_ended(&mut self) {
        debug!("Track ended, advancing");
        self.next();
    }

    /// Poll the engine and auto-advance if the track finished.
    ///
    /// Returns true when an advance happened.
    pub fn poll_ended(&mut self) -> bool {
        if self.state == PlayerState::Playing && self.engine.has_ended() {
            self.on_ended();
            return true;
        }
        false
    }

    pub fn set_volume(&mut self, volume: u8) {
        if let Err(e) = self.engine.set_volume(volume.min(100)) {
            warn!("Could not change volume: {e:#}");
        }
    }
}

fn wrap(idx: usize, delta: isize, len: usize) -> usize {
    // `len` is a Vec length, so it fits in isize.
    (idx as isize + delta).rem_euclid(len as isize) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::playback::SilentEngine;

    fn player_with(ids: &[u32]) -> Player {
        let catalog = Catalog::builtin();
        let songs = ids.iter().map(|id| catalog.find(*id).cloned().unwrap()).collect();
        Player::new(Box::new(SilentEngine::new(80)), songs)
    }

    #[test]
    fn test_starts_idle() {
        let player = player_with(&[1, 2, 3]);
        assert_eq!(player.state(), PlayerState::Idle);
        assert_eq!(player.current(), None);
        assert!(player.engine().source().is_none());
    }

    #[test]
    fn test_next_from_unset_selects_first() {
        let mut player = player_with(&[1, 2, 3]);
        player.change_track(1);
        assert_eq!(player.current(), Some(0));
        assert_eq!(player.state(), PlayerState::Playing);
    }

    #[test]
    fn test_prev_from_unset_selects_first() {
        let mut player = player_with(&[1, 2, 3]);
        player.change_track(-1);
        assert_eq!(player.current(), Some(0));
    }

    #[test]
    fn test_next_wraps_from_last_to_first() {
        let mut player = player_with(&[1, 2, 3]);
        player.play_at(2);
        player.change_track(1);
        assert_eq!(player.current(), Some(0));
    }

    #[test]
    fn test_prev_wraps_from_first_to_last() {
        let mut player = player_with(&[1, 2, 3]);
        player.play_at(0);
        player.change_track(-1);
        assert_eq!(player.current(), Some(2));
    }

    #[test]
    fn test_wrap_uses_displayed_list_length() {
        // Ids 7 and 8 sit at the end of the catalog; navigation must stay
        // inside the two displayed songs.
        let mut player = player_with(&[7, 8]);
        player.play_at(1);
        player.next();
        assert_eq!(player.current(), Some(0));
        assert_eq!(player.engine().source(), Some(player.playlist()[0].url.clone()));
    }

    #[test]
    fn test_empty_list_navigation_is_noop() {
        let mut player = player_with(&[]);
        player.next();
        player.toggle();
        assert_eq!(player.current(), None);
        assert_eq!(player.state(), PlayerState::Idle);
    }

    #[test]
    fn test_out_of_bounds_play_is_ignored() {
        let mut player = player_with(&[1, 2]);
        player.play_at(5);
        assert_eq!(player.current(), None);
        assert_eq!(player.state(), PlayerState::Idle);
    }

    #[test]
    fn test_play_updates_now_playing_and_source() {
        let mut player = player_with(&[5, 6]);
        player.play_at(1);
        assert_eq!(player.now_playing(), Some("After Hours - The Night Shift"));
        assert_eq!(
            player.engine().source().as_deref(),
            Some("https://www.soundhelix.com/examples/mp3/SoundHelix-Song-6.mp3")
        );
    }

    #[test]
    fn test_toggle_cycle() {
        let mut player = player_with(&[1, 2]);
        player.toggle();
        assert_eq!(player.state(), PlayerState::Playing);
        assert_eq!(player.current(), Some(0));
        player.toggle();
        assert_eq!(player.state(), PlayerState::Paused);
        player.toggle();
        assert_eq!(player.state(), PlayerState::Playing);
    }

    #[test]
    fn test_failed_start_is_swallowed() {
        let catalog = Catalog::builtin();
        let mut player = Player::new(
            Box::new(SilentEngine::refusing_play()),
            catalog.songs().to_vec(),
        );
        player.play_at(0);
        assert_eq!(player.current(), Some(0));
        assert_eq!(player.state(), PlayerState::Paused);
        assert!(player.engine().source().is_some());
    }

    #[test]
    fn test_volume_does_not_change_state() {
        let mut player = player_with(&[1]);
        player.set_volume(25);
        assert_eq!(player.engine().volume(), 25);
        assert_eq!(player.state(), PlayerState::Idle);
    }

    #[test]
    fn test_track_end_advances() {
        let catalog = Catalog::builtin();
        let engine = SilentEngine::new(80);
        let mut player = Player::new(Box::new(engine.clone()), catalog.by_mood("chill"));
        player.play_at(1);

        assert!(!player.poll_ended());
        engine.finish_track();
        assert!(player.poll_ended());
        assert_eq!(player.current(), Some(0));
        assert!(engine.is_playing());
    }

    #[test]
    fn test_paused_track_does_not_advance() {
        let engine = SilentEngine::new(80);
        let mut player = Player::new(Box::new(engine.clone()), Catalog::builtin().by_mood("focus"));
        player.play_at(0);
        player.toggle();
        engine.finish_track();
        assert!(!player.poll_ended());
        assert_eq!(player.current(), Some(0));
    }

    #[test]
    fn test_play_detached_keeps_index() {
        let catalog = Catalog::builtin();
        let mut player = player_with(&[1, 2]);
        player.play_at(1);
        player.play_detached(catalog.find(8).unwrap());
        assert_eq!(player.current(), Some(1));
        assert_eq!(player.now_playing(), Some("Paper Lanterns - Ambient Atlas"));
    }
}
