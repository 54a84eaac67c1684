//! Mood-based song suggestions with a tiny player.
//!
//! Core modules:
//! - [`catalog`] - The built-in songs and their moods
//! - [`store`] - Local key-value persistence (preferences, saved songs)
//! - [`validate`] - Preference form validation
//! - [`player`] - Track navigation state machine
//! - [`playback`] - Playback engines (MPD via `mpc`, silent)
//!
//! Routes:
//! - [`preferences`] - Pre-fill, validate and save preferences
//! - [`suggestions`] - Mood-filtered list, player actions, saving songs
//! - [`profile`] - Saved songs: list, remove, clear, play via hand-off
//! - [`autoplay`] - `play=<id>` hand-off into the suggestions route
//! - [`tips`] - Listening tips fetched from a remote endpoint
//!
//! ### Supporting Modules
//!
//! - [`app`] - Route dispatch and the terminal front end
//! - [`route`] - Route identifiers and location parsing
//! - [`view`] - Render descriptions for list rows
//! - [`config`] - Data directory and runtime settings
//! - [`cli`] - Command-line interface definitions with clap
//! - [`completion`] - Shell completion generation
//!
//! ## Quick Start Example
//!
//! ```no_run
//! use moodtune::catalog::Catalog;
//! use moodtune::playback::SilentEngine;
//! use moodtune::store::LocalStore;
//! use moodtune::suggestions::{Action, SuggestionsPage};
//!
//! let catalog = Catalog::builtin();
//! let store = LocalStore::open_in_memory()?;
//! let mut page = SuggestionsPage::initialize(&catalog, &store, Box::new(SilentEngine::new(80)));
//!
//! page.handle(Action::Next)?;
//! page.handle(Action::Save(0))?;
//! println!("{}", page.now_playing());
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return `anyhow::Result`. Reads from the local store
//! never fail (they fall back to defaults); writes do, and callers report
//! them. Playback and tips failures degrade their own feature only.

pub mod app;
pub mod autoplay;
pub mod catalog;
pub mod cli;
pub mod completion;
pub mod config;
pub mod playback;
pub mod player;
pub mod preferences;
pub mod profile;
pub mod route;
pub mod store;
pub mod suggestions;
pub mod tips;
pub mod validate;
pub mod view;
