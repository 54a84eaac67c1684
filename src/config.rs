//! # Configuration Module
//!
//! Data directory discovery and runtime settings.
//!
//! ## Data Storage
//!
//! moodtune keeps its local store in the platform-standard data directory:
//! - Linux: `~/.local/share/moodtune/store.db`
//! - macOS: `~/Library/Application Support/moodtune/store.db`
//! - Windows: `%APPDATA%\moodtune\store.db`
//!
//! ## Runtime Settings
//!
//! [`RuntimeConfig`] is assembled from command-line options, each of which
//! also reads an environment variable (see `cli`):
//! - `MOODTUNE_DATA_DIR`: directory holding `store.db`
//! - `MOODTUNE_TIPS_URL`: tips endpoint
//! - `MOODTUNE_VOLUME`: start-up volume, 0-100
//! - `MOODTUNE_NO_AUDIO`: use the silent engine instead of MPD

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::tips::DEFAULT_TIPS_URL;

/// File name of the local store inside the data directory.
pub const STORE_FILE: &str = "store.db";

pub const DEFAULT_VOLUME: u8 = 80;

/// Returns the platform-appropriate data directory for moodtune, creating it
/// if needed.
///
/// # Errors
///
/// Returns an error if the system data directory cannot be determined or the
/// `moodtune` subdirectory cannot be created.
pub fn get_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().ok_or_else(|| {
        anyhow::anyhow!(
            "Could not determine system data directory. Use --data-dir or MOODTUNE_DATA_DIR to pick one."
        )
    })?;

    let app_dir = data_dir.join("moodtune");
    ensure_dir(&app_dir)?;
    Ok(app_dir)
}

/// Returns the default local store path.
///
/// # Errors
///
/// See [`get_data_dir`].
pub fn get_store_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join(STORE_FILE))
}

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| {
        format!(
            "Failed to create moodtune data directory at {}. Please check file permissions.",
            dir.display()
        )
    })
}

/// Configuration for runtime behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Path to the local store file
    pub store_path: PathBuf,
    /// Where listening tips are fetched from
    pub tips_url: String,
    /// Volume applied when the suggestions route starts
    pub volume: u8,
    /// Skip MPD and use the silent engine
    pub no_audio: bool,
}

impl RuntimeConfig {
    /// Configuration using the platform data directory and defaults.
    ///
    /// # Errors
    ///
    /// See [`get_data_dir`].
    pub fn new() -> Result<Self> {
        Ok(Self::with_store_path(get_store_path()?))
    }

    /// Configuration with an explicit store path and defaults otherwise.
    #[must_use]
    pub fn with_store_path(store_path: PathBuf) -> Self {
        Self {
            store_path,
            tips_url: DEFAULT_TIPS_URL.to_string(),
            volume: DEFAULT_VOLUME,
            no_audio: false,
        }
    }

    /// Configuration for a store kept in `data_dir`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn in_dir(data_dir: &Path) -> Result<Self> {
        ensure_dir(data_dir)?;
        Ok(Self::with_store_path(data_dir.join(STORE_FILE)))
    }
}
