//! # Command-Line Interface Module
//!
//! Clap definitions for moodtune. Each page of the app is a subcommand:
//!
//! - `prefs`: show or submit your name, email and mood
//! - `suggest`: mood-filtered suggestions with a small player
//! - `profile`: saved songs
//! - `open`: jump to a location such as `suggestions?play=3`
//!
//! ## Examples
//!
//! ```bash
//! moodtune prefs --name Ada --email ada@example.org --mood focus
//! moodtune suggest --play 7
//! moodtune profile remove 7
//! ```

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

/// Main application arguments structure.
#[derive(Parser, Debug)]
#[command(name = "moodtune")]
#[command(about = "moodtune: mood-based song suggestions, a tiny player and your saved songs")]
#[command(version)]
pub struct Args {
    #[command(flatten)]
    pub global: GlobalOpts,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every route.
#[derive(ClapArgs, Debug, Clone)]
pub struct GlobalOpts {
    /// Directory holding the local store (defaults to the platform data dir)
    #[arg(long, global = true, env = "MOODTUNE_DATA_DIR", value_hint = clap::ValueHint::DirPath)]
    pub data_dir: Option<PathBuf>,

    /// Endpoint listening tips are fetched from
    #[arg(long, global = true, env = "MOODTUNE_TIPS_URL")]
    pub tips_url: Option<String>,

    /// Start-up volume, 0-100
    #[arg(long, global = true, env = "MOODTUNE_VOLUME", value_parser = clap::value_parser!(u8).range(0..=100))]
    pub volume: Option<u8>,

    /// Do not use MPD; track playback state silently
    #[arg(long, global = true, env = "MOODTUNE_NO_AUDIO")]
    pub no_audio: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show or submit your preferences
    ///
    /// Without any field, prints the form pre-filled from your stored
    /// preferences. With fields, replaces those fields in the pre-filled form,
    /// validates and saves it, then continues to your suggestions.
    Prefs {
        /// Your name (at least 2 characters)
        #[arg(long)]
        name: Option<String>,

        /// Your email address
        #[arg(long)]
        email: Option<String>,

        /// Mood to get suggestions for (chill, workout, party, focus)
        #[arg(long)]
        mood: Option<String>,

        /// Save without opening suggestions afterwards
        #[arg(long)]
        no_redirect: bool,
    },

    /// Browse and play suggestions for your mood
    ///
    /// Opens an interactive prompt. Type `help` for the available commands.
    Suggest {
        /// Start playing this catalog song id once the list is ready
        #[arg(long, value_hint = clap::ValueHint::Other)]
        play: Option<u32>,
    },

    /// Manage saved songs
    Profile {
        #[command(subcommand)]
        action: Option<ProfileAction>,
    },

    /// Open a location such as `profile` or `suggestions?play=3`
    Open {
        location: String,
    },

    /// List the built-in catalog
    Catalog,

    /// Generate shell completions
    ///
    /// Usage: moodtune completion bash > ~/.local/share/bash-completion/completions/moodtune
    Completion {
        shell: Shell,
    },

    /// List catalog song ids for completion (hidden command)
    #[command(hide = true)]
    CompleteSongs,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileAction {
    /// List saved songs (default)
    List,
    /// Remove a saved song by id
    Remove { id: u32 },
    /// Play a saved song on the suggestions page
    Play { id: u32 },
    /// Remove every saved song
    Clear,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_prefs_submit() {
        let args = Args::try_parse_from([
            "moodtune", "prefs", "--name", "Ada", "--email", "ada@example.org", "--mood", "focus",
        ])
        .unwrap();
        match args.command {
            Command::Prefs { name, mood, no_redirect, .. } => {
                assert_eq!(name.as_deref(), Some("Ada"));
                assert_eq!(mood.as_deref(), Some("focus"));
                assert!(!no_redirect);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_profile_remove_and_globals() {
        let args = Args::try_parse_from([
            "moodtune", "profile", "remove", "4", "--no-audio", "--volume", "30",
        ])
        .unwrap();
        assert!(args.global.no_audio);
        assert_eq!(args.global.volume, Some(30));
        assert!(matches!(
            args.command,
            Command::Profile { action: Some(ProfileAction::Remove { id: 4 }) }
        ));
    }

    #[test]
    fn test_volume_out_of_range_rejected() {
        assert!(Args::try_parse_from(["moodtune", "suggest", "--volume", "101"]).is_err());
    }
}
