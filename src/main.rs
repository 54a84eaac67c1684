//! # moodtune
//!
//! Pick a mood, get song suggestions, play them and keep the ones you like.
//!
//! ## Usage
//!
//! ```bash
//! # Save preferences and jump to suggestions
//! moodtune prefs --name Ada --email ada@example.org --mood focus
//!
//! # Suggestions, starting with song 7
//! moodtune suggest --play 7
//!
//! # Saved songs
//! moodtune profile
//! moodtune profile remove 7
//! ```

use anyhow::Result;
use clap::{CommandFactory, Parser};
use log::debug;
use std::io;

use moodtune::app::App;
use moodtune::catalog::Catalog;
use moodtune::cli::{self, GlobalOpts};
use moodtune::completion;
use moodtune::config::RuntimeConfig;
use moodtune::preferences::PreferencesPage;
use moodtune::route::Route;

/// Build the runtime configuration from global options.
fn runtime_config(opts: &GlobalOpts) -> Result<RuntimeConfig> {
    let mut config = match &opts.data_dir {
        Some(dir) => RuntimeConfig::in_dir(dir)?,
        None => RuntimeConfig::new()?,
    };
    if let Some(url) = &opts.tips_url {
        config.tips_url.clone_from(url);
    }
    if let Some(volume) = opts.volume {
        config.volume = volume;
    }
    config.no_audio = opts.no_audio;
    debug!("Runtime config: {config:?}");
    Ok(config)
}

/// Main entry point for moodtune.
///
/// Logging is controlled via `RUST_LOG`:
/// - `RUST_LOG=debug moodtune suggest` - Enable debug logging
/// - `RUST_LOG=moodtune::store=debug moodtune profile` - Module-specific logging
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();

    let args = cli::Args::parse();

    match args.command {
        cli::Command::Completion { shell } => {
            let mut cmd = cli::Args::command();
            completion::write_completions(shell, &mut cmd, &mut io::stdout())?;
        }
        cli::Command::CompleteSongs => {
            completion::print_song_completions(&Catalog::builtin())?;
        }
        cli::Command::Catalog => {
            let app = App::new(runtime_config(&args.global)?)?;
            app.print_catalog(&mut io::stdout())?;
        }
        cli::Command::Prefs { name, email, mood, no_redirect } => {
            let app = App::new(runtime_config(&args.global)?)?;
            if name.is_none() && email.is_none() && mood.is_none() {
                app.run(Route::Preferences).await?;
            } else {
                let form = PreferencesPage::new(app.store()).edit(name, email, mood);
                let redirect = app.submit_preferences(&form, &mut io::stdout())?;
                if !no_redirect {
                    app.run(redirect).await?;
                }
            }
        }
        cli::Command::Suggest { play } => {
            let app = App::new(runtime_config(&args.global)?)?;
            app.run(Route::Suggestions { play }).await?;
        }
        cli::Command::Profile { action } => {
            let app = App::new(runtime_config(&args.global)?)?;
            let action = action.unwrap_or(cli::ProfileAction::List);
            if let Some(route) = app.profile(action, &mut io::stdout())? {
                app.run(route).await?;
            }
        }
        cli::Command::Open { location } => {
            let route = Route::parse(&location)?;
            let app = App::new(runtime_config(&args.global)?)?;
            app.run(route).await?;
        }
    }

    Ok(())
}
