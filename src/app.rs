//! # Application Module
//!
//! Dispatches a [`Route`] to exactly one controller and draws it on the
//! terminal. Navigation is a controller returning the next route; the loop in
//! [`App::run`] follows it until a route finishes without one.
//!
//! ## Suggestions Event Loop
//!
//! The suggestions route multiplexes everything on one thread with
//! `tokio::select!`:
//!
//! ```text
//! hand-off ─▶ action channel ─┐
//! stdin commands ─────────────┼─▶ SuggestionsPage::handle ─▶ engine
//! ended poll (timer) ─────────┘
//! tips fetch ─▶ tips area
//! ```
//!
//! Leaving the route drops the pending tips request and hand-off.

use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::io::{self, Write};
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;

use crate::autoplay;
use crate::catalog::Catalog;
use crate::cli::ProfileAction;
use crate::config::RuntimeConfig;
use crate::playback::{MpcEngine, PlaybackEngine, SilentEngine};
use crate::preferences::{PreferencesForm, PreferencesPage, Submission};
use crate::profile::{ProfilePage, ProfileView};
use crate::route::Route;
use crate::store::LocalStore;
use crate::suggestions::{Action, Outcome, SuggestionsPage};
use crate::tips::{self, TipsSection};
use crate::view::ListEntry;

/// How often the engine is asked whether the track ended.
const ENDED_POLL_INTERVAL: Duration = Duration::from_secs(1);

const SUGGESTIONS_HELP: &str = "\
Commands:
  list          show the suggestions again
  play N        play song N
  save N        save song N to your profile
  toggle | p    play / pause
  next | n      next song
  prev | b      previous song
  vol N         set volume (0-100)
  tips          show listening tips
  profile       go to your saved songs
  prefs         go to your preferences
  quit | q      leave";

/// A line typed on the suggestions prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Action(Action),
    List,
    Tips,
    Help,
    Navigate(Route),
    Quit,
    Invalid(String),
}

/// Parse one prompt line. List positions are 1-based.
#[must_use]
pub fn parse_command(line: &str) -> Option<ConsoleCommand> {
    let mut words = line.split_whitespace();
    let verb = words.next()?.to_lowercase();
    let arg = words.next();

    let position = |arg: Option<&str>| -> Option<usize> {
        arg.and_then(|a| a.parse::<usize>().ok())
            .filter(|n| *n >= 1)
            .map(|n| n - 1)
    };

    let command = match verb.as_str() {
        "list" | "ls" => ConsoleCommand::List,
        "play" => match position(arg) {
            Some(idx) => ConsoleCommand::Action(Action::Play(idx)),
            None => ConsoleCommand::Invalid("Usage: play N (N is a list number)".to_string()),
        },
        "save" => match position(arg) {
            Some(idx) => ConsoleCommand::Action(Action::Save(idx)),
            None => ConsoleCommand::Invalid("Usage: save N (N is a list number)".to_string()),
        },
        "toggle" | "pause" | "p" => ConsoleCommand::Action(Action::TogglePlay),
        "next" | "n" => ConsoleCommand::Action(Action::Next),
        "prev" | "previous" | "b" => ConsoleCommand::Action(Action::Prev),
        "vol" | "volume" => match arg.and_then(|a| a.parse::<u8>().ok()).filter(|v| *v <= 100) {
            Some(volume) => ConsoleCommand::Action(Action::Volume(volume)),
            None => ConsoleCommand::Invalid("Usage: vol N (0-100)".to_string()),
        },
        "tips" => ConsoleCommand::Tips,
        "help" | "?" => ConsoleCommand::Help,
        "profile" => ConsoleCommand::Navigate(Route::Profile),
        "prefs" | "preferences" => ConsoleCommand::Navigate(Route::Preferences),
        "quit" | "exit" | "q" => ConsoleCommand::Quit,
        other => ConsoleCommand::Invalid(format!("Unknown command '{other}'. Type 'help'.")),
    };
    Some(command)
}

/// Everything a route needs, built once at start-up.
pub struct App {
    config: RuntimeConfig,
    catalog: Catalog,
    store: LocalStore,
    http: reqwest::Client,
}

impl App {
    /// Open the store and build the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the local store cannot be opened.
    pub fn new(config: RuntimeConfig) -> Result<Self> {
        let store = LocalStore::open(&config.store_path)?;
        Ok(Self::with_store(config, store))
    }

    #[must_use]
    pub fn with_store(config: RuntimeConfig, store: LocalStore) -> Self {
        Self {
            config,
            catalog: Catalog::builtin(),
            store,
            http: reqwest::Client::new(),
        }
    }

    #[must_use]
    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Follow routes until one finishes without navigating.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal output fails or a preferences submit is
    /// rejected by the store.
    pub async fn run(&self, route: Route) -> Result<()> {
        let mut out = io::stdout();
        let mut next = Some(route);

        while let Some(route) = next.take() {
            info!("Opening {route}");
            next = match route {
                Route::Preferences => {
                    self.show_preferences(&mut out)?;
                    None
                }
                Route::Suggestions { play } => {
                    let input = tokio::io::BufReader::new(tokio::io::stdin());
                    let engine = self.open_engine().await;
                    self.run_suggestions(play, engine, input, &mut out).await?
                }
                Route::Profile => self.profile(ProfileAction::List, &mut out)?,
            };
        }
        Ok(())
    }

    /// MPD when available, the silent engine otherwise.
    pub async fn open_engine(&self) -> Box<dyn PlaybackEngine> {
        if self.config.no_audio {
            return Box::new(SilentEngine::new(self.config.volume));
        }
        match MpcEngine::connect(self.config.volume).await {
            Ok(engine) => Box::new(engine),
            Err(e) => {
                warn!("Audio unavailable, continuing without sound: {e:#}");
                Box::new(SilentEngine::new(self.config.volume))
            }
        }
    }

    /// Print the pre-filled preferences form.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn show_preferences<W: Write>(&self, out: &mut W) -> Result<()> {
        let view = PreferencesPage::new(&self.store).activate();
        if let Some(welcome) = &view.welcome {
            writeln!(out, "{welcome}")?;
        }
        writeln!(out, "Name:  {}", view.form.name)?;
        writeln!(out, "Email: {}", view.form.email)?;
        writeln!(out, "Mood:  {}", view.form.mood)?;
        writeln!(out)?;
        writeln!(out, "Update with: moodtune prefs --name NAME --email EMAIL --mood MOOD")?;
        Ok(())
    }

    /// Submit the preferences form.
    ///
    /// Returns the redirect route on success.
    ///
    /// # Errors
    ///
    /// A rejected form is returned as its [`ValidationError`] so the caller
    /// can show it as an alert; store write failures are returned as-is.
    ///
    /// [`ValidationError`]: crate::validate::ValidationError
    pub fn submit_preferences<W: Write>(&self, form: &PreferencesForm, out: &mut W) -> Result<Route> {
        match PreferencesPage::new(&self.store).submit(form)? {
            Submission::Rejected(e) => Err(e.into()),
            Submission::Saved { notice, redirect, .. } => {
                writeln!(out, "{notice}")?;
                Ok(redirect)
            }
        }
    }

    /// Apply a profile action and print the result.
    ///
    /// # Errors
    ///
    /// Returns an error if a removal could not be written or output fails.
    pub fn profile<W: Write>(&self, action: ProfileAction, out: &mut W) -> Result<Option<Route>> {
        let page = ProfilePage::new(&self.store);
        let view = match action {
            ProfileAction::List => page.render(),
            ProfileAction::Remove { id } => page.remove(id)?,
            ProfileAction::Clear => page.clear_all()?,
            ProfileAction::Play { id } => return Ok(Some(page.play(id))),
        };

        if let Some(header) = page.header() {
            writeln!(out, "{header}")?;
        }
        match view {
            ProfileView::Empty(placeholder) => writeln!(out, "{placeholder}")?,
            ProfileView::Songs(entries) => write_entries(out, &entries)?,
        }
        Ok(None)
    }

    /// Print the built-in catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn print_catalog<W: Write>(&self, out: &mut W) -> Result<()> {
        for song in self.catalog.songs() {
            writeln!(
                out,
                "{:>3}  {:<16} {:<20} {:<8} {}",
                song.id,
                song.title,
                song.artist,
                song.mood,
                song.duration_label()
            )?;
        }
        Ok(())
    }

    /// Run the interactive suggestions route until the user quits or
    /// navigates away.
    ///
    /// # Errors
    ///
    /// Returns an error if reading `input` or writing `out` fails. Save
    /// failures are reported on `out` and do not end the route.
    pub async fn run_suggestions<R, W>(
        &self,
        play: Option<u32>,
        engine: Box<dyn PlaybackEngine>,
        input: R,
        out: &mut W,
    ) -> Result<Option<Route>>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let (ready_tx, ready_rx) = oneshot::channel();
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();

        let tips_request = tips::load_tips(&self.http, &self.config.tips_url);
        let hand_off = autoplay::hand_off(play, ready_rx, action_tx);
        tokio::pin!(tips_request, hand_off);
        let mut tips: Option<TipsSection> = None;
        let mut hand_off_done = false;

        let mut page = SuggestionsPage::initialize(&self.catalog, &self.store, engine);
        writeln!(out, "{}", page.greeting())?;
        write_suggestions(out, &page.entries())?;
        writeln!(out, "Tips: loading... (type 'help' for commands)")?;
        out.flush()?;
        if ready_tx.send(()).is_err() {
            debug!("Auto-play hand-off already gone, nothing to signal");
        }

        let mut lines = input.lines();
        let mut ticker = tokio::time::interval(ENDED_POLL_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = &mut hand_off, if !hand_off_done => {
                    hand_off_done = true;
                }
                Some(action) = action_rx.recv() => {
                    apply(&mut page, action, out)?;
                }
                section = &mut tips_request, if tips.is_none() => {
                    writeln!(out, "\nTips:\n{section}")?;
                    tips = Some(section);
                }
                line = lines.next_line() => {
                    let Some(line) = line.context("Failed to read command")? else {
                        return Ok(None);
                    };
                    match parse_command(&line) {
                        None => {}
                        Some(ConsoleCommand::Action(action)) => apply(&mut page, action, out)?,
                        Some(ConsoleCommand::List) => write_suggestions(out, &page.entries())?,
                        Some(ConsoleCommand::Tips) => match &tips {
                            Some(section) => writeln!(out, "{section}")?,
                            None => writeln!(out, "Tips are still loading.")?,
                        },
                        Some(ConsoleCommand::Help) => writeln!(out, "{SUGGESTIONS_HELP}")?,
                        Some(ConsoleCommand::Navigate(route)) => return Ok(Some(route)),
                        Some(ConsoleCommand::Quit) => return Ok(None),
                        Some(ConsoleCommand::Invalid(message)) => writeln!(out, "{message}")?,
                    }
                }
                _ = ticker.tick() => {
                    if page.poll_ended() {
                        writeln!(out, "{}", page.now_playing())?;
                    }
                }
            }
            out.flush()?;
        }
    }
}

fn apply<W: Write>(page: &mut SuggestionsPage<'_>, action: Action, out: &mut W) -> Result<()> {
    match page.handle(action) {
        Ok(Outcome::Player) => {
            if let Action::Volume(volume) = action {
                writeln!(out, "Volume: {volume}")?;
            } else {
                writeln!(out, "{} [{:?}]", page.now_playing(), page.player().state())?;
            }
        }
        Ok(Outcome::Saved(song)) => writeln!(out, "Saved \"{}\" to your profile.", song.title)?,
        Ok(Outcome::AlreadySaved(song)) => writeln!(out, "\"{}\" is already saved.", song.title)?,
        Ok(Outcome::Ignored) => {
            if !matches!(action, Action::AutoPlay(_)) {
                writeln!(out, "Nothing to do: no such song.")?;
            }
        }
        Err(e) => {
            error!("Action {action:?} failed: {e:#}");
            writeln!(out, "Could not save that song: {e}")?;
        }
    }
    Ok(())
}

fn write_suggestions<W: Write>(out: &mut W, entries: &[ListEntry]) -> Result<()> {
    if entries.is_empty() {
        writeln!(out, "No songs match your mood yet.")?;
        return Ok(());
    }
    write_entries(out, entries)
}

fn write_entries<W: Write>(out: &mut W, entries: &[ListEntry]) -> Result<()> {
    for entry in entries {
        writeln!(out, "{entry}")?;
    }
    Ok(())
}
