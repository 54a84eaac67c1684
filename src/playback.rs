//! # Playback Engine Module
//!
//! The single audio resource a suggestions route drives. The [`Player`] state
//! machine talks to it only through the [`PlaybackEngine`] trait, so the same
//! navigation logic runs against MPD or against a silent stand-in.
//!
//! ## Engines
//!
//! - [`MpcEngine`]: controls Music Player Daemon through the `mpc` command-line
//!   client. Song URLs are added to MPD's queue as streams.
//! - [`SilentEngine`]: keeps source, volume and play state in memory without
//!   producing sound. Used with `--no-audio`, when MPD is unreachable, and in
//!   tests.
//!
//! ## Ended Signal
//!
//! MPD has no callback we can hook from a short-lived client. The MPD engine's
//! worker polls `mpc status` in the background and the route's event loop
//! checks [`PlaybackEngine::has_ended`] on a timer. An engine reports an end
//! once per loaded track.
//!
//! [`Player`]: crate::player::Player

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// Operations the player needs from an audio backend.
pub trait PlaybackEngine {
    /// Replace the current source. Does not start playback.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the source.
    fn load(&mut self, url: &str) -> Result<()>;

    /// Start or resume playback of the loaded source.
    ///
    /// # Errors
    ///
    /// Returns an error if playback could not start.
    fn play(&mut self) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the backend refused to pause.
    fn pause(&mut self) -> Result<()>;

    /// Set output volume, 0-100.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend refused the change.
    fn set_volume(&mut self, volume: u8) -> Result<()>;

    /// Currently loaded source, if any.
    fn source(&self) -> Option<String>;

    fn volume(&self) -> u8;

    /// True once the loaded track finished on its own. Reported once per track.
    fn has_ended(&mut self) -> bool;
}

/// In-memory engine.
///
/// Clones share state, so a handle kept outside the player observes (and can
/// end) the track the player started.
#[derive(Debug, Clone, Default)]
pub struct SilentEngine {
    inner: Rc<RefCell<SilentState>>,
}

#[derive(Debug, Default)]
struct SilentState {
    source: Option<String>,
    volume: u8,
    playing: bool,
    ended: bool,
    refuse_play: bool,
}

impl SilentEngine {
    #[must_use]
    pub fn new(volume: u8) -> Self {
        let engine = Self::default();
        engine.inner.borrow_mut().volume = volume.min(100);
        engine
    }

    /// Engine whose `play` always fails, like a browser blocking autoplay.
    #[must_use]
    pub fn refusing_play() -> Self {
        let engine = Self::default();
        engine.inner.borrow_mut().refuse_play = true;
        engine
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.inner.borrow().playing
    }

    /// Pretend the current track ran to its end.
    pub fn finish_track(&self) {
        let mut state = self.inner.borrow_mut();
        if state.playing {
            state.playing = false;
            state.ended = true;
        }
    }
}

impl PlaybackEngine for SilentEngine {
    fn load(&mut self, url: &str) -> Result<()> {
        let mut state = self.inner.borrow_mut();
        state.source = Some(url.to_string());
        state.playing = false;
        state.ended = false;
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        let mut state = self.inner.borrow_mut();
        if state.refuse_play {
            anyhow::bail!("Playback was refused by the engine");
        }
        if state.source.is_none() {
            anyhow::bail!("No source loaded");
        }
        state.playing = true;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.inner.borrow_mut().playing = false;
        Ok(())
    }

    fn set_volume(&mut self, volume: u8) -> Result<()> {
        self.inner.borrow_mut().volume = volume.min(100);
        Ok(())
    }

    fn source(&self) -> Option<String> {
        self.inner.borrow().source.clone()
    }

    fn volume(&self) -> u8 {
        self.inner.borrow().volume
    }

    fn has_ended(&mut self) -> bool {
        std::mem::take(&mut self.inner.borrow_mut().ended)
    }
}

/// Upper bound for a single `mpc` invocation.
const MPC_TIMEOUT: Duration = Duration::from_secs(5);

/// How often the worker asks MPD whether the track is still going.
const STATUS_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// How `mpc` is invoked.
#[derive(Debug, Clone)]
struct MpcCommand {
    program: String,
    base_args: Vec<String>,
    timeout: Duration,
}

impl Default for MpcCommand {
    fn default() -> Self {
        Self {
            program: "mpc".to_string(),
            base_args: Vec::new(),
            timeout: MPC_TIMEOUT,
        }
    }
}

impl MpcCommand {
    async fn run<S: AsRef<str>>(&self, args: &[S]) -> Result<String> {
        let label = args.iter().map(|a| a.as_ref()).collect::<Vec<&str>>().join(" ");
        let output = tokio::time::timeout(
            self.timeout,
            tokio::process::Command::new(&self.program)
                .args(&self.base_args)
                .args(args.iter().map(|a| a.as_ref()))
                .kill_on_drop(true)
                .output(),
        )
        .await
        .with_context(|| format!("mpc {label} did not answer within {:?}", self.timeout))?
        .with_context(|| format!("Failed to execute mpc {label}. Please install mpc (MPD client)"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("mpc {label} failed: {}", stderr.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Flags shared between the engine handle and its worker.
#[derive(Debug, Default)]
struct MpcShared {
    watching: AtomicBool,
    ended: AtomicBool,
}

/// MPD-backed engine driven through `mpc`.
///
/// Commands are queued to a worker task and run there in order, so a slow or
/// hung MPD never stalls the route's event loop. Failures are logged by the
/// worker.
#[derive(Debug)]
pub struct MpcEngine {
    requests: mpsc::UnboundedSender<Vec<String>>,
    shared: Arc<MpcShared>,
    source: Option<String>,
    volume: u8,
}

impl MpcEngine {
    /// Connect to MPD and apply the initial volume.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if `mpc` is missing or MPD is not running.
    pub async fn connect(volume: u8) -> Result<Self> {
        let command = MpcCommand::default();
        command
            .run(&["version"])
            .await
            .context("Failed to connect to MPD. Make sure MPD is running on localhost:6600")?;

        let mut engine = Self::spawn(command);
        engine.set_volume(volume)?;
        info!("Connected to MPD");
        Ok(engine)
    }

    fn spawn(command: MpcCommand) -> Self {
        let (requests, queue) = mpsc::unbounded_channel();
        let shared = Arc::new(MpcShared::default());
        tokio::spawn(mpc_worker(command, queue, Arc::clone(&shared)));
        Self {
            requests,
            shared,
            source: None,
            volume: 0,
        }
    }

    fn send(&self, args: &[&str]) -> Result<()> {
        self.requests
            .send(args.iter().map(|a| (*a).to_string()).collect())
            .map_err(|_| anyhow::anyhow!("MPD worker has stopped"))
    }
}

/// Run queued `mpc` commands in order and watch for the end of the track.
async fn mpc_worker(
    command: MpcCommand,
    mut queue: mpsc::UnboundedReceiver<Vec<String>>,
    shared: Arc<MpcShared>,
) {
    let mut ticker = tokio::time::interval(STATUS_POLL_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;

            request = queue.recv() => {
                let Some(args) = request else { break };
                match command.run(&args[..]).await {
                    Ok(_) => match args.first().map(String::as_str) {
                        Some("play") => shared.watching.store(true, Ordering::SeqCst),
                        Some("clear") => shared.watching.store(false, Ordering::SeqCst),
                        _ => {}
                    },
                    Err(e) => warn!("{e:#}"),
                }
            }
            _ = ticker.tick(), if shared.watching.load(Ordering::SeqCst) => {
                match command.run(&["status"]).await {
                    Ok(status) if !status_is_active(&status) => {
                        shared.watching.store(false, Ordering::SeqCst);
                        shared.ended.store(true, Ordering::SeqCst);
                    }
                    Ok(_) => {}
                    Err(e) => debug!("Could not poll MPD status: {e:#}"),
                }
            }
        }
    }
    debug!("MPD worker stopped");
}

/// Whether `mpc status` output shows a track in progress.
fn status_is_active(status: &str) -> bool {
    status
        .lines()
        .any(|line| line.starts_with("[playing]") || line.starts_with("[paused]"))
}

impl PlaybackEngine for MpcEngine {
    fn load(&mut self, url: &str) -> Result<()> {
        self.send(&["clear"])?;
        self.send(&["add", url])?;
        self.shared.ended.store(false, Ordering::SeqCst);
        debug!("Queued {url} for MPD");
        self.source = Some(url.to_string());
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        self.send(&["play"])
    }

    fn pause(&mut self) -> Result<()> {
        self.send(&["pause"])
    }

    fn set_volume(&mut self, volume: u8) -> Result<()> {
        let volume = volume.min(100);
        self.send(&["volume", &volume.to_string()])?;
        self.volume = volume;
        Ok(())
    }

    fn source(&self) -> Option<String> {
        self.source.clone()
    }

    fn volume(&self) -> u8 {
        self.volume
    }

    fn has_ended(&mut self) -> bool {
        self.shared.ended.swap(false, Ordering::SeqCst)
    }
}
