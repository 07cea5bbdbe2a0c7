// src/watch/service.rs

//! The watch service boundary.
//!
//! [`WatchService`] is the single seam between watch registration and the
//! platform notification machinery. The registrar only ever asks for one
//! thing: creation-event interest on one directory. Tests swap in the mock
//! from [`crate::watch::mock`]; production uses [`NotifyWatchService`].

use std::fmt;
use std::path::Path;
use std::sync::mpsc::{self, Receiver};

use anyhow::{Context, Result};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::debug;

/// Identifier the service assigns to one installed watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId(pub u64);

impl fmt::Display for WatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A sink for directory watch registrations.
pub trait WatchService {
    /// Register creation-event interest on a single directory (children are
    /// not covered; the caller walks and registers them itself).
    fn add_watch(&mut self, path: &Path) -> Result<WatchId>;
}

/// [`WatchService`] backed by the platform watcher `notify` picks for this
/// OS.
///
/// The handle keeps the underlying `RecommendedWatcher` alive for as long as
/// the watches should stay installed. Dropping it stops file watching.
pub struct NotifyWatchService {
    watcher: RecommendedWatcher,
    events: Receiver<Event>,
    next_id: u64,
}

impl fmt::Debug for NotifyWatchService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifyWatchService")
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl NotifyWatchService {
    /// Connect to the platform watcher. No watches are installed yet.
    pub fn open() -> Result<Self> {
        let (event_tx, event_rx) = mpsc::channel::<Event>();

        // Closure called synchronously by notify whenever an event arrives.
        // Only creation events are forwarded.
        let watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_create() => {
                    if let Err(err) = event_tx.send(event) {
                        // We can't log via tracing here easily, so fallback to stderr.
                        eprintln!("watchtree: failed to forward notify event: {err}");
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    eprintln!("watchtree: file watch error: {err}");
                }
            },
            Config::default(),
        )
        .context("starting the platform file watcher")?;

        Ok(Self {
            watcher,
            events: event_rx,
            next_id: 1,
        })
    }

    /// Creation events from every directory registered so far.
    pub fn events(&self) -> &Receiver<Event> {
        &self.events
    }
}

impl WatchService for NotifyWatchService {
    fn add_watch(&mut self, path: &Path) -> Result<WatchId> {
        self.watcher
            .watch(path, RecursiveMode::NonRecursive)
            .with_context(|| format!("watching directory {:?}", path))?;
        let id = WatchId(self.next_id);
        self.next_id += 1;
        debug!(path = %path.display(), id = %id, "watch installed");
        Ok(id)
    }
}
