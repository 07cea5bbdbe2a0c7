// src/watch/mock.rs

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

use crate::watch::service::{WatchId, WatchService};

/// In-memory [`WatchService`] for tests.
///
/// Records every registered path in order and assigns ids the same way the
/// real service does. Individual paths can be scripted to fail so callers'
/// error paths are reachable without touching the platform watcher.
#[derive(Debug)]
pub struct MockWatchService {
    watched: Vec<PathBuf>,
    failures: HashSet<PathBuf>,
    next_id: u64,
}

impl MockWatchService {
    pub fn new() -> Self {
        Self {
            watched: Vec::new(),
            failures: HashSet::new(),
            next_id: 1,
        }
    }

    /// Make `add_watch` fail for this exact path.
    pub fn fail_on(&mut self, path: impl Into<PathBuf>) {
        self.failures.insert(path.into());
    }

    /// Paths registered so far, in registration order.
    pub fn watched(&self) -> &[PathBuf] {
        &self.watched
    }
}

impl Default for MockWatchService {
    fn default() -> Self {
        Self::new()
    }
}

impl WatchService for MockWatchService {
    fn add_watch(&mut self, path: &Path) -> Result<WatchId> {
        if self.failures.contains(path) {
            return Err(anyhow!("mock refuses to watch {:?}", path));
        }
        self.watched.push(path.to_path_buf());
        let id = WatchId(self.next_id);
        self.next_id += 1;
        Ok(id)
    }
}
