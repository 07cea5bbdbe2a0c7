// src/watch/registrar.rs

//! Watch registration over real directory trees.
//!
//! For every entry in the `[watch]` section the registrar expands the entry
//! name into a root path, installs a watch on it, and, when the entry asks
//! for recursion, walks the tree below it installing one watch per
//! directory. Directories are recorded parent before child.
//!
//! Two kinds of failure are kept apart. A watch the service refuses is a
//! hard error and aborts registration. A directory that cannot be read or
//! an entry that cannot be stat'ed is a soft failure: the walk skips it and
//! reports it as a diagnostic next to the records.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::tree::{NodeId, NodeTree};
use crate::errors::{Result, WatchtreeError};
use crate::watch::expand::expand_pattern;
use crate::watch::service::{WatchId, WatchService};

/// One installed watch: the id the service assigned and the directory it
/// covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchRecord {
    pub watch_id: WatchId,
    pub path: PathBuf,
}

/// Flat list of installed watches, in installation order. Within one root
/// that order is pre-order: a directory always precedes its contents.
#[derive(Debug, Default)]
pub struct WatchRecordList {
    records: Vec<WatchRecord>,
}

impl WatchRecordList {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WatchRecord> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[WatchRecord] {
        &self.records
    }

    fn push(&mut self, record: WatchRecord) {
        self.records.push(record);
    }
}

impl<'a> IntoIterator for &'a WatchRecordList {
    type Item = &'a WatchRecord;
    type IntoIter = std::slice::Iter<'a, WatchRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A soft failure the walk stepped over instead of aborting.
#[derive(Debug, Error)]
pub enum WalkDiagnostic {
    #[error("could not enumerate directory {path}: {source}")]
    OpenDirFailed { path: PathBuf, source: io::Error },
    #[error("could not stat {path}: {source}")]
    StatFailed { path: PathBuf, source: io::Error },
}

/// Outcome of a registration run.
#[derive(Debug, Default)]
pub struct Registration {
    pub records: WatchRecordList,
    pub diagnostics: Vec<WalkDiagnostic>,
}

/// Whether `entry` asks for recursion. `None` means the entry has no
/// `recurse` option at all; `Some(false)` covers both a valueless key and
/// any value other than exactly `"true"`.
pub fn recurse_requested(tree: &NodeTree, entry: NodeId) -> Option<bool> {
    let option = tree.find_child(entry, "recurse")?;
    Some(tree.value_str(option) == Some("true"))
}

/// Register watches for every entry of the `[watch]` section.
///
/// Entries are processed in configuration order. An unnamed entry is skipped
/// with a warning. A pattern that expands to nothing, an entry without a
/// `recurse` option, and a refused watch are hard errors.
pub fn register_all(
    service: &mut dyn WatchService,
    tree: &NodeTree,
    section: NodeId,
) -> Result<Registration> {
    let mut registration = Registration::default();
    for entry in tree.children(section) {
        let Some(pattern) = tree.name(entry) else {
            warn!("skipping a watch entry without a name");
            continue;
        };
        let mut matches = expand_pattern(pattern);
        if matches.is_empty() {
            return Err(WatchtreeError::NoPathMatch {
                pattern: pattern.to_string(),
            });
        }
        let root = matches.remove(0);
        if !matches.is_empty() {
            warn!(
                pattern,
                used = %root.display(),
                discarded = matches.len(),
                "pattern matched multiple paths, only the first is registered"
            );
        }
        let recurse = recurse_requested(tree, entry).ok_or_else(|| {
            WatchtreeError::MissingOption {
                entry: pattern.to_string(),
                key: "recurse".to_string(),
            }
        })?;
        register_root_into(service, &root, recurse, &mut registration)?;
    }
    Ok(registration)
}

/// Register watches for a single root directory, recursing when asked.
pub fn register_root(
    service: &mut dyn WatchService,
    root: &Path,
    recurse: bool,
) -> Result<Registration> {
    let mut registration = Registration::default();
    register_root_into(service, root, recurse, &mut registration)?;
    Ok(registration)
}

fn register_root_into(
    service: &mut dyn WatchService,
    root: &Path,
    recurse: bool,
    registration: &mut Registration,
) -> Result<()> {
    install(service, root, &mut registration.records)?;
    if recurse {
        walk(service, root, registration)?;
    }
    Ok(())
}

fn install(
    service: &mut dyn WatchService,
    path: &Path,
    records: &mut WatchRecordList,
) -> Result<()> {
    let watch_id = service
        .add_watch(path)
        .map_err(|cause| WatchtreeError::WatchInstallFailed {
            path: path.to_path_buf(),
            cause,
        })?;
    info!(path = %path.display(), id = %watch_id, "added watch");
    records.push(WatchRecord {
        watch_id,
        path: path.to_path_buf(),
    });
    Ok(())
}

/// Walk the directories below `directory`, installing a watch on each one
/// before descending into it.
fn walk(
    service: &mut dyn WatchService,
    directory: &Path,
    registration: &mut Registration,
) -> Result<()> {
    let entries = match fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(source) => {
            debug!(path = %directory.display(), error = %source, "cannot enumerate directory, skipping");
            registration.diagnostics.push(WalkDiagnostic::OpenDirFailed {
                path: directory.to_path_buf(),
                source,
            });
            return Ok(());
        }
    };
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) => {
                registration.diagnostics.push(WalkDiagnostic::StatFailed {
                    path: directory.to_path_buf(),
                    source,
                });
                continue;
            }
        };
        let path = entry.path();
        // stat, not lstat: a symlink to a directory is walked into.
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(source) => {
                debug!(path = %path.display(), error = %source, "cannot stat entry, skipping");
                registration
                    .diagnostics
                    .push(WalkDiagnostic::StatFailed { path, source });
                continue;
            }
        };
        if metadata.is_dir() {
            install(service, &path, &mut registration.records)?;
            walk(service, &path, registration)?;
        }
    }
    Ok(())
}
