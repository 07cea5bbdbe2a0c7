// src/watch/mod.rs

//! Watch installation over directory trees.
//!
//! This module is responsible for:
//! - Expanding configured path patterns into concrete paths (`expand`).
//! - Wiring up a cross-platform filesystem watcher (`notify`) behind the
//!   [`WatchService`] trait (`service`, with a mock in `mock`).
//! - Walking directory trees and installing one watch per directory
//!   (`registrar`).
//!
//! It does **not** know about the config file format; it only takes an
//! already-loaded tree and turns its `[watch]` section into installed
//! watches.

pub mod expand;
pub mod mock;
pub mod registrar;
pub mod service;

pub use expand::expand_pattern;
pub use mock::MockWatchService;
pub use registrar::{
    recurse_requested, register_all, register_root, Registration, WalkDiagnostic, WatchRecord,
    WatchRecordList,
};
pub use service::{NotifyWatchService, WatchId, WatchService};
