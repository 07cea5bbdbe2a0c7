// src/errors.rs

//! Crate-wide error type and `Result` alias.
//!
//! Hard registration failures get their own variants so callers can match
//! on them. Soft walk failures never show up here; they travel as
//! diagnostics next to the record list instead.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchtreeError {
    /// The watch service refused a directory (nonexistent, inaccessible, or
    /// the platform watcher itself failed).
    #[error("failed to install watch on {path}: {cause}")]
    WatchInstallFailed { path: PathBuf, cause: anyhow::Error },

    /// A configured path pattern expanded to zero paths.
    #[error("path pattern {pattern:?} matched nothing")]
    NoPathMatch { pattern: String },

    /// A watch entry is missing a required option key entirely. A key that
    /// is present with an unhelpful value is not an error; only absence is.
    #[error("watch entry {entry:?} has no {key:?} option")]
    MissingOption { entry: String, key: String },

    /// The debug dump was asked to render deeper than its nesting limit,
    /// which a well-formed configuration tree never reaches.
    #[error("node nesting level {depth} exceeds the dump depth limit")]
    DepthExceeded { depth: usize },

    /// The config file could not be read at all.
    #[error("failed to read config file {path}: {source}")]
    ConfigRead { path: PathBuf, source: io::Error },

    /// The config file was read but is not valid TOML.
    #[error("failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, WatchtreeError>;
