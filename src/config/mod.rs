// src/config/mod.rs

//! Configuration tree for watchtree.
//!
//! Responsibilities:
//! - Define the arena-backed node tree (`tree.rs`).
//! - Classify raw string values on read (`value.rs`).
//! - Load a TOML config file from disk into a tree (`loader.rs`).
//! - Validate the tree has a usable `[watch]` section (`validate.rs`).
//! - Render a tree for debugging (`dump.rs`).

pub mod dump;
pub mod loader;
pub mod tree;
pub mod validate;
pub mod value;

pub use dump::MAX_DUMP_DEPTH;
pub use loader::{load_and_validate, load_from_path, tree_from_toml, LoadedConfig};
pub use tree::{NodeId, NodeTree};
pub use validate::validate_config;
pub use value::ValueKind;
