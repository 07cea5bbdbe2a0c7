// src/config/loader.rs

//! Loading TOML config files into a [`NodeTree`].
//!
//! The TOML document is flattened into the generic tree: tables become named
//! children, arrays become anonymous children, and every scalar is stored as
//! its raw string so the classifier in [`crate::config::value`] decides the
//! type on read. Table order from the file is preserved.

use std::fs;
use std::path::Path;

use toml::Value;
use tracing::debug;

use crate::config::tree::{NodeId, NodeTree};
use crate::config::validate::validate_config;
use crate::errors::{Result, WatchtreeError};

/// A parsed and validated configuration.
#[derive(Debug)]
pub struct LoadedConfig {
    pub tree: NodeTree,
    pub root: NodeId,
    pub watch_section: NodeId,
}

/// Load and validate a config file.
///
/// This is the recommended entry point for the rest of the application: it
/// reads TOML, builds the tree, and checks the `[watch]` section is present
/// and usable.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<LoadedConfig> {
    let (tree, root) = load_from_path(path)?;
    let watch_section = validate_config(&tree, root)?;
    Ok(LoadedConfig {
        tree,
        root,
        watch_section,
    })
}

/// Read `path` and convert its TOML contents into a tree. Returns the tree
/// and the id of its (unnamed) root node.
///
/// This only performs parsing and conversion; it does **not** perform
/// semantic validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<(NodeTree, NodeId)> {
    let path = path.as_ref();
    debug!(path = %path.display(), "loading config file");
    let contents = fs::read_to_string(path).map_err(|source| WatchtreeError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let document: Value =
        toml::from_str(&contents).map_err(|source| WatchtreeError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(tree_from_toml(&document))
}

/// Convert an already-parsed TOML value into a tree rooted at an unnamed
/// node.
pub fn tree_from_toml(document: &Value) -> (NodeTree, NodeId) {
    let mut tree = NodeTree::new();
    let root = convert(&mut tree, None, document);
    (tree, root)
}

fn convert(tree: &mut NodeTree, name: Option<&str>, value: &Value) -> NodeId {
    match value {
        Value::Table(table) => {
            let node = named_or_empty(tree, name);
            for (key, entry) in table {
                let child = convert(tree, Some(key.as_str()), entry);
                tree.push_child(node, child);
            }
            node
        }
        Value::Array(items) => {
            let node = named_or_empty(tree, name);
            for item in items {
                let child = convert(tree, None, item);
                tree.push_child(node, child);
            }
            node
        }
        scalar => {
            let text = scalar_text(scalar);
            match name {
                Some(name) => tree.alloc_pair(name, text),
                None => tree.alloc_item(text),
            }
        }
    }
}

fn named_or_empty(tree: &mut NodeTree, name: Option<&str>) -> NodeId {
    match name {
        Some(name) => tree.alloc_section(name),
        None => tree.alloc_empty(),
    }
}

/// Raw string form of a scalar. Floats that happen to be whole keep one
/// decimal place so they still classify as doubles.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Integer(number) => number.to_string(),
        Value::Float(number) if number.is_finite() && number.fract() == 0.0 => {
            format!("{number:.1}")
        }
        Value::Float(number) => number.to_string(),
        Value::Boolean(flag) => flag.to_string(),
        Value::Datetime(stamp) => stamp.to_string(),
        other => other.to_string(),
    }
}
