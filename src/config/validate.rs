// src/config/validate.rs

use anyhow::anyhow;

use crate::config::tree::{NodeId, NodeTree};
use crate::errors::Result;

/// Run basic semantic validation against a loaded configuration tree.
///
/// This checks:
/// - there is a top-level `[watch]` section
/// - that section has at least one entry
///
/// It does **not**:
/// - expand entry patterns or touch the filesystem
/// - check that entries carry a `recurse` option
///
/// Those are registration-time concerns. On success the id of the `[watch]`
/// section is returned.
pub fn validate_config(tree: &NodeTree, root: NodeId) -> Result<NodeId> {
    let section = tree
        .find_child(root, "watch")
        .ok_or_else(|| anyhow!("config must contain a [watch] section"))?;
    if tree.children(section).next().is_none() {
        return Err(anyhow!("the [watch] section must contain at least one entry").into());
    }
    Ok(section)
}
