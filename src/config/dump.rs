// src/config/dump.rs

//! Debug rendering of a configuration tree.
//!
//! One line per node, indented by nesting level, with each value printed
//! through the classifier so the dump shows what the rest of the program
//! will see.

use std::io::{self, Write};

use crate::config::tree::{NodeId, NodeTree};
use crate::config::value::ValueKind;
use crate::errors::{Result, WatchtreeError};

/// Deepest nesting level the dump will render. Real configuration trees stay
/// far below this; hitting it means the tree is malformed or cyclic.
pub const MAX_DUMP_DEPTH: usize = 20;

impl NodeTree {
    /// Write the subtree rooted at `id` to `out`, one line per node, starting
    /// at nesting level `depth`.
    pub fn dump(&self, out: &mut impl Write, id: NodeId, depth: usize) -> Result<()> {
        if depth > MAX_DUMP_DEPTH {
            return Err(WatchtreeError::DepthExceeded { depth });
        }
        let dashes = "-".repeat(depth + 1);
        write!(
            out,
            "{dashes}> name: {}, comment: {}, value: ",
            text_or_none(self.name(id)),
            text_or_none(self.comment(id)),
        )?;
        match self.value_kind(id) {
            ValueKind::None => writeln!(out, "None")?,
            ValueKind::Bool => writeln!(out, "Bool: {}", self.value_bool(id))?,
            ValueKind::Int => writeln!(out, "Int: {}", self.value_i64(id))?,
            ValueKind::Double => writeln!(out, "Double: {}", self.value_f64(id))?,
            ValueKind::String => writeln!(out, "String: {}", self.value_str(id).unwrap_or(""))?,
            ValueKind::List => writeln!(out, "List")?,
        }
        for child in self.children(id) {
            self.dump(out, child, depth + 1)?;
        }
        Ok(())
    }

    /// [`dump`](Self::dump) straight to stdout, from nesting level zero.
    pub fn dump_stdout(&self, id: NodeId) -> Result<()> {
        let stdout = io::stdout();
        self.dump(&mut stdout.lock(), id, 0)
    }
}

fn text_or_none(text: Option<&str>) -> &str {
    text.unwrap_or("(none)")
}
