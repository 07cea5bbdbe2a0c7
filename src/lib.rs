// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod logging;
pub mod watch;

use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::tree::{NodeId, NodeTree};
use crate::errors::Result;
use crate::watch::expand::expand_pattern;
use crate::watch::registrar::{recurse_requested, register_all};
use crate::watch::service::NotifyWatchService;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and validation
/// - the `--dump-config` / `--dry-run` surfaces
/// - the platform watch service
/// - watch registration over the `[watch]` entries
pub fn run(args: CliArgs) -> Result<()> {
    let loaded = load_and_validate(&args.config)?;

    if args.dump_config {
        loaded.tree.dump_stdout(loaded.root)?;
        return Ok(());
    }

    if args.dry_run {
        print_dry_run(&loaded.tree, loaded.watch_section);
        return Ok(());
    }

    let mut service = NotifyWatchService::open()?;
    let registration = register_all(&mut service, &loaded.tree, loaded.watch_section)?;

    info!(
        watches = registration.records.len(),
        skipped = registration.diagnostics.len(),
        "registration complete"
    );
    for diagnostic in &registration.diagnostics {
        warn!("{diagnostic}");
    }

    Ok(())
}

/// Simple dry-run output: print entries, their expansion and recurse flag.
fn print_dry_run(tree: &NodeTree, section: NodeId) {
    println!("watchtree dry-run");
    let entries: Vec<NodeId> = tree.children(section).collect();
    println!("watch entries ({}):", entries.len());
    for entry in entries {
        let Some(pattern) = tree.name(entry) else {
            println!("  - (unnamed entry, skipped)");
            continue;
        };
        println!("  - {pattern}");
        let matches = expand_pattern(pattern);
        match matches.first() {
            Some(path) => println!("      path: {}", path.display()),
            None => println!("      path: (no match)"),
        }
        if matches.len() > 1 {
            println!("      ignored matches: {}", matches.len() - 1);
        }
        match recurse_requested(tree, entry) {
            Some(recurse) => println!("      recurse: {recurse}"),
            None => println!("      recurse: (missing)"),
        }
    }

    debug!("dry-run complete (no watches installed)");
}
