#![allow(dead_code)]

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .init();
    });
}

/// Create every directory in `dirs` under `root`.
pub fn make_dirs(root: &Path, dirs: &[&str]) -> io::Result<()> {
    for dir in dirs {
        fs::create_dir_all(root.join(dir))?;
    }
    Ok(())
}

/// Write a `Watchtree.toml` with the given contents into `dir` and return
/// its path.
pub fn write_config(dir: &Path, contents: &str) -> io::Result<PathBuf> {
    let path = dir.join("Watchtree.toml");
    fs::write(&path, contents)?;
    Ok(path)
}
