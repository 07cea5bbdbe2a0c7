mod common;

use std::error::Error;
use std::fs;
use std::path::Path;

use tempfile::tempdir;

use watchtree::errors::WatchtreeError;
use watchtree::watch::{
    register_root, MockWatchService, WalkDiagnostic, WatchId, WatchRecord,
};

type TestResult = Result<(), Box<dyn Error>>;

fn position(records: &[WatchRecord], path: &Path) -> usize {
    records
        .iter()
        .position(|record| record.path == path)
        .unwrap_or_else(|| panic!("no record for {path:?}"))
}

#[test]
fn non_recursive_registration_covers_only_the_root() -> TestResult {
    common::init_tracing();
    let dir = tempdir()?;
    common::make_dirs(dir.path(), &["sub1", "sub2"])?;

    let mut service = MockWatchService::new();
    let registration = register_root(&mut service, dir.path(), false)?;

    assert_eq!(registration.records.len(), 1);
    assert_eq!(registration.records.as_slice()[0].path, dir.path());
    assert!(registration.diagnostics.is_empty());

    Ok(())
}

#[test]
fn recursive_walk_records_every_directory_parent_first() -> TestResult {
    common::init_tracing();
    let dir = tempdir()?;
    common::make_dirs(dir.path(), &["a", "a/inner", "b"])?;
    fs::write(dir.path().join("note.txt"), "not a directory")?;
    fs::write(dir.path().join("a/data.bin"), [0u8; 4])?;

    let mut service = MockWatchService::new();
    let registration = register_root(&mut service, dir.path(), true)?;
    let records = registration.records.as_slice();

    // Only directories get watches; the two files are ignored.
    assert_eq!(records.len(), 4);
    assert_eq!(records[0].path, dir.path());
    // A directory always precedes everything inside it.
    assert!(position(records, &dir.path().join("a"))
        < position(records, &dir.path().join("a/inner")));
    let _ = position(records, &dir.path().join("b"));
    assert!(registration.diagnostics.is_empty());

    Ok(())
}

#[test]
fn watch_ids_are_assigned_in_registration_order() -> TestResult {
    common::init_tracing();
    let dir = tempdir()?;
    common::make_dirs(dir.path(), &["x", "y", "z"])?;

    let mut service = MockWatchService::new();
    let registration = register_root(&mut service, dir.path(), true)?;

    for (index, record) in registration.records.iter().enumerate() {
        assert_eq!(record.watch_id, WatchId(index as u64 + 1));
    }
    // The service saw the same paths in the same order.
    let mut recorded = Vec::new();
    for record in &registration.records {
        recorded.push(record.path.clone());
    }
    assert_eq!(service.watched(), recorded.as_slice());

    Ok(())
}

#[test]
fn a_refused_watch_aborts_registration() -> TestResult {
    common::init_tracing();
    let dir = tempdir()?;
    common::make_dirs(dir.path(), &["ok", "bad"])?;

    let mut service = MockWatchService::new();
    service.fail_on(dir.path().join("bad"));

    let err = register_root(&mut service, dir.path(), true).unwrap_err();
    match err {
        WatchtreeError::WatchInstallFailed { path, .. } => {
            assert_eq!(path, dir.path().join("bad"));
        }
        other => panic!("unexpected error: {other}"),
    }
    // The root watch went in before the failure and stays installed.
    assert!(service.watched().contains(&dir.path().to_path_buf()));

    Ok(())
}

#[cfg(unix)]
#[test]
fn unreadable_directory_is_reported_and_stepped_over() -> TestResult {
    use std::os::unix::fs::PermissionsExt;

    common::init_tracing();
    let dir = tempdir()?;
    common::make_dirs(dir.path(), &["locked", "open"])?;
    let locked = dir.path().join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000))?;

    // Running as root ignores permission bits; nothing to observe then.
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755))?;
        return Ok(());
    }

    let mut service = MockWatchService::new();
    let registration = register_root(&mut service, dir.path(), true)?;

    // The locked directory itself is watched; only its contents are lost.
    assert_eq!(registration.records.len(), 3);
    assert_eq!(registration.diagnostics.len(), 1);
    assert!(matches!(
        &registration.diagnostics[0],
        WalkDiagnostic::OpenDirFailed { path, .. } if path == &locked
    ));

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(unix)]
#[test]
fn directory_symlinks_are_followed_file_symlinks_ignored() -> TestResult {
    use std::os::unix::fs::symlink;

    common::init_tracing();
    let dir = tempdir()?;
    common::make_dirs(dir.path(), &["real", "real/inner"])?;
    fs::write(dir.path().join("real/note.txt"), "plain file")?;
    symlink(dir.path().join("real"), dir.path().join("dir_link"))?;
    symlink(
        dir.path().join("real/note.txt"),
        dir.path().join("file_link"),
    )?;

    let mut service = MockWatchService::new();
    let registration = register_root(&mut service, dir.path(), true)?;
    let records = registration.records.as_slice();

    // root, real, real/inner, dir_link, dir_link/inner. The file symlink
    // stats as a file and is skipped.
    assert_eq!(records.len(), 5);
    assert!(position(records, &dir.path().join("dir_link"))
        < position(records, &dir.path().join("dir_link/inner")));

    Ok(())
}
