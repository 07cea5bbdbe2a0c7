mod common;

use std::error::Error;
use std::fs;

use tempfile::tempdir;

use watchtree::config::{load_and_validate, load_from_path, validate_config, NodeTree, ValueKind};
use watchtree::errors::WatchtreeError;
use watchtree::watch::{register_all, MockWatchService};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn entries_register_in_configuration_order() -> TestResult {
    common::init_tracing();
    let dir = tempdir()?;
    common::make_dirs(dir.path(), &["first", "second", "second/nested"])?;
    let first = fs::canonicalize(dir.path().join("first"))?;
    let second = fs::canonicalize(dir.path().join("second"))?;

    let config = format!(
        r#"
[watch."{}"]
recurse = "false"

[watch."{}"]
recurse = "true"
"#,
        first.display(),
        second.display()
    );
    let path = common::write_config(dir.path(), &config)?;
    let loaded = load_and_validate(&path)?;

    let mut service = MockWatchService::new();
    let registration = register_all(&mut service, &loaded.tree, loaded.watch_section)?;

    let paths: Vec<_> = registration
        .records
        .iter()
        .map(|record| record.path.clone())
        .collect();
    assert_eq!(paths, vec![first, second.clone(), second.join("nested")]);

    Ok(())
}

#[test]
fn recurse_must_be_exactly_the_string_true() -> TestResult {
    common::init_tracing();
    let dir = tempdir()?;
    common::make_dirs(dir.path(), &["yes_dir", "yes_dir/sub", "cased", "cased/sub"])?;
    let yes_dir = fs::canonicalize(dir.path().join("yes_dir"))?;
    let cased = fs::canonicalize(dir.path().join("cased"))?;

    let config = format!(
        r#"
[watch."{}"]
recurse = "yes"

[watch."{}"]
recurse = "True"
"#,
        yes_dir.display(),
        cased.display()
    );
    let path = common::write_config(dir.path(), &config)?;
    let loaded = load_and_validate(&path)?;

    let mut service = MockWatchService::new();
    let registration = register_all(&mut service, &loaded.tree, loaded.watch_section)?;

    // Neither spelling triggers recursion; only the two roots are watched.
    assert_eq!(registration.records.len(), 2);

    Ok(())
}

#[test]
fn an_entry_without_a_recurse_key_is_an_error() -> TestResult {
    common::init_tracing();
    let dir = tempdir()?;
    common::make_dirs(dir.path(), &["drop"])?;
    let drop_dir = fs::canonicalize(dir.path().join("drop"))?;

    let config = format!(
        r#"
[watch."{}"]
note = "recurse key forgotten"
"#,
        drop_dir.display()
    );
    let path = common::write_config(dir.path(), &config)?;
    let loaded = load_and_validate(&path)?;

    let mut service = MockWatchService::new();
    let err = register_all(&mut service, &loaded.tree, loaded.watch_section).unwrap_err();
    match err {
        WatchtreeError::MissingOption { entry, key } => {
            assert_eq!(entry, drop_dir.display().to_string());
            assert_eq!(key, "recurse");
        }
        other => panic!("unexpected error: {other}"),
    }

    Ok(())
}

#[test]
fn a_pattern_matching_nothing_is_an_error() -> TestResult {
    common::init_tracing();
    let dir = tempdir()?;
    let config = r#"
[watch."$WATCHTREE_TEST_UNSET_DIR_8241"]
recurse = "false"
"#;
    let path = common::write_config(dir.path(), config)?;
    let loaded = load_and_validate(&path)?;

    let mut service = MockWatchService::new();
    let err = register_all(&mut service, &loaded.tree, loaded.watch_section).unwrap_err();
    match err {
        WatchtreeError::NoPathMatch { pattern } => {
            assert_eq!(pattern, "$WATCHTREE_TEST_UNSET_DIR_8241");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(service.watched().is_empty());

    Ok(())
}

#[test]
fn a_glob_entry_uses_only_its_first_match() -> TestResult {
    common::init_tracing();
    let dir = tempdir()?;
    common::make_dirs(dir.path(), &["sub1", "sub2"])?;
    let root = fs::canonicalize(dir.path())?;

    let config = format!(
        r#"
[watch."{}/sub*"]
recurse = "false"
"#,
        root.display()
    );
    let path = common::write_config(dir.path(), &config)?;
    let loaded = load_and_validate(&path)?;

    let mut service = MockWatchService::new();
    let registration = register_all(&mut service, &loaded.tree, loaded.watch_section)?;

    assert_eq!(registration.records.len(), 1);
    assert_eq!(registration.records.as_slice()[0].path, root.join("sub1"));

    Ok(())
}

#[test]
fn unnamed_watch_entries_are_skipped() -> TestResult {
    common::init_tracing();
    let dir = tempdir()?;

    // TOML cannot produce a nameless entry, so build the tree by hand.
    let mut tree = NodeTree::new();
    let root = tree.alloc_empty();
    let watch = tree.alloc_section("watch");
    tree.push_child(root, watch);
    let nameless = tree.alloc_item("ignored");
    tree.push_child(watch, nameless);
    let entry = tree.alloc_section(dir.path().to_string_lossy());
    let recurse = tree.alloc_pair("recurse", "false");
    tree.push_child(entry, recurse);
    tree.push_child(watch, entry);

    let section = validate_config(&tree, root)?;
    let mut service = MockWatchService::new();
    let registration = register_all(&mut service, &tree, section)?;

    assert_eq!(registration.records.len(), 1);

    Ok(())
}

#[test]
fn a_valueless_recurse_key_means_non_recursive_not_an_error() -> TestResult {
    common::init_tracing();
    let dir = tempdir()?;
    common::make_dirs(dir.path(), &["inner"])?;

    // A bare `recurse` node with no value cannot come from TOML either;
    // build it by hand. It counts as present, so registration proceeds
    // without recursion.
    let mut tree = NodeTree::new();
    let root = tree.alloc_empty();
    let watch = tree.alloc_section("watch");
    tree.push_child(root, watch);
    let entry = tree.alloc_section(dir.path().to_string_lossy());
    let recurse = tree.alloc_section("recurse");
    tree.push_child(entry, recurse);
    tree.push_child(watch, entry);

    let section = validate_config(&tree, root)?;
    let mut service = MockWatchService::new();
    let registration = register_all(&mut service, &tree, section)?;

    assert_eq!(registration.records.len(), 1);

    Ok(())
}

#[test]
fn validation_requires_a_populated_watch_section() -> TestResult {
    common::init_tracing();
    let dir = tempdir()?;

    let path = common::write_config(dir.path(), "[other]\nkey = \"value\"\n")?;
    let err = load_and_validate(&path).unwrap_err();
    assert!(err.to_string().contains("[watch]"));

    let path = common::write_config(dir.path(), "[watch]\n")?;
    let err = load_and_validate(&path).unwrap_err();
    assert!(err.to_string().contains("at least one entry"));

    Ok(())
}

#[test]
fn loaded_toml_scalars_classify_by_content() -> TestResult {
    common::init_tracing();
    let dir = tempdir()?;
    let config = r#"
[settings]
count = 3
ratio = 1.5
whole = 2.0
enabled = true
name = "watchtree"
items = ["a", "b"]
"#;
    let path = common::write_config(dir.path(), config)?;
    let (tree, root) = load_from_path(&path)?;
    let settings = tree.find_child(root, "settings").unwrap();

    let kind = |name: &str| {
        let node = tree.find_child(settings, name).unwrap();
        tree.value_kind(node)
    };
    assert_eq!(kind("count"), ValueKind::Int);
    assert_eq!(kind("ratio"), ValueKind::Double);
    // Whole floats keep one decimal place and stay doubles.
    assert_eq!(kind("whole"), ValueKind::Double);
    assert_eq!(kind("enabled"), ValueKind::Bool);
    assert_eq!(kind("name"), ValueKind::String);
    assert_eq!(kind("items"), ValueKind::List);

    let count = tree.find_child(settings, "count").unwrap();
    assert_eq!(tree.value_i64(count), 3);
    let whole = tree.find_child(settings, "whole").unwrap();
    assert_eq!(tree.value_str(whole), Some("2.0"));

    Ok(())
}
