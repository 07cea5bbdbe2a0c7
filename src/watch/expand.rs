// src/watch/expand.rs

//! Shell-style expansion of configured path patterns.
//!
//! Watch entry names are written the way a shell user would write them:
//! `$VAR` and `${VAR}` environment references, a leading `~`, and glob
//! components like `proj*`. Expansion resolves all three against the real
//! environment and filesystem and returns the matching paths, sorted and
//! canonicalized.
//!
//! A pattern without glob characters is passed through even if the path does
//! not exist; whether it is watchable is decided at registration time. A
//! glob pattern yields only paths that exist, so it can legitimately expand
//! to nothing.

use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};

use globset::Glob;
use tracing::debug;

/// Expand one configured pattern into concrete paths.
pub fn expand_pattern(pattern: &str) -> Vec<PathBuf> {
    let substituted = substitute_vars(pattern);
    let expanded = expand_tilde(&substituted);
    if expanded.is_empty() {
        return Vec::new();
    }
    if !has_glob(&expanded) {
        return vec![canonical_or_original(PathBuf::from(expanded))];
    }
    let mut matches = glob_walk(Path::new(&expanded));
    matches.sort();
    matches.dedup();
    debug!(pattern, matches = matches.len(), "expanded glob pattern");
    matches.into_iter().map(canonical_or_original).collect()
}

/// Replace `$VAR` and `${VAR}` with the variable's value. Unset variables
/// become the empty string, like in a shell. A `$` that starts no variable
/// name stays literal.
fn substitute_vars(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '$' {
            out.push(ch);
            continue;
        }
        if chars.peek() == Some(&'{') {
            chars.next();
            let mut name = String::new();
            for inner in chars.by_ref() {
                if inner == '}' {
                    break;
                }
                name.push(inner);
            }
            out.push_str(&env::var(&name).unwrap_or_default());
        } else {
            let mut name = String::new();
            while let Some(&next) = chars.peek() {
                if next.is_ascii_alphanumeric() || next == '_' {
                    name.push(next);
                    chars.next();
                } else {
                    break;
                }
            }
            if name.is_empty() {
                out.push('$');
            } else {
                out.push_str(&env::var(&name).unwrap_or_default());
            }
        }
    }
    out
}

/// Resolve a leading `~` or `~/...` against the home directory. `~user`
/// forms and mid-string tildes stay literal.
fn expand_tilde(pattern: &str) -> String {
    if pattern == "~" {
        if let Some(home) = dirs::home_dir() {
            return home.to_string_lossy().into_owned();
        }
    } else if let Some(rest) = pattern.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest).to_string_lossy().into_owned();
        }
    }
    pattern.to_string()
}

fn has_glob(text: &str) -> bool {
    text.chars().any(|ch| matches!(ch, '*' | '?' | '['))
}

/// Walk the pattern component by component, branching out at every glob
/// component by matching it against directory entries.
fn glob_walk(pattern: &Path) -> Vec<PathBuf> {
    let mut current: Vec<PathBuf> = Vec::new();
    let mut started = false;
    for component in pattern.components() {
        match component {
            Component::RootDir => {
                current = vec![PathBuf::from("/")];
                started = true;
            }
            Component::Prefix(prefix) => {
                current = vec![PathBuf::from(prefix.as_os_str())];
                started = true;
            }
            Component::CurDir => {
                if !started {
                    current = vec![PathBuf::from(".")];
                    started = true;
                }
            }
            Component::ParentDir => {
                if !started {
                    current = vec![PathBuf::from("..")];
                    started = true;
                } else {
                    current = current.into_iter().map(|base| base.join("..")).collect();
                }
            }
            Component::Normal(part) => {
                if !started {
                    current = vec![PathBuf::from(".")];
                    started = true;
                }
                let part_str = part.to_string_lossy();
                if has_glob(&part_str) {
                    let matcher = match Glob::new(&part_str) {
                        Ok(glob) => glob.compile_matcher(),
                        Err(err) => {
                            debug!(pattern = %part_str, error = %err, "invalid glob component");
                            return Vec::new();
                        }
                    };
                    let hidden_ok = part_str.starts_with('.');
                    let mut next = Vec::new();
                    for base in &current {
                        let Ok(entries) = fs::read_dir(base) else {
                            continue;
                        };
                        for entry in entries.flatten() {
                            let name = entry.file_name();
                            let name_str = name.to_string_lossy();
                            // Globs skip dotfiles unless the pattern asks
                            // for them, matching shell behaviour.
                            if name_str.starts_with('.') && !hidden_ok {
                                continue;
                            }
                            if matcher.is_match(&*name_str) {
                                next.push(entry.path());
                            }
                        }
                    }
                    current = next;
                } else {
                    current = current
                        .into_iter()
                        .map(|base| base.join(part))
                        .filter(|joined| joined.exists())
                        .collect();
                }
            }
        }
        if started && current.is_empty() {
            return Vec::new();
        }
    }
    current
}

fn canonical_or_original(path: PathBuf) -> PathBuf {
    fs::canonicalize(&path).unwrap_or(path)
}
