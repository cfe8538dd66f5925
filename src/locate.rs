//! Install-directory discovery under the extensions root.
//!
//! VS Code keeps each installed extension in a directory named
//! `<publisher>.<extension>-<version>`. The locator lists the root one
//! level deep, keeps directories matching the expected prefix
//! (case-insensitive), and picks the last candidate in sort order.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum LocateError {
    #[error("extensions directory not found at {}", .0.display())]
    RootMissing(PathBuf),

    #[error("no installed extension matches '{prefix}*' under {}", .root.display())]
    InstallNotFound {
        prefix: String,
        root: PathBuf,
        /// Closest directory name seen, for "did you mean" output.
        suggestion: Option<String>,
    },

    #[error("failed to list {}: {source}", .path.display())]
    List {
        path: PathBuf,
        source: walkdir::Error,
    },
}

/// How to pick the "latest" install when several versions coexist.
///
/// VS Code normally keeps a single version per extension, so the plain
/// string sort is almost always right. It does invert orderings like
/// `1.9.0` vs `1.10.0`; `TrailingVersion` handles those by parsing the
/// version suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    /// Sort candidate names as strings ascending and take the last.
    #[default]
    Lexicographic,
    /// Order by the trailing `-<version>` suffix where it parses as
    /// semver, falling back to string order otherwise.
    TrailingVersion,
}

impl Selection {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        match self {
            Selection::Lexicographic => a.cmp(b),
            Selection::TrailingVersion => match (trailing_version(a), trailing_version(b)) {
                (Some(va), Some(vb)) => va.cmp(&vb).then_with(|| a.cmp(b)),
                _ => a.cmp(b),
            },
        }
    }
}

/// Parse the `-<semver>` suffix of an install directory name.
fn trailing_version(name: &str) -> Option<semver::Version> {
    let (_, version) = name.rsplit_once('-')?;
    semver::Version::parse(version).ok()
}

/// Find the installed extension directory whose name starts with `prefix`
/// (case-insensitive), picking the last candidate per `selection`.
pub fn find_install_dir(
    root: &Path,
    prefix: &str,
    selection: Selection,
) -> Result<PathBuf, LocateError> {
    if !root.is_dir() {
        return Err(LocateError::RootMissing(root.to_path_buf()));
    }

    let wanted = prefix.to_lowercase();
    let mut candidates = Vec::new();
    let mut rejected = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|source| LocateError::List {
            path: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.to_lowercase().starts_with(&wanted) {
            candidates.push(name);
        } else {
            rejected.push(name);
        }
    }

    candidates.sort_by(|a, b| selection.compare(a, b));

    match candidates.pop() {
        Some(latest) => Ok(root.join(latest)),
        None => Err(LocateError::InstallNotFound {
            prefix: prefix.to_string(),
            root: root.to_path_buf(),
            suggestion: closest_name(&wanted, &rejected),
        }),
    }
}

/// Closest non-matching directory name, for "did you mean" output.
fn closest_name(wanted: &str, rejected: &[String]) -> Option<String> {
    rejected
        .iter()
        .map(|name| (strsim::jaro_winkler(wanted, &name.to_lowercase()), name))
        .filter(|(score, _)| *score > 0.8)
        .max_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, name)| name.clone())
}
