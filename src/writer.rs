//! Backup-then-replace write protocol.
//!
//! The backup is written and fsynced before the target is touched, and the
//! target is replaced via tempfile + fsync + rename, so a crash at any
//! point leaves either the original or the fully patched file on disk.

use crate::transform::Transformed;
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Suffix appended to the target file name for the backup copy.
pub const BACKUP_SUFFIX: &str = ".bak";

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("failed to write backup {}: {source}", .path.display())]
    Backup {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to replace {}: {source}", .path.display())]
    Replace {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("no backup found at {}", .0.display())]
    BackupMissing(PathBuf),

    #[error("target has no parent directory: {}", .0.display())]
    NoParent(PathBuf),
}

/// What the write decision did on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "WriteOutcome says whether the target changed on disk"]
pub enum WriteOutcome {
    /// Backup written, target replaced with the transformed content.
    Written { backup: PathBuf },
    /// No rule applied; neither target nor backup was touched.
    Unchanged,
}

/// Sibling path with the backup suffix appended to the full file name
/// (`extension.js` becomes `extension.js.bak`).
pub fn backup_path(target: &Path) -> PathBuf {
    let mut name = OsString::from(target.as_os_str());
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Back up the original and replace the target with the transformed
/// content, or do nothing at all when no rule inserted anything.
///
/// A prior backup at the same path is overwritten; last write wins.
pub fn write_if_modified(
    target: &Path,
    original: &str,
    transformed: &Transformed,
) -> Result<WriteOutcome, WriteError> {
    if !transformed.any_applied() {
        return Ok(WriteOutcome::Unchanged);
    }

    let backup = backup_path(target);
    write_synced(&backup, original).map_err(|source| WriteError::Backup {
        path: backup.clone(),
        source,
    })?;

    replace_file(target, &transformed.content)?;

    Ok(WriteOutcome::Written { backup })
}

/// Copy the backup back over the target. Returns the backup path read.
pub fn restore(target: &Path) -> Result<PathBuf, WriteError> {
    let backup = backup_path(target);
    if !backup.is_file() {
        return Err(WriteError::BackupMissing(backup));
    }
    fs::copy(&backup, target).map_err(|source| WriteError::Replace {
        path: target.to_path_buf(),
        source,
    })?;
    Ok(backup)
}

/// Whole-file write followed by fsync.
fn write_synced(path: &Path, content: &str) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()
}

/// Tempfile in the target's directory, fsync, rename over the target.
fn replace_file(target: &Path, content: &str) -> Result<(), WriteError> {
    let parent = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or_else(|| WriteError::NoParent(target.to_path_buf()))?;

    let stage = |parent: &Path| -> std::io::Result<()> {
        let mut temp = tempfile::NamedTempFile::new_in(parent)?;
        temp.write_all(content.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(target).map_err(|e| e.error)?;
        Ok(())
    };

    stage(parent).map_err(|source| WriteError::Replace {
        path: target.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::builtin_rules;
    use crate::transform::apply_rules;
    use tempfile::TempDir;

    #[test]
    fn backup_path_appends_suffix_to_full_name() {
        assert_eq!(
            backup_path(Path::new("/ext/dist/extension.js")),
            PathBuf::from("/ext/dist/extension.js.bak")
        );
    }

    #[test]
    fn written_outcome_leaves_backup_and_patched_target() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("extension.js");
        let original = "function isPro() { return false; }";
        fs::write(&target, original).unwrap();

        let transformed = apply_rules(original, builtin_rules());
        let outcome = write_if_modified(&target, original, &transformed).unwrap();

        let backup = match outcome {
            WriteOutcome::Written { backup } => backup,
            other => panic!("expected Written, got {other:?}"),
        };
        assert_eq!(fs::read_to_string(&backup).unwrap(), original);
        assert_eq!(fs::read_to_string(&target).unwrap(), transformed.content);
    }

    #[test]
    fn unchanged_outcome_touches_nothing() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("extension.js");
        let original = "function unrelated() { return 1; }";
        fs::write(&target, original).unwrap();

        let transformed = apply_rules(original, builtin_rules());
        let outcome = write_if_modified(&target, original, &transformed).unwrap();

        assert_eq!(outcome, WriteOutcome::Unchanged);
        assert_eq!(fs::read_to_string(&target).unwrap(), original);
        assert!(!backup_path(&target).exists());
    }

    #[test]
    fn prior_backup_is_overwritten() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("extension.js");
        let original = "function isPro() { return false; }";
        fs::write(&target, original).unwrap();
        fs::write(backup_path(&target), "stale backup").unwrap();

        let transformed = apply_rules(original, builtin_rules());
        write_if_modified(&target, original, &transformed).unwrap();

        assert_eq!(fs::read_to_string(backup_path(&target)).unwrap(), original);
    }

    #[test]
    fn restore_copies_backup_over_target() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("extension.js");
        fs::write(&target, "patched").unwrap();
        fs::write(backup_path(&target), "original").unwrap();

        restore(&target).unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "original");
    }

    #[test]
    fn restore_without_backup_fails() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("extension.js");
        fs::write(&target, "patched").unwrap();

        let err = restore(&target).unwrap_err();
        assert!(matches!(err, WriteError::BackupMissing(_)));
    }
}
