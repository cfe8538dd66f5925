//! Auto Accept Patcher: feature-gate unlock for the Auto Accept Agent
//! VS Code extension.
//!
//! The patcher locates the installed extension's bundled script and inserts
//! short-circuit returns into its premium gate methods, keeping the
//! original file as a `.bak` backup.
//!
//! # Architecture
//!
//! Transformations are an ordered, data-driven table of regex rules over
//! the script's text ([`rules`]); the script is never parsed as a program.
//! Each rule inserts a statement directly after its matched span, so the
//! original bodies survive as dead code and every change is reversible
//! from the backup.
//!
//! # Safety
//!
//! - The backup is written and fsynced before the target is touched
//! - The target is replaced atomically (tempfile + fsync + rename)
//! - Re-running over already-patched content is a no-op
//!
//! # Example
//!
//! ```no_run
//! use auto_accept_patcher::{apply_rules, builtin_rules, write_if_modified};
//! use std::fs;
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let script = Path::new("dist/extension.js");
//! let original = fs::read_to_string(script)?;
//! let transformed = apply_rules(&original, builtin_rules());
//! let outcome = write_if_modified(script, &original, &transformed)?;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod locate;
pub mod rules;
pub mod transform;
pub mod writer;

// Re-exports
pub use config::{default_extensions_root, PatchTarget};
pub use locate::{find_install_dir, LocateError, Selection};
pub use rules::{builtin_rules, RewriteRule, SiteCount};
pub use transform::{apply_rules, has_marker, RuleOutcome, Transformed, PATCH_MARKER};
pub use writer::{
    backup_path, restore, write_if_modified, WriteError, WriteOutcome, BACKUP_SUFFIX,
};
