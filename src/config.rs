use std::path::{Path, PathBuf};

/// Identifies the extension to patch and where its bundled script lives.
///
/// Passed into the run as a value so tests can point the patcher at a
/// synthetic install tree instead of the real VS Code extensions root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchTarget {
    /// Marketplace publisher id, e.g. "munkhin"
    pub publisher: String,
    /// Extension name as it appears in install directory names
    pub extension: String,
    /// Bundled script path relative to the install directory
    pub script_path: PathBuf,
}

impl PatchTarget {
    /// The Auto Accept Agent extension this tool ships for.
    pub fn auto_accept_agent() -> Self {
        Self {
            publisher: "munkhin".to_string(),
            extension: "auto-accept-agent".to_string(),
            script_path: PathBuf::from("dist/extension.js"),
        }
    }

    /// Lowercase directory-name prefix shared by every installed version.
    ///
    /// Install directories are named `<publisher>.<extension>-<version>`.
    pub fn dir_prefix(&self) -> String {
        format!("{}.{}", self.publisher, self.extension).to_lowercase()
    }

    /// Resolve the bundled script inside a concrete install directory.
    pub fn script_in(&self, install_dir: &Path) -> PathBuf {
        install_dir.join(&self.script_path)
    }
}

/// Per-user VS Code extensions root (`~/.vscode/extensions`).
///
/// Returns `None` when the home directory cannot be determined.
pub fn default_extensions_root() -> Option<PathBuf> {
    home::home_dir().map(|home| home.join(".vscode").join("extensions"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dir_prefix_is_lowercase_publisher_dot_extension() {
        let target = PatchTarget {
            publisher: "MunkHin".to_string(),
            extension: "Auto-Accept-Agent".to_string(),
            script_path: PathBuf::from("dist/extension.js"),
        };
        assert_eq!(target.dir_prefix(), "munkhin.auto-accept-agent");
    }

    #[test]
    fn script_resolves_under_install_dir() {
        let target = PatchTarget::auto_accept_agent();
        let script = target.script_in(Path::new("/ext/munkhin.auto-accept-agent-0.3.1"));
        assert_eq!(
            script,
            PathBuf::from("/ext/munkhin.auto-accept-agent-0.3.1/dist/extension.js")
        );
    }
}
