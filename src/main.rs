use anyhow::{bail, Context, Result};
use auto_accept_patcher::{
    apply_rules, builtin_rules, default_extensions_root, find_install_dir, has_marker, restore,
    write_if_modified, LocateError, PatchTarget, RuleOutcome, Selection, WriteOutcome,
};
use clap::Parser;
use colored::Colorize;
use similar::{ChangeTag, TextDiff};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "auto-accept-patcher")]
#[command(about = "Unlock the premium feature gates in the Auto Accept Agent extension", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the installed extension directory (discovered under
    /// ~/.vscode/extensions when omitted)
    #[arg(value_name = "INSTALL_DIR")]
    install_dir: Option<PathBuf>,

    /// Show what would change without writing anything
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Print a unified diff of the transformation
    #[arg(short, long)]
    diff: bool,

    /// Copy the backup back over the patched script and exit
    #[arg(long, conflicts_with_all = ["dry_run", "diff"])]
    restore: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let target = PatchTarget::auto_accept_agent();

    let install_dir = resolve_install_dir(cli.install_dir, &target)?;
    let script = target.script_in(&install_dir);

    if cli.restore {
        return cmd_restore(&script);
    }

    if !script.is_file() {
        bail!("target script not found: {}", script.display());
    }

    cmd_apply(&script, cli.dry_run, cli.diff)
}

/// Explicit path wins; otherwise discover under the per-user extensions
/// root with the default selection strategy.
fn resolve_install_dir(explicit: Option<PathBuf>, target: &PatchTarget) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        println!(
            "{}",
            format!("Using provided path: {}", dir.display()).dimmed()
        );
        return Ok(dir);
    }

    let root = default_extensions_root().context("could not determine the home directory")?;

    match find_install_dir(&root, &target.dir_prefix(), Selection::default()) {
        Ok(dir) => {
            println!("{}", format!("Found extension: {}", dir.display()).dimmed());
            Ok(dir)
        }
        Err(err) => {
            if let LocateError::InstallNotFound { suggestion, .. } = &err {
                if let Some(name) = suggestion {
                    eprintln!("{}", format!("Closest installed directory: {name}").yellow());
                }
                eprintln!(
                    "{}",
                    "Install the official Auto Accept Agent extension first.".yellow()
                );
            }
            Err(err.into())
        }
    }
}

fn cmd_apply(script: &Path, dry_run: bool, show_diff: bool) -> Result<()> {
    let original = fs::read_to_string(script)
        .with_context(|| format!("failed to read {}", script.display()))?;

    if has_marker(&original) {
        println!(
            "{}",
            "Script already carries the patch marker; re-checking the gates.".yellow()
        );
    }

    let rules = builtin_rules();
    let transformed = apply_rules(&original, rules);

    for ((id, outcome), rule) in transformed.outcomes.iter().zip(rules) {
        match outcome {
            RuleOutcome::Applied { sites } => {
                let noun = if *sites == 1 { "site" } else { "sites" };
                println!(
                    "{} {}: {} ({} {})",
                    "✓".green(),
                    id,
                    rule.description,
                    sites,
                    noun
                );
            }
            RuleOutcome::AlreadyApplied => {
                println!("{} {}: already patched", "⊙".yellow(), id);
            }
            RuleOutcome::NotFound => {
                println!(
                    "{} {}: pattern not found (the extension code may have changed)",
                    "⚠".yellow(),
                    id
                );
            }
        }
    }

    if show_diff && original != transformed.content {
        display_diff(script, &original, &transformed.content);
    }

    if dry_run {
        println!("{}", "[DRY RUN - nothing written]".cyan());
        return Ok(());
    }

    match write_if_modified(script, &original, &transformed)? {
        WriteOutcome::Written { backup } => {
            println!("Created backup at {}", backup.display());
            println!("{}", format!("Patched {}", script.display()).green());
            println!(
                "{}",
                "Restart VS Code (Reload Window) for the change to take effect.".bold()
            );
        }
        WriteOutcome::Unchanged => {
            println!(
                "{}",
                "No new patterns matched; file left untouched.".yellow()
            );
        }
    }

    Ok(())
}

fn cmd_restore(script: &Path) -> Result<()> {
    let backup = restore(script)?;
    println!(
        "{}",
        format!("Restored {} from {}", script.display(), backup.display()).green()
    );
    println!(
        "{}",
        "Restart VS Code (Reload Window) for the change to take effect.".bold()
    );
    Ok(())
}

/// Unified diff between the original and transformed script.
fn display_diff(file: &Path, original: &str, modified: &str) {
    println!(
        "\n{}",
        format!("--- {} (original)", file.display()).dimmed()
    );
    println!("{}", format!("+++ {} (patched)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, modified);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", sign);
    }
}
