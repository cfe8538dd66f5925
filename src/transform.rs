//! Applies the rule table to script content and stamps the patch marker.

use crate::rules::RewriteRule;

/// Sentinel line appended to transformed output. Its presence marks a file
/// as having been through the patcher; it carries no other state.
pub const PATCH_MARKER: &str = "// PATCHED BY AUTO ACCEPT PATCHER";

/// How a single rule fared against the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutcome {
    /// At least one site received a new short-circuit.
    Applied { sites: usize },
    /// The pattern matched, but every site already carries the injection.
    AlreadyApplied,
    /// The pattern matched nothing. Reported as a warning, not an error:
    /// the host code drifting is expected and must not abort the run.
    NotFound,
}

/// Output of one transformation pass. Produced fresh per run, never
/// persisted.
#[derive(Debug, Clone)]
pub struct Transformed {
    pub content: String,
    /// Per-rule outcome in table order.
    pub outcomes: Vec<(&'static str, RuleOutcome)>,
}

impl Transformed {
    /// True when at least one rule inserted new text this pass.
    pub fn any_applied(&self) -> bool {
        self.outcomes
            .iter()
            .any(|(_, outcome)| matches!(outcome, RuleOutcome::Applied { .. }))
    }
}

/// True if the content has been through the patcher before.
pub fn has_marker(content: &str) -> bool {
    content.contains(PATCH_MARKER)
}

/// Run every rule in table order against the content as rewritten by the
/// rules before it, then make sure the marker is present.
///
/// A rule counts as applied only when it inserted something new; matching
/// sites that already carry their injection leave it at `AlreadyApplied`.
/// The marker is appended once and only when absent, so repeated passes
/// over patched content return it byte-identical.
pub fn apply_rules(content: &str, rules: &[RewriteRule]) -> Transformed {
    let mut current = content.to_string();
    let mut outcomes = Vec::with_capacity(rules.len());

    for rule in rules {
        let (rewritten, count) = rule.apply(&current);
        let outcome = if count.inserted > 0 {
            RuleOutcome::Applied {
                sites: count.inserted,
            }
        } else if count.matched > 0 {
            RuleOutcome::AlreadyApplied
        } else {
            RuleOutcome::NotFound
        };
        outcomes.push((rule.id, outcome));
        current = rewritten;
    }

    if !has_marker(&current) {
        current.push('\n');
        current.push_str(PATCH_MARKER);
        current.push('\n');
    }

    Transformed {
        content: current,
        outcomes,
    }
}
