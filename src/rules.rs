//! The gate rewrite rule table.
//!
//! Each rule pairs a detection regex with a short-circuit statement that is
//! inserted immediately after the matched method header. The matched text
//! itself is never rewritten and the original body stays in place as dead
//! code, which keeps the rules robust to unknown body content and makes
//! every patch reversible from the backup.
//!
//! The target script is minified JavaScript; these patterns treat it as
//! plain text. No parsing happens anywhere in this crate.

use regex::Regex;
use std::sync::LazyLock;

/// A single gate rewrite: detection pattern plus injected short-circuit.
///
/// Rules are stateless and reusable across runs. They target disjoint
/// methods, but table order stays fixed so output is reproducible.
pub struct RewriteRule {
    pub id: &'static str,
    pub pattern: Regex,
    /// Statement inserted directly after each matched span.
    pub inject: &'static str,
    pub description: &'static str,
}

/// Match statistics for one rule over one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SiteCount {
    /// Sites where the detection pattern matched.
    pub matched: usize,
    /// Sites that received a new insertion.
    pub inserted: usize,
}

impl RewriteRule {
    fn new(
        id: &'static str,
        pattern: &str,
        inject: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            id,
            pattern: Regex::new(pattern).expect("builtin rule pattern"),
            inject,
            description,
        }
    }

    /// Insert the short-circuit after every match whose following text does
    /// not already begin with it.
    ///
    /// The skip check is what makes reruns no-ops: the pattern still
    /// matches a patched method header, but the injection sits right after
    /// the brace, so the site is recognized and left alone.
    pub fn apply(&self, content: &str) -> (String, SiteCount) {
        let mut count = SiteCount::default();
        let mut out = String::with_capacity(content.len() + self.inject.len());
        let mut last = 0;

        for found in self.pattern.find_iter(content) {
            count.matched += 1;
            out.push_str(&content[last..found.end()]);
            last = found.end();

            let after = &content[found.end()..];
            if after.trim_start().starts_with(self.inject.trim_start()) {
                continue;
            }
            count.inserted += 1;
            out.push_str(self.inject);
        }
        out.push_str(&content[last..]);

        (out, count)
    }
}

static BUILTIN_RULES: LazyLock<[RewriteRule; 3]> = LazyLock::new(|| {
    [
        RewriteRule::new(
            "force-is-pro",
            r"isPro\s*\([^)]*\)\s*\{",
            " return true;",
            "isPro() answers true on entry",
        ),
        RewriteRule::new(
            "resolve-pro-status",
            r"async\s+checkProStatus\s*\([^)]*\)\s*\{",
            " return Promise.resolve(true);",
            "checkProStatus() resolves to true immediately",
        ),
        RewriteRule::new(
            "silence-upgrade-prompt",
            r"static\s+showUpgradePrompt\s*\([^)]*\)\s*\{",
            " return;",
            "showUpgradePrompt() returns without showing anything",
        ),
    ]
});

/// The three gate rules, in fixed table order.
pub fn builtin_rules() -> &'static [RewriteRule] {
    &BUILTIN_RULES[..]
}
