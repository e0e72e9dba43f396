//! Compiled path matchers for chain stages.
//!
//! A stage may carry one or more pattern strings. Each pattern is compiled
//! eagerly into a regex anchored to the full request path (`^pattern$`), so a
//! pattern matches the whole path or not at all, never a substring.
//!
//! A stage's patterns combine with AND semantics: the stage runs only when
//! **every** pattern matches the path. This is the deliberate (and
//! non-obvious) policy of this engine; most frameworks OR their matcher
//! lists. An empty pattern list matches every path.
//!
//! Matching is case-sensitive and trailing slashes are significant; a
//! pattern must account for them itself (e.g. `/docs(/.*)?`).

use hermes_core::{HermesError, HermesResult};
use regex::Regex;

/// A compiled predicate over request paths.
///
/// # Example
///
/// ```
/// use hermes_chain::matcher::PathMatcher;
///
/// let matcher = PathMatcher::compile(["/(en|th)/dashboard"]).unwrap();
/// assert!(matcher.matches("/en/dashboard"));
/// assert!(!matcher.matches("/ja/dashboard"));
/// assert!(!matcher.matches("/en/dashboard/settings"));
/// ```
#[derive(Debug, Clone)]
pub struct PathMatcher {
    patterns: Vec<Regex>,
}

impl PathMatcher {
    /// Compiles one or more pattern strings into an anchored matcher.
    ///
    /// Compilation is eager: the first invalid pattern fails with
    /// [`HermesError::Configuration`], so bad patterns surface at build time
    /// rather than on the first matching request. Note that the `regex`
    /// crate rejects look-around, so patterns like `/((?!auth|api).*)` are a
    /// configuration error here; express exclusions as stage-level skip
    /// prefixes instead.
    pub fn compile<I, S>(patterns: I) -> HermesResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut compiled = Vec::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let regex = Regex::new(&format!("^{pattern}$"))
                .map_err(|e| HermesError::configuration(pattern, e.to_string()))?;
            compiled.push(regex);
        }
        Ok(Self { patterns: compiled })
    }

    /// Returns `true` if the path satisfies **all** patterns.
    ///
    /// An empty pattern list matches every path.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.patterns.iter().all(|pattern| pattern.is_match(path))
    }

    /// Returns the number of compiled patterns.
    #[must_use]
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }
}
