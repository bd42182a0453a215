//! Path exclusion with glob patterns.

use std::path::Path;

use glob::Pattern;

use crate::Result;

/// Path filter for change events.
///
/// A path is ignored when its file name or its full path matches any of the
/// configured patterns. Matching is case-sensitive and `*` also matches `/`,
/// so `node_modules/*` matches everything beneath a relative `node_modules`.
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    patterns: Vec<Pattern>,
}

impl PathFilter {
    /// Create a filter from exclusion patterns.
    ///
    /// # Errors
    ///
    /// Returns an error if any pattern is not a valid glob.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Pattern::new(p.as_ref()).map_err(|e| {
                    crate::Error::config(format!("invalid pattern '{}': {e}", p.as_ref()))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    /// Check if a changed path should be ignored.
    #[must_use]
    pub fn should_ignore(&self, path: &Path) -> bool {
        let full = path.to_string_lossy();
        let name = path.file_name().map(|n| n.to_string_lossy());

        self.patterns.iter().any(|pattern| {
            name.as_deref().is_some_and(|n| pattern.matches(n)) || pattern.matches(&full)
        })
    }

    /// Configured patterns, in order.
    #[must_use]
    pub fn patterns(&self) -> Vec<&str> {
        self.patterns.iter().map(Pattern::as_str).collect()
    }
}
