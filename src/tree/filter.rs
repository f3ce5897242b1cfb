//! Name-based filtering of directory children

use glob::Pattern;

/// Set of ignore patterns matched against child names.
///
/// A pattern matches when it equals the name exactly or, if it is a valid
/// glob, when the glob matches. Invalid globs only match exactly.
#[derive(Debug, Clone, Default)]
pub struct IgnoreFilter {
    patterns: Vec<(String, Option<Pattern>)>,
}

impl IgnoreFilter {
    pub fn new(patterns: &[String]) -> Self {
        Self {
            patterns: patterns
                .iter()
                .map(|p| (p.clone(), Pattern::new(p).ok()))
                .collect(),
        }
    }

    /// Check if a child with this name should be left out.
    pub fn is_ignored(&self, name: &str) -> bool {
        self.patterns.iter().any(|(raw, glob)| {
            raw == name || glob.as_ref().is_some_and(|g| g.matches(name))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(patterns: &[&str]) -> IgnoreFilter {
        let owned: Vec<String> = patterns.iter().map(|s| s.to_string()).collect();
        IgnoreFilter::new(&owned)
    }

    #[test]
    fn test_glob_patterns() {
        let f = filter(&["*.log", "test?", "[abc].txt"]);
        assert!(f.is_ignored("debug.log"));
        assert!(!f.is_ignored("debug.txt"));
        assert!(f.is_ignored("test1"));
        assert!(!f.is_ignored("test12"));
        assert!(f.is_ignored("b.txt"));
        assert!(!f.is_ignored("d.txt"));
    }

    #[test]
    fn test_exact_name() {
        let f = filter(&["node_modules"]);
        assert!(f.is_ignored("node_modules"));
        assert!(!f.is_ignored("node_modules2"));
    }

    #[test]
    fn test_invalid_glob_matches_exactly() {
        let f = filter(&["[unclosed"]);
        assert!(f.is_ignored("[unclosed"));
        assert!(!f.is_ignored("u"));
    }

    #[test]
    fn test_empty_filter_ignores_nothing() {
        let f = IgnoreFilter::default();
        assert!(!f.is_ignored("anything"));
    }
}
