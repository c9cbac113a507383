//! Glob patterns shared by every field comparison.
//!
//! `*` matches any run of characters (including none, and including `/`).
//! Every other character is literal. Matching is anchored at both ends and
//! case-insensitive.

use crate::error::MatchError;
use globset::{GlobBuilder, GlobMatcher};

/// A compiled glob pattern.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    matcher: GlobMatcher,
}

impl GlobPattern {
    /// Compile a pattern.
    pub fn new(pattern: &str) -> Result<Self, MatchError> {
        let translated = translate(pattern);
        let glob = GlobBuilder::new(&translated)
            .case_insensitive(true)
            .literal_separator(false)
            .backslash_escape(false)
            .build()
            .map_err(|e| MatchError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            matcher: glob.compile_matcher(),
        })
    }

    /// Test a whole value against the pattern.
    pub fn is_match(&self, value: &str) -> bool {
        self.matcher.is_match(value)
    }
}

/// Compile `pattern` and test `value` in one step.
pub fn glob_match(pattern: &str, value: &str) -> Result<bool, MatchError> {
    Ok(GlobPattern::new(pattern)?.is_match(value))
}

/// Rewrite a pattern so that only `*` keeps its glob meaning.
///
/// globset also gives `?`, `[...]` and `{a,b}` special meaning; each of those
/// characters is wrapped in a single-character class. Runs of `*` collapse to
/// one, since `**` has path semantics in globset.
fn translate(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut prev_star = false;

    for ch in pattern.chars() {
        match ch {
            '*' => {
                if !prev_star {
                    out.push('*');
                }
                prev_star = true;
                continue;
            }
            '?' | '[' | ']' | '{' | '}' => {
                out.push('[');
                out.push(ch);
                out.push(']');
            }
            _ => out.push(ch),
        }
        prev_star = false;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(pattern: &str, value: &str) -> bool {
        glob_match(pattern, value).unwrap()
    }

    #[test]
    fn test_literal_is_anchored() {
        assert!(matches("testhost.com", "testhost.com"));
        assert!(!matches("testhost.com", "testhost.com.bad"));
        assert!(!matches("testhost.com", "a.testhost.com"));
    }

    #[test]
    fn test_star_matches_any_run() {
        assert!(matches("*.com", "testhost.com"));
        assert!(!matches("*.com", "testhost.com.bad"));
        assert!(matches("/api/*", "/api/1"));
        assert!(matches("/api/*", "/api/v1/users/2"));
        assert!(matches("/api/*", "/api/"));
        assert!(matches("q=*", "q=anything-i-want"));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(matches("H*", "http"));
        assert!(matches("*T", "GET"));
        assert!(matches("get", "GET"));
    }

    #[test]
    fn test_empty_pattern_matches_only_empty() {
        assert!(matches("", ""));
        assert!(!matches("", "/a/1"));
    }

    #[test]
    fn test_other_glob_syntax_is_literal() {
        assert!(matches("a?c", "a?c"));
        assert!(!matches("a?c", "abc"));
        assert!(matches("[ab]", "[ab]"));
        assert!(!matches("[ab]", "a"));
        assert!(matches("{a,b}", "{a,b}"));
        assert!(!matches("{a,b}", "a"));
        assert!(matches("*{\"key\": 1}*", "x {\"key\": 1} y"));
    }

    #[test]
    fn test_repeated_stars_collapse() {
        assert!(matches("a**b", "axyzb"));
        assert!(matches("**", ""));
        assert_eq!(translate("a***b"), "a*b");
    }
}
