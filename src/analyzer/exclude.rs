//! Asset exclusion matchers
//!
//! Callers can exclude assets from analysis by plain string, regular
//! expression, or an arbitrary predicate over the filename. Matchers are
//! OR-combined: an asset matched by any of them is dropped.

use std::fmt;

use regex::Regex;

/// Predicate over an asset filename
pub type ExcludePredicate = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// One exclusion rule applied to asset filenames
pub enum ExcludeMatcher {
    /// Substring match against the filename
    Name(String),
    /// Regular-expression match against the filename
    Pattern(Regex),
    /// Arbitrary predicate over the filename
    Predicate(ExcludePredicate),
}

impl ExcludeMatcher {
    /// Compile a pattern string into a regex matcher
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(ExcludeMatcher::Pattern(Regex::new(pattern)?))
    }

    /// Whether this rule matches the given asset filename
    pub fn matches(&self, name: &str) -> bool {
        match self {
            ExcludeMatcher::Name(needle) => name.contains(needle.as_str()),
            ExcludeMatcher::Pattern(re) => re.is_match(name),
            ExcludeMatcher::Predicate(pred) => pred(name),
        }
    }
}

impl From<&str> for ExcludeMatcher {
    fn from(needle: &str) -> Self {
        ExcludeMatcher::Name(needle.to_string())
    }
}

impl From<String> for ExcludeMatcher {
    fn from(needle: String) -> Self {
        ExcludeMatcher::Name(needle)
    }
}

impl From<Regex> for ExcludeMatcher {
    fn from(re: Regex) -> Self {
        ExcludeMatcher::Pattern(re)
    }
}

impl fmt::Debug for ExcludeMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExcludeMatcher::Name(needle) => f.debug_tuple("Name").field(needle).finish(),
            ExcludeMatcher::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
            ExcludeMatcher::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}
