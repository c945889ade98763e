//! Selection filters over checks/sinks, applied before planning.
//!
//! Grounded in the matching semantics spec.md §4.4 spells out exactly;
//! structured as small composable predicates the way the teacher structures
//! its `backends` selection (a trait object per strategy, picked by config).

use crate::feed::Scope;
use regex::Regex;
use std::collections::HashSet;

/// Anything the filter layer can be applied to: a fully qualified name and a
/// minimum scope. `Check` satisfies this; tests exercise it directly too.
pub trait Filterable {
    fn qualified_name(&self) -> &str;
    fn scope(&self) -> Scope;
}

pub trait SelectionFilter: std::fmt::Debug {
    fn matches(&self, target: &dyn Filterable) -> bool;
}

/// A single user-supplied token, compiled either as a case-insensitive regex
/// (if it contains `+` or `*`) or as a dotted sub-path matcher.
#[derive(Debug)]
pub struct PatternFilter {
    mode: PatternMode,
}

#[derive(Debug)]
enum PatternMode {
    Regex(Regex),
    SubPath(Vec<String>),
}

impl PatternFilter {
    pub fn new(token: &str) -> Result<Self, crate::error::QaError> {
        let mode = if token.contains('+') || token.contains('*') {
            let re = Regex::new(&format!("(?i)^(?:{token})"))
                .map_err(|e| crate::error::QaError::Configuration(format!("invalid pattern {token:?}: {e}")))?;
            PatternMode::Regex(re)
        } else {
            let parts = token.split('.').map(|p| p.to_lowercase()).collect();
            PatternMode::SubPath(parts)
        };
        Ok(PatternFilter { mode })
    }

    pub fn matches_name(&self, qualified_name: &str) -> bool {
        match &self.mode {
            PatternMode::Regex(re) => re.is_match(qualified_name),
            PatternMode::SubPath(tokens) => {
                let components: Vec<String> = qualified_name.split('.').map(|c| c.to_lowercase()).collect();
                if tokens.len() > components.len() {
                    return false;
                }
                components
                    .windows(tokens.len())
                    .any(|window| window == tokens.as_slice())
            }
        }
    }
}

impl SelectionFilter for PatternFilter {
    fn matches(&self, target: &dyn Filterable) -> bool {
        self.matches_name(target.qualified_name())
    }
}

/// Keeps targets matching any of the given patterns.
#[derive(Debug)]
pub struct Whitelist(pub Vec<PatternFilter>);

impl SelectionFilter for Whitelist {
    fn matches(&self, target: &dyn Filterable) -> bool {
        self.0.iter().any(|p| p.matches(target))
    }
}

/// Keeps targets matching none of the given patterns.
#[derive(Debug)]
pub struct Blacklist(pub Vec<PatternFilter>);

impl SelectionFilter for Blacklist {
    fn matches(&self, target: &dyn Filterable) -> bool {
        !self.0.iter().any(|p| p.matches(target))
    }
}

/// Keeps targets whose scope is in the given set.
#[derive(Debug)]
pub struct ScopeFilter(pub HashSet<Scope>);

impl SelectionFilter for ScopeFilter {
    fn matches(&self, target: &dyn Filterable) -> bool {
        self.0.contains(&target.scope())
    }
}

/// Applies a chain of filters in order; a target survives only if every
/// filter accepts it. The canonical composition is `Whitelist` then
/// `Blacklist`, but filters are idempotent and order otherwise doesn't
/// matter.
pub fn apply_all(filters: &[Box<dyn SelectionFilter>], target: &dyn Filterable) -> bool {
    filters.iter().all(|f| f.matches(target))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_subpath_matches_consecutive_components() {
        let f = PatternFilter::new("foo").unwrap();
        assert!(f.matches_name("a.foo.b"));
        assert!(f.matches_name("foo"));
        assert!(!f.matches_name("afoo.b"));
    }

    #[test]
    fn dotted_subpath_is_case_insensitive() {
        let f = PatternFilter::new("Foo").unwrap();
        assert!(f.matches_name("a.foo.b"));
    }

    #[test]
    fn regex_mode_triggers_on_plus_or_star() {
        let f = PatternFilter::new("checks.redundant*").unwrap();
        assert!(f.matches_name("checks.redundant_version.RedundantVersion"));
    }

    #[test]
    fn regex_mode_is_anchored_at_the_start_not_a_substring_search() {
        let f = PatternFilter::new("foo.*").unwrap();
        assert!(f.matches_name("foobar"));
        assert!(!f.matches_name("a.foobar"));
    }

    #[test]
    fn multi_component_subpath_requires_contiguous_match() {
        let f = PatternFilter::new("a.b").unwrap();
        assert!(f.matches_name("x.a.b.y"));
        assert!(!f.matches_name("a.x.b"));
    }
}
