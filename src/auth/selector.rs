// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Selector compilation.
//!
//! A selector names one or more RPC methods in `Service.Method` form. It may
//! end in `*` to cover every method below a segment boundary (`Service.*`),
//! or be exactly `*` to cover everything.
//!
//! Selectors are compiled once, at policy build time, into [`Matcher`]s.

use std::collections::HashSet;

/// Wildcard character accepted as the final character of a selector.
pub const WILDCARD: char = '*';

/// Segment delimiter of the selector form.
pub const SEPARATOR: char = '.';

/// A selector that could not be compiled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid selector {selector:?}: {reason}")]
pub struct InvalidSelector {
    pub selector: String,
    pub reason: &'static str,
}

impl InvalidSelector {
    fn new(selector: &str, reason: &'static str) -> Self {
        Self {
            selector: selector.to_string(),
            reason,
        }
    }
}

/// Compiled form of a selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Matcher {
    /// Matches every path (`*`).
    Any,
    /// Matches one path exactly.
    Exact(String),
    /// Matches every path starting with the prefix. The prefix always ends
    /// with [`SEPARATOR`], so matching is anchored on whole segments.
    Prefix(String),
}

impl Matcher {
    /// Compile a raw selector.
    pub fn compile(raw: &str) -> Result<Self, InvalidSelector> {
        if raw.is_empty() {
            return Err(InvalidSelector::new(raw, "selector is empty"));
        }

        let Some(wildcard_at) = raw.find(WILDCARD) else {
            return Ok(Matcher::Exact(raw.to_string()));
        };

        if wildcard_at != raw.len() - 1 {
            return Err(InvalidSelector::new(
                raw,
                "wildcard is only allowed as the final character",
            ));
        }

        if raw.len() == 1 {
            return Ok(Matcher::Any);
        }

        let prefix = &raw[..wildcard_at];
        if !prefix.ends_with(SEPARATOR) {
            return Err(InvalidSelector::new(
                raw,
                "wildcard must follow a segment separator",
            ));
        }

        Ok(Matcher::Prefix(prefix.to_string()))
    }

    /// Check a path in selector form (`Service.Method`).
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Matcher::Any => true,
            Matcher::Exact(exact) => path == exact,
            Matcher::Prefix(prefix) => path.starts_with(prefix.as_str()),
        }
    }
}

/// An unordered set of matchers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatcherSet {
    matchers: HashSet<Matcher>,
}

impl MatcherSet {
    pub fn insert(&mut self, matcher: Matcher) {
        self.matchers.insert(matcher);
    }

    /// Reduce the set to `{Any}` when it contains the match-everything
    /// matcher; every other entry is redundant then.
    pub fn collapse(&mut self) {
        if self.matchers.contains(&Matcher::Any) && self.matchers.len() > 1 {
            self.matchers = HashSet::from([Matcher::Any]);
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        self.matchers.iter().any(|m| m.matches(path))
    }

    pub fn matches_everything(&self) -> bool {
        self.matchers.contains(&Matcher::Any)
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

impl FromIterator<Matcher> for MatcherSet {
    fn from_iter<I: IntoIterator<Item = Matcher>>(iter: I) -> Self {
        let mut set = MatcherSet {
            matchers: iter.into_iter().collect(),
        };
        set.collapse();
        set
    }
}
