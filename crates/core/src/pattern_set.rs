// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! A collection of [`PatternRecord`]s plus the three Aho-Corasick tiers
//! built from their seed literals: full (every literal), hot (a curated,
//! L1-resident subset of the highest-frequency patterns), and sentinel (a
//! fixed set of compliance/secret trigger tokens, independent of which
//! patterns were actually added).

use crate::automaton::{Automaton, AutomatonBuilder};
use crate::config::{
    self, DEFAULT_HOT_PATTERN_NAMES, DEFAULT_MAX_STATES, DEFAULT_SENTINEL_TOKENS,
    DEFAULT_REGEX_BACKTRACK_LIMIT, MAX_PATTERNS,
};
use crate::error::{Error, Result};
use crate::pattern::PatternRecord;

/// A pattern set under construction, before [`PatternSet::build`] is
/// called. Mirrors the original `PatternSet`'s `built == false` state:
/// patterns can be added, but no automaton exists yet.
pub struct PatternSetBuilder {
    patterns: Vec<PatternRecord>,
    max_patterns: usize,
    max_states: usize,
    regex_backtrack_limit: usize,
}

impl PatternSetBuilder {
    pub fn new(max_patterns: usize, max_states: usize, regex_backtrack_limit: usize) -> Self {
        Self {
            patterns: Vec::new(),
            max_patterns,
            max_states,
            regex_backtrack_limit,
        }
    }

    pub fn count(&self) -> usize {
        self.patterns.len()
    }

    /// Add a pattern. `literal` is optional — patterns with no literal that
    /// reliably prefixes every match (e.g. `credit_card`, `ssn`) are only
    /// ever found by the regex verifier running unconditionally, bypassing
    /// every Aho-Corasick tier.
    pub fn add(
        &mut self,
        name: &str,
        literal: Option<&[u8]>,
        regex: &str,
        replacement: Option<&str>,
    ) -> Result<u32> {
        if self.patterns.len() >= self.max_patterns {
            return Err(Error::CapacityReached(self.max_patterns));
        }

        let id = self.patterns.len() as u32;
        let record = PatternRecord::new(
            id,
            name,
            literal,
            regex,
            replacement,
            self.regex_backtrack_limit,
        )?;
        self.patterns.push(record);
        Ok(id)
    }

    /// Build the full, hot, and sentinel automata and finalize the set.
    pub fn build(self) -> Result<PatternSet> {
        let mut full_builder = AutomatonBuilder::new(self.max_states);
        for p in self.patterns.iter().filter(|p| p.has_literal()) {
            full_builder.insert(p.literal.as_ref().unwrap(), p.id)?;
        }
        let full_ac = Automaton::from_builder(full_builder)?;

        let hot_ac = build_hot_automaton(&self.patterns)?;
        let sentinel_ac = build_sentinel_automaton()?;

        Ok(PatternSet {
            patterns: self.patterns,
            full_ac,
            hot_ac,
            sentinel_ac,
        })
    }
}

/// Select the literals named in [`DEFAULT_HOT_PATTERN_NAMES`] (in priority
/// order, capped at [`config::HOT_AC_SIZE`]) and build a small automaton
/// from them, always as a flat table (spec.md §4.5 step 3: the hot tier is
/// forced flat so it stays L1-resident regardless of state count) rather
/// than left to `Automaton::from_builder`'s size-based default. Absent
/// entirely if none of those names were added — callers (the redactor)
/// treat a `None` hot tier as "skip straight to full", matching the
/// original's `ps->hot_ac = NULL` fallback.
fn build_hot_automaton(patterns: &[PatternRecord]) -> Result<Option<Automaton>> {
    let mut builder = AutomatonBuilder::new(DEFAULT_MAX_STATES);
    let mut hot_count = 0usize;

    for &hot_name in DEFAULT_HOT_PATTERN_NAMES {
        if hot_count >= config::HOT_AC_SIZE {
            break;
        }
        if let Some(p) = patterns
            .iter()
            .find(|p| p.name == hot_name && p.has_literal())
        {
            builder.insert(p.literal.as_ref().unwrap(), p.id)?;
            hot_count += 1;
        }
    }

    if hot_count == 0 {
        return Ok(None);
    }
    Automaton::from_builder_flat(builder).map(Some)
}

/// Build the fixed sentinel automaton from [`DEFAULT_SENTINEL_TOKENS`], as a
/// forced-flat table (spec.md §4.5 step 4) so a growing token list never
/// silently flips the sentinel gate over to the compressed representation.
/// Unlike `full_ac`/`hot_ac`, this never depends on which patterns were
/// added — it exists purely to answer "could anything in this line matter
/// at all?" before any per-pattern work happens.
fn build_sentinel_automaton() -> Result<Automaton> {
    let mut builder = AutomatonBuilder::new(DEFAULT_MAX_STATES);
    for (i, &token) in DEFAULT_SENTINEL_TOKENS.iter().enumerate() {
        builder.insert(token.as_bytes(), i as u32)?;
    }
    Automaton::from_builder_flat(builder)
}

/// A built, ready-to-scan pattern set.
pub struct PatternSet {
    patterns: Vec<PatternRecord>,
    pub(crate) full_ac: Automaton,
    pub(crate) hot_ac: Option<Automaton>,
    pub(crate) sentinel_ac: Automaton,
}

impl PatternSet {
    pub(crate) fn get(&self, id: u32) -> Option<&PatternRecord> {
        self.patterns.get(id as usize)
    }

    /// Number of patterns in the set (spec.md §6 `count(set)`).
    pub fn count(&self) -> usize {
        self.patterns.len()
    }

    pub(crate) fn patterns(&self) -> &[PatternRecord] {
        &self.patterns
    }
}

/// Construct a builder pre-loaded with the default secret/PII patterns,
/// grounded directly in the original implementation's
/// `patterns_add_defaults`: AWS access keys, a prefixed AWS secret key, a
/// GitHub personal access token and OAuth token, a generic API key,
/// generic secret, password-in-config, a PEM private key header, a JWT, a
/// Slack token, a bare credit card number, an email address, an IPv4
/// address, and an SSN.
pub fn default_patterns() -> Result<PatternSetBuilder> {
    let mut builder = PatternSetBuilder::new(
        MAX_PATTERNS,
        DEFAULT_MAX_STATES,
        DEFAULT_REGEX_BACKTRACK_LIMIT,
    );

    builder.add("aws_access_key", Some(b"AKIA"), r"AKIA[0-9A-Z]{16}", None)?;
    builder.add(
        "aws_secret_key",
        Some(b"aws_secret"),
        r#"aws_secret_access_key["'\s:=]+[A-Za-z0-9/+=]{40}"#,
        None,
    )?;
    builder.add("github_token", Some(b"ghp_"), r"ghp_[A-Za-z0-9]{36}", None)?;
    builder.add("github_oauth", Some(b"gho_"), r"gho_[A-Za-z0-9]{36}", None)?;
    builder.add(
        "api_key",
        Some(b"api_key"),
        r#"api[_-]?key["'\s:=]+[A-Za-z0-9_-]{20,}"#,
        None,
    )?;
    builder.add(
        "generic_secret",
        Some(b"secret"),
        r#"secret["'\s:=]+[A-Za-z0-9_-]{8,}"#,
        None,
    )?;
    builder.add(
        "password",
        Some(b"password"),
        r#"password["'\s:=]+[^\s"']{4,}"#,
        None,
    )?;
    builder.add(
        "private_key",
        Some(b"-----BEGIN"),
        r"-----BEGIN[A-Z ]+PRIVATE KEY-----",
        None,
    )?;
    builder.add(
        "jwt",
        Some(b"eyJ"),
        r"eyJ[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+",
        None,
    )?;
    builder.add(
        "slack_token",
        Some(b"xox"),
        r"xox[baprs]-[0-9A-Za-z-]{10,}",
        None,
    )?;
    builder.add(
        "bearer_token",
        Some(b"Bearer "),
        r"Bearer [A-Za-z0-9_.-]{10,}",
        None,
    )?;
    builder.add(
        "credit_card",
        None,
        r"\b[0-9]{4}[- ]?[0-9]{4}[- ]?[0-9]{4}[- ]?[0-9]{4}\b",
        None,
    )?;
    builder.add(
        "email",
        Some(b"@"),
        r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}",
        None,
    )?;
    builder.add(
        "ipv4",
        Some(b"."),
        r"\b[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\b",
        None,
    )?;
    builder.add("ssn", None, r"\b[0-9]{3}-[0-9]{2}-[0-9]{4}\b", None)?;

    Ok(builder)
}

#[cfg(test)]
#[path = "pattern_set_tests.rs"]
mod tests;
