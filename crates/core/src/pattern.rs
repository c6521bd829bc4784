// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! A single named pattern: an optional seed literal for the Aho-Corasick
//! tiers, plus the regex that verifies (and ultimately matches) it.

use fancy_regex::Regex;

use crate::config::{MAX_LITERAL_LEN, MAX_PATTERN_NAME_LEN};
use crate::error::{Error, Result};

/// Default replacement text when a pattern is added without one, matching
/// the original `snprintf(p->replacement, ..., "[REDACTED:%s]", name)`.
fn default_replacement(name: &str) -> String {
    format!("[REDACTED:{name}]")
}

/// A single pattern definition: a name, an optional AC seed literal, a
/// verifying regex, and the text that replaces a verified match.
pub(crate) struct PatternRecord {
    pub name: String,
    pub literal: Option<Vec<u8>>,
    pub regex: Regex,
    pub replacement: String,
    pub id: u32,
}

impl PatternRecord {
    /// Build a pattern record. `literal` seeds the Aho-Corasick tiers (a
    /// pattern with no usable literal — e.g. `credit_card`, `ssn` in the
    /// default set — is only ever found by the regex verifier running
    /// directly, never pre-filtered). `regex_backtrack_limit` bounds the
    /// compiled regex's backtracking budget (see spec.md §7 /
    /// `Error::RegexLimitHit` at the redactor level).
    pub fn new(
        id: u32,
        name: &str,
        literal: Option<&[u8]>,
        regex_source: &str,
        replacement: Option<&str>,
        regex_backtrack_limit: usize,
    ) -> Result<Self> {
        if regex_source.is_empty() {
            return Err(Error::EmptyRegex(name.to_string()));
        }

        let name = truncate_str(name, MAX_PATTERN_NAME_LEN);
        let literal = literal
            .filter(|lit| !lit.is_empty())
            .map(|lit| truncate_bytes(lit, MAX_LITERAL_LEN));

        let regex = fancy_regex::RegexBuilder::new(regex_source)
            .backtrack_limit(regex_backtrack_limit)
            .build()
            .map_err(|source| Error::InvalidRegex {
                name: name.clone(),
                source: Box::new(source),
            })?;

        let replacement = match replacement {
            Some(r) if !r.is_empty() => r.to_string(),
            _ => default_replacement(&name),
        };

        Ok(Self {
            name,
            literal,
            regex,
            replacement,
            id,
        })
    }

    pub fn has_literal(&self) -> bool {
        self.literal.is_some()
    }
}

fn truncate_str(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        // Truncate on a char boundary, never splitting a multi-byte
        // sequence.
        let mut end = max_len;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        s[..end].to_string()
    }
}

fn truncate_bytes(bytes: &[u8], max_len: usize) -> Vec<u8> {
    bytes[..bytes.len().min(max_len)].to_vec()
}

#[cfg(test)]
#[path = "pattern_tests.rs"]
mod tests;
