// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-worker redactor: the pipeline that turns one input line into either
//! the same line (no secrets found) or a rewritten one, via
//!
//! pre-filter -> sentinel -> hot -> full -> regex-verify -> rewrite
//!
//! Each stage is a cheaper, more specific reject than the one before it —
//! the prefilter and sentinel gates exist purely so the expensive full
//! automaton and the regex verifier only ever run on the minority of lines
//! that could plausibly contain something.

use tracing::warn;

use crate::automaton::AcMatch;
use crate::config::{Limits, VERIFY_BACKTRACK_WINDOW};
use crate::error::{Error, Result};
use crate::pattern_set::PatternSet;
use crate::prefilter::TriggerSet;

/// A single verified match location, post-regex, ready to be merged and
/// rewritten. Distinct from [`AcMatch`] in that `start`/`end` are exact
/// (regex-confirmed) byte offsets rather than an Aho-Corasick end-position
/// estimate.
#[derive(Clone, Copy)]
struct MatchLoc {
    start: usize,
    end: usize,
    pattern_id: u32,
}

/// Snapshot of a redactor's counters. Cheap to copy; read between batches
/// or summed across workers (see `executor.rs`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub lines_scanned: u64,
    pub lines_modified: u64,
    pub patterns_matched: u64,
    pub lines_prefiltered: u64,
    pub lines_sentinel_filtered: u64,
    pub output_truncated: u64,
    pub regex_limit_hit: u64,
}

impl Stats {
    /// Fold another worker's counters into this one, field by field —
    /// the "sum the per-worker fields" aggregation path spec.md §5
    /// allows as an alternative to atomic counters on a shared struct.
    pub(crate) fn merge(&mut self, other: &Stats) {
        self.lines_scanned += other.lines_scanned;
        self.lines_modified += other.lines_modified;
        self.patterns_matched += other.patterns_matched;
        self.lines_prefiltered += other.lines_prefiltered;
        self.lines_sentinel_filtered += other.lines_sentinel_filtered;
        self.output_truncated += other.output_truncated;
        self.regex_limit_hit += other.regex_limit_hit;
    }
}

/// Result of [`Redactor::process`]: either the input was clean (the caller
/// should use its own line, unmodified), or it was rewritten into the
/// redactor's internal output buffer.
pub enum Redacted<'a> {
    Unchanged,
    Rewritten(&'a [u8]),
}

/// Per-worker scratch state and pipeline, built against a shared, read-only
/// [`PatternSet`]. A `Redactor` is used by at most one thread at a time and
/// never shares mutable state with another (spec invariant; see
/// `executor.rs` for how that's enforced across a worker pool).
pub struct Redactor<'p, 'out> {
    patterns: &'p PatternSet,
    trigger_set: TriggerSet,
    trigger_set_is_exact: bool,
    output: &'out mut [u8],
    limits: Limits,
    stats: Stats,
    /// Scratch buffer the verifier rebuilds on every call: a byte-length-
    /// preserving ASCII projection of the line under verification (see
    /// `verify`'s doc comment). Pre-sized to `limits.max_line_size` at
    /// construction and only ever `clear`ed/`extend`ed afterwards, so
    /// `process` never grows the allocator's heap past construction time.
    ascii_scratch: Vec<u8>,
}

impl<'p, 'out> Redactor<'p, 'out> {
    /// Build a redactor over `patterns`, writing its output into the
    /// caller-supplied `output` buffer (typically arena-allocated — see
    /// `executor.rs`, which gives each worker its own arena and, in turn,
    /// its own redactor and output buffer).
    pub fn new(patterns: &'p PatternSet, output: &'out mut [u8], limits: Limits) -> Self {
        let root_row = patterns.full_ac.root_row();
        let trigger_set = TriggerSet::from_root_row(&root_row);
        let trigger_set_is_exact = trigger_set.is_exact(&root_row);
        let ascii_scratch = Vec::with_capacity(limits.max_line_size);
        Self {
            patterns,
            trigger_set,
            trigger_set_is_exact,
            output,
            limits,
            stats: Stats::default(),
            ascii_scratch,
        }
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = Stats::default();
    }

    /// Process one line, returning either [`Redacted::Unchanged`] (use the
    /// caller's own buffer) or [`Redacted::Rewritten`] pointing into this
    /// redactor's output buffer — valid until the next call to `process`
    /// on this same redactor.
    pub fn process(&mut self, line: &[u8]) -> Result<Redacted<'_>> {
        self.stats.lines_scanned += 1;

        if line.is_empty() {
            return Ok(Redacted::Unchanged);
        }
        if line.len() > self.limits.max_line_size {
            return Err(Error::OversizedInput {
                len: line.len(),
                max: self.limits.max_line_size,
            });
        }

        // Phase 0: SIMD trigger pre-filter. A "no trigger" verdict is only
        // trusted outright when the trigger set captured every byte the
        // full automaton's root row would act on; otherwise the sentinel
        // tier (below) is the safety net for patterns the capped trigger
        // set couldn't represent.
        if !self.trigger_set.is_empty()
            && self.trigger_set_is_exact
            && !self.trigger_set.has_trigger(line)
        {
            self.stats.lines_prefiltered += 1;
            return Ok(Redacted::Unchanged);
        }

        // Phase 1: sentinel gate, a cheap boolean reject.
        if !self.patterns.sentinel_ac.any_match(line) {
            self.stats.lines_sentinel_filtered += 1;
            return Ok(Redacted::Unchanged);
        }

        let mut ac_buf = [AcMatch { position: 0, pattern_id: 0, length: 0 }; crate::config::MAX_MATCHES_PER_LINE];

        // Phase 2: hot AC — a small, flat, L1-resident DFA over the
        // highest-frequency patterns. Most real matches are found here.
        if let Some(hot_ac) = &self.patterns.hot_ac {
            let count = hot_ac.scan_into(line, &mut ac_buf);
            if count > 0 {
                let mut verified = [MatchLoc { start: 0, end: 0, pattern_id: 0 }; crate::config::MAX_MATCHES_PER_LINE];
                let num_verified = self.verify(line, &ac_buf[..count], &mut verified)?;
                if num_verified > 0 {
                    return self.apply(line, &mut verified[..num_verified]);
                }
            }
        }

        // Phase 3: cold AC — the full automaton over every literal.
        let count = self.patterns.full_ac.scan_into(line, &mut ac_buf);
        if count == 0 {
            return Ok(Redacted::Unchanged);
        }

        let mut verified = [MatchLoc { start: 0, end: 0, pattern_id: 0 }; crate::config::MAX_MATCHES_PER_LINE];
        let num_verified = self.verify(line, &ac_buf[..count], &mut verified)?;
        if num_verified == 0 {
            return Ok(Redacted::Unchanged);
        }
        self.apply(line, &mut verified[..num_verified])
    }

    /// Run the regex verifier over each Aho-Corasick candidate, searching
    /// from a small window behind the AC hit (spec.md §4.6:
    /// `max(0, end_position - length - VERIFY_BACKTRACK_WINDOW)`) rather
    /// than from the start of the line.
    ///
    /// `fancy_regex::Regex` only matches `&str`, but spec.md §3/§4.1 treats
    /// `line` as an opaque byte sequence with no UTF-8 guarantee. Rather
    /// than `from_utf8(line).unwrap_or("")` — which silently turns any line
    /// with one invalid byte into an empty haystack, failing every
    /// candidate open and letting real secrets through unredacted — this
    /// rebuilds `line` into `self.ascii_scratch` as a byte-length-preserving
    /// ASCII projection: every ASCII byte passes through unchanged, every
    /// non-ASCII byte becomes a `NUL` placeholder. Every pattern's regex
    /// syntax and every default literal is ASCII-only, so no pattern could
    /// ever have matched a non-ASCII byte regardless; replacing it 1:1
    /// keeps every offset identical to `line`'s. That also sidesteps the
    /// other half of the problem: a pure-ASCII string is valid UTF-8 one
    /// byte at a time, so every `usize` offset into it is automatically a
    /// char boundary, which rules out the "`search_start` lands mid-
    /// codepoint" panic risk a multibyte `line` would otherwise carry.
    fn verify(
        &mut self,
        line: &[u8],
        candidates: &[AcMatch],
        out: &mut [MatchLoc],
    ) -> Result<usize> {
        self.ascii_scratch.clear();
        self.ascii_scratch
            .extend(line.iter().map(|&b| if b.is_ascii() { b } else { 0u8 }));
        let text = std::str::from_utf8(&self.ascii_scratch).unwrap_or_default();
        let mut num_verified = 0;

        for ac in candidates {
            if num_verified >= out.len() {
                break;
            }
            let Some(pattern) = self.patterns.get(ac.pattern_id) else {
                continue;
            };

            let search_start = (ac.position as isize - ac.length as isize
                - VERIFY_BACKTRACK_WINDOW as isize)
                .max(0) as usize;
            let search_start = search_start.min(text.len());

            match pattern.regex.find_from_pos(text, search_start) {
                Ok(Some(m)) => {
                    out[num_verified] = MatchLoc {
                        start: m.start(),
                        end: m.end(),
                        pattern_id: ac.pattern_id,
                    };
                    num_verified += 1;
                    self.stats.patterns_matched += 1;
                }
                Ok(None) => {}
                Err(_) => {
                    // Backtrack limit exceeded: fail closed (treat as "no
                    // match here"), never fatal to the line.
                    self.stats.regex_limit_hit += 1;
                    warn!(pattern = %pattern.name, "regex backtrack limit hit; skipping candidate");
                }
            }
        }

        Ok(num_verified)
    }

    /// Sort, merge overlapping matches (keeping the longest span), and
    /// build the rewritten line into `self.output`.
    fn apply(&mut self, line: &[u8], matches: &mut [MatchLoc]) -> Result<Redacted<'_>> {
        matches.sort_unstable_by_key(|m| m.start);

        let mut merged_count = 1usize;
        for i in 1..matches.len() {
            let curr = matches[i];
            if curr.start < matches[merged_count - 1].end {
                if curr.end > matches[merged_count - 1].end {
                    matches[merged_count - 1].end = curr.end;
                }
            } else {
                matches[merged_count] = curr;
                merged_count += 1;
            }
        }
        let matches = &matches[..merged_count];

        let mut out_pos = 0usize;
        let mut in_pos = 0usize;
        let mut truncated = false;

        for m in matches {
            let before_len = m.start - in_pos;
            if before_len > 0 {
                if out_pos + before_len >= self.output.len() {
                    truncated = true;
                    break;
                }
                self.output[out_pos..out_pos + before_len]
                    .copy_from_slice(&line[in_pos..in_pos + before_len]);
                out_pos += before_len;
            }

            if let Some(pattern) = self.patterns.get(m.pattern_id) {
                let replacement = pattern.replacement.as_bytes();
                if out_pos + replacement.len() >= self.output.len() {
                    truncated = true;
                    break;
                }
                self.output[out_pos..out_pos + replacement.len()].copy_from_slice(replacement);
                out_pos += replacement.len();
            }

            in_pos = m.end;
        }

        if !truncated {
            let remaining = line.len() - in_pos;
            if remaining > 0 {
                if out_pos + remaining <= self.output.len() {
                    self.output[out_pos..out_pos + remaining]
                        .copy_from_slice(&line[in_pos..in_pos + remaining]);
                    out_pos += remaining;
                } else {
                    truncated = true;
                }
            }
        }

        if truncated {
            self.stats.output_truncated += 1;
            warn!(
                line_len = line.len(),
                output_capacity = self.output.len(),
                "redaction output truncated; sensitive data may survive"
            );
        }

        self.stats.lines_modified += 1;
        Ok(Redacted::Rewritten(&self.output[..out_pos]))
    }
}

#[cfg(test)]
#[path = "redactor_tests.rs"]
mod tests;
