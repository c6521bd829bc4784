// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Multi-pattern Aho-Corasick matching.
//!
//! Three pieces compose into the public [`Automaton`] type:
//! - [`builder::AutomatonBuilder`] builds a trie, then a single BFS pass
//!   computes failure links, output links, and DFA completion together
//!   (see `builder.rs` for why that's safe to do in one pass).
//! - [`flat::FlatTable`] and [`compressed::CompressedTable`] are two ways
//!   to materialize the same DFA-complete table; `Automaton::from_builder`
//!   picks one based on state count, while `Automaton::from_builder_flat`
//!   always forces the flat table (the hot and sentinel tiers use the
//!   latter so they can't silently drift onto the compressed layout).
//! - The output-link chain walk at the bottom of this file reports every
//!   pattern ending at each position, exactly as the original C engine's
//!   `while (ms != 0) { ...; ms = output[ms]; }` loop does.

mod builder;
mod compressed;
mod flat;

pub(crate) use builder::AutomatonBuilder;

use compressed::CompressedTable;
use flat::FlatTable;

use crate::config::COMPRESSED_STATE_THRESHOLD;
use crate::error::Result;

enum Transitions {
    Flat(FlatTable),
    Compressed(CompressedTable),
}

impl Transitions {
    #[inline]
    fn step(&self, state: i16, byte: u8) -> i16 {
        match self {
            Transitions::Flat(t) => t.step(state, byte),
            Transitions::Compressed(t) => t.step(state, byte),
        }
    }

    fn state_count(&self) -> usize {
        match self {
            Transitions::Flat(t) => t.state_count(),
            Transitions::Compressed(t) => t.state_count(),
        }
    }

    fn root_row(&self) -> [i16; crate::config::ALPHABET_SIZE] {
        match self {
            Transitions::Flat(t) => {
                let mut out = [0i16; crate::config::ALPHABET_SIZE];
                out.copy_from_slice(t.row(0));
                out
            }
            Transitions::Compressed(t) => t.row(0),
        }
    }
}

/// A single Aho-Corasick match, reported at the position its last byte
/// occupies (mirroring the original `ACMatch` struct).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcMatch {
    /// Index of the last byte of the match within the scanned input.
    pub position: usize,
    /// Id of the pattern that matched, as assigned at insertion time.
    pub pattern_id: u32,
    /// Length of the matched literal in bytes.
    pub length: u16,
}

/// A built, ready-to-scan multi-pattern automaton.
pub(crate) struct Automaton {
    transitions: Transitions,
    is_final: Vec<bool>,
    pattern_id: Vec<u32>,
    depth: Vec<u16>,
    output_link: Vec<i16>,
    pattern_count: usize,
}

impl Automaton {
    /// Consume a finished [`AutomatonBuilder`], choosing a flat or
    /// compressed representation based on state count (spec.md §4.5 step
    /// 2: "Choose compressed representation unless explicitly forced
    /// flat"). Used for the full automaton.
    pub fn from_builder(builder: AutomatonBuilder) -> Result<Self> {
        let built = builder.build()?;
        let force_flat = built.state_count <= COMPRESSED_STATE_THRESHOLD;
        Ok(Self::from_built(built, force_flat))
    }

    /// Consume a finished [`AutomatonBuilder`], always materializing a
    /// flat table regardless of state count (spec.md §4.5 steps 3-4: the
    /// hot and sentinel automata are both built with representation
    /// "force[d] flat", not merely defaulted to it by virtue of being
    /// small — a token list that later grows past
    /// [`crate::config::COMPRESSED_STATE_THRESHOLD`] must not silently
    /// flip the sentinel tier over to the compressed table).
    pub fn from_builder_flat(builder: AutomatonBuilder) -> Result<Self> {
        let built = builder.build()?;
        Ok(Self::from_built(built, true))
    }

    fn from_built(built: crate::automaton::builder::Built, force_flat: bool) -> Self {
        let transitions = if force_flat {
            Transitions::Flat(FlatTable::from_table(built.state_count, built.table))
        } else {
            Transitions::Compressed(CompressedTable::from_table(built.state_count, &built.table))
        };

        Self {
            transitions,
            is_final: built.meta.is_final,
            pattern_id: built.meta.pattern_id,
            depth: built.meta.depth,
            output_link: built.meta.output_link,
            pattern_count: built.pattern_count,
        }
    }

    /// Number of distinct patterns inserted into this automaton.
    pub fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    /// Number of trie states, exposed for stats/debugging only.
    #[cfg(test)]
    pub(crate) fn state_count(&self) -> usize {
        self.transitions.state_count()
    }

    /// The root state's 256-wide transition row, used by the prefilter to
    /// derive its trigger-byte set without depending on either table
    /// representation directly.
    pub fn root_row(&self) -> [i16; crate::config::ALPHABET_SIZE] {
        self.transitions.root_row()
    }

    /// Depth (distance from the root) of a trie state, used by the
    /// redactor to recover a match's start position (`position - depth + 1`
    /// is only valid for literal-exact states; callers use `length`
    /// instead, which this module derives from `depth` at build time).
    #[cfg(test)]
    pub(crate) fn depth_of(&self, state: i16) -> u16 {
        self.depth[state as usize]
    }

    /// Scan `haystack`, collecting every match in order of the position it
    /// ends at, up to `cap` matches (further matches are silently dropped —
    /// callers that need to know are expected to compare the returned
    /// vector's length against `cap`).
    pub fn scan_all(&self, haystack: &[u8], cap: usize) -> Vec<AcMatch> {
        let mut matches = Vec::new();
        let mut state: i16 = 0;
        for (i, &byte) in haystack.iter().enumerate() {
            state = self.transitions.step(state, byte);
            let mut m = state;
            while m != 0 {
                if self.is_final[m as usize] {
                    matches.push(AcMatch {
                        position: i,
                        pattern_id: self.pattern_id[m as usize],
                        length: self.depth[m as usize],
                    });
                    if matches.len() >= cap {
                        return matches;
                    }
                }
                m = self.output_link[m as usize];
            }
        }
        matches
    }

    /// Scan `haystack`, writing matches into the caller-provided `out`
    /// buffer (stopping once it's full) and returning the count written.
    /// Unlike [`Automaton::scan_all`], this never allocates — it's what the
    /// redactor's hot path uses to preserve the allocation-free guarantee.
    pub fn scan_into(&self, haystack: &[u8], out: &mut [AcMatch]) -> usize {
        let cap = out.len();
        let mut state: i16 = 0;
        let mut count = 0;
        for (i, &byte) in haystack.iter().enumerate() {
            state = self.transitions.step(state, byte);
            let mut m = state;
            while m != 0 {
                if self.is_final[m as usize] {
                    if count >= cap {
                        return count;
                    }
                    out[count] = AcMatch {
                        position: i,
                        pattern_id: self.pattern_id[m as usize],
                        length: self.depth[m as usize],
                    };
                    count += 1;
                }
                m = self.output_link[m as usize];
            }
        }
        count
    }

    /// Report only the first match found, short-circuiting the scan.
    pub fn scan_first(&self, haystack: &[u8]) -> Option<AcMatch> {
        let mut state: i16 = 0;
        for (i, &byte) in haystack.iter().enumerate() {
            state = self.transitions.step(state, byte);
            let mut m = state;
            while m != 0 {
                if self.is_final[m as usize] {
                    return Some(AcMatch {
                        position: i,
                        pattern_id: self.pattern_id[m as usize],
                        length: self.depth[m as usize],
                    });
                }
                m = self.output_link[m as usize];
            }
        }
        None
    }

    /// Cheapest possible query: does anything match at all? Used by the
    /// sentinel tier, which only ever needs a boolean.
    pub fn any_match(&self, haystack: &[u8]) -> bool {
        let mut state: i16 = 0;
        for &byte in haystack {
            state = self.transitions.step(state, byte);
            if self.is_final[state as usize] || self.output_link[state as usize] != 0 {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "oracle_tests.rs"]
mod oracle_tests;
