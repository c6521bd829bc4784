// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Trie insertion, BFS failure-link computation, and DFA completion.
//!
//! Three passes, matching spec.md §4.1:
//! 1. [`AutomatonBuilder::insert`] walks/extends the trie for each literal.
//! 2. [`AutomatonBuilder::build`] runs one BFS that computes failure links
//!    and output links...
//! 3. ...and, in that same pass, folds failure-link walks into direct
//!    transitions so the final table is total (DFA-complete).

use std::collections::VecDeque;

use crate::config::{ALPHABET_SIZE, STATE_ID_CEILING};
use crate::error::{Error, Result};

/// No explicit trie edge yet (distinct from `0`, which is a real state id
/// once DFA completion fills in default transitions).
const NO_CHILD: i16 = -1;

/// Metadata produced by a build, kept separate from the transition table so
/// the hot scan loop only ever touches the (much smaller) per-state arrays
/// it actually needs.
pub(crate) struct Metadata {
    pub is_final: Vec<bool>,
    pub pattern_id: Vec<u32>,
    pub depth: Vec<u16>,
    pub output_link: Vec<i16>,
}

/// The dense, DFA-complete transition table plus metadata, ready to be
/// materialized as either a [`super::flat::FlatTable`] or a
/// [`super::compressed::CompressedTable`].
pub(crate) struct Built {
    pub state_count: usize,
    pub table: Vec<i16>, // state_count * ALPHABET_SIZE, row-major
    pub meta: Metadata,
    pub pattern_count: usize,
}

impl Built {
    pub fn row(&self, state: i16) -> &[i16] {
        let start = state as usize * ALPHABET_SIZE;
        &self.table[start..start + ALPHABET_SIZE]
    }
}

pub(crate) struct AutomatonBuilder {
    max_states: usize,
    table: Vec<[i16; ALPHABET_SIZE]>,
    children: Vec<Vec<(u8, i16)>>,
    is_final: Vec<bool>,
    pattern_id: Vec<u32>,
    depth: Vec<u16>,
    pattern_count: usize,
}

impl AutomatonBuilder {
    pub fn new(max_states: usize) -> Self {
        let mut builder = Self {
            max_states: max_states.min(STATE_ID_CEILING),
            table: Vec::new(),
            children: Vec::new(),
            is_final: Vec::new(),
            pattern_id: Vec::new(),
            depth: Vec::new(),
            pattern_count: 0,
        };
        // Root state, id 0.
        builder.table.push([NO_CHILD; ALPHABET_SIZE]);
        builder.children.push(Vec::new());
        builder.is_final.push(false);
        builder.pattern_id.push(0);
        builder.depth.push(0);
        builder
    }

    fn new_state(&mut self, depth: u16) -> Result<i16> {
        if self.table.len() >= self.max_states {
            return Err(Error::BuildOverflow(format!(
                "trie would exceed {} states",
                self.max_states
            )));
        }
        let id = self.table.len() as i16;
        self.table.push([NO_CHILD; ALPHABET_SIZE]);
        self.children.push(Vec::new());
        self.is_final.push(false);
        self.pattern_id.push(0);
        self.depth.push(depth);
        Ok(id)
    }

    /// Insert `literal`, tagging its terminal state with `pattern_id`.
    /// Rejects empty literals. Errors once the state cap would be exceeded.
    pub fn insert(&mut self, literal: &[u8], pattern_id: u32) -> Result<()> {
        if literal.is_empty() {
            return Err(Error::BuildOverflow(
                "cannot insert an empty literal".into(),
            ));
        }

        let mut state: i16 = 0;
        for (i, &byte) in literal.iter().enumerate() {
            let existing = self.table[state as usize][byte as usize];
            state = if existing != NO_CHILD {
                existing
            } else {
                let next = self.new_state((i + 1) as u16)?;
                self.table[state as usize][byte as usize] = next;
                self.children[state as usize].push((byte, next));
                next
            };
        }

        self.is_final[state as usize] = true;
        self.pattern_id[state as usize] = pattern_id;
        self.pattern_count += 1;
        Ok(())
    }

    /// Run the BFS failure-link / output-link / DFA-completion pass and
    /// produce the dense transition table.
    pub fn build(mut self) -> Result<Built> {
        let state_count = self.table.len();
        let mut fail = vec![0i16; state_count];
        let mut output_link = vec![0i16; state_count];
        let mut queue: VecDeque<i16> = VecDeque::new();

        // Root's transitions are completed before the BFS starts: any byte
        // with no explicit child loops back to the root. This is what lets
        // depth-1 states resolve `δ(fail(p), b)` immediately below.
        let root_children = self.children[0].clone();
        for slot in self.table[0].iter_mut() {
            if *slot == NO_CHILD {
                *slot = 0;
            }
        }
        for &(_, child) in &root_children {
            fail[child as usize] = 0;
            queue.push_back(child);
        }

        while let Some(s) = queue.pop_front() {
            let s_children = self.children[s as usize].clone();
            let f = fail[s as usize];

            for &(byte, child) in &s_children {
                queue.push_back(child);

                // `f`'s row is already DFA-complete: f has strictly smaller
                // depth than s (or is the root), and BFS visits states in
                // non-decreasing depth order, so f was fully processed
                // before s was dequeued.
                let target = self.table[f as usize][byte as usize];
                debug_assert_ne!(target, NO_CHILD, "parent's failure row incomplete");
                fail[child as usize] = target;

                let child_fail = fail[child as usize];
                output_link[child as usize] = if self.is_final[child_fail as usize] {
                    child_fail
                } else {
                    output_link[child_fail as usize]
                };
            }

            // DFA completion for s: fold the failure-link walk into a
            // direct transition for every byte with no explicit child.
            for byte in 0..ALPHABET_SIZE {
                if self.table[s as usize][byte] == NO_CHILD {
                    self.table[s as usize][byte] = self.table[f as usize][byte];
                }
            }
        }

        let mut flat = Vec::with_capacity(state_count * ALPHABET_SIZE);
        for row in &self.table {
            flat.extend_from_slice(row);
        }

        Ok(Built {
            state_count,
            table: flat,
            meta: Metadata {
                is_final: self.is_final,
                pattern_id: self.pattern_id,
                depth: self.depth,
                output_link,
            },
            pattern_count: self.pattern_count,
        })
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
