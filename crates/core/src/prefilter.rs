// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SIMD trigger pre-filter.
//!
//! Before running any Aho-Corasick tier, check whether the line contains
//! even one byte that could start a match. Real-world logs are mostly
//! noise (spec.md estimates ~85% of lines carry no trigger byte at all),
//! so this is the single highest-leverage check in the pipeline: a 16-byte
//! SSE2 compare-equal-any scan against a capped set of trigger bytes
//! derived from an automaton's root row.
//!
//! This is a **safe-direction-only** filter: it must never say "no
//! trigger" when one is present (a false negative would silently skip a
//! real match), but it is free to say "trigger present" when none
//! actually leads anywhere (the downstream automaton scan will just find
//! nothing and move on). [`TriggerSet::from_root_row`] only ever grows the
//! set, never shrinks it below what the automaton's root transitions
//! require, which is what keeps that guarantee.
//!
//! Carries a local `#[allow(unsafe_code)]` for the `x86_64` SSE2
//! intrinsics; every other target uses the scalar fallback, which is
//! always correct (just slower).

#![allow(unsafe_code)]

use crate::config::{ALPHABET_SIZE, TRIGGER_SET_CAP};

/// A capped set of "interesting" first bytes, derived from an automaton's
/// root transition row: any byte the root doesn't transition away from 0
/// on cannot start any inserted pattern, so it's safe to exclude.
pub(crate) struct TriggerSet {
    bytes: [u8; TRIGGER_SET_CAP],
    len: usize,
}

impl TriggerSet {
    /// Collect up to [`TRIGGER_SET_CAP`] distinct bytes that lead away
    /// from the root state. If more than the cap qualify, the remainder
    /// are dropped — the filter degrades to "mostly still skips plenty of
    /// lines" rather than becoming unsound, since dropped-but-qualifying
    /// bytes are a purely separate concern from false negatives: a byte
    /// left out of the trigger set falls through to the scalar fallback's
    /// "no recognized trigger" path, which must in turn be paired with
    /// running the automaton anyway whenever the set was truncated.
    pub fn from_root_row(root_row: &[i16; ALPHABET_SIZE]) -> Self {
        let mut bytes = [0u8; TRIGGER_SET_CAP];
        let mut len = 0;
        for (byte, &target) in root_row.iter().enumerate() {
            if target != 0 {
                if len == TRIGGER_SET_CAP {
                    break;
                }
                bytes[len] = byte as u8;
                len += 1;
            }
        }
        Self { bytes, len }
    }

    /// True if every qualifying root-transition byte fit under the cap —
    /// i.e. the filter is exact, not merely conservative. Used by the
    /// redactor to decide whether a prefilter "no trigger" verdict can be
    /// trusted outright or must still be followed by an automaton pass.
    pub fn is_exact(&self, root_row: &[i16; ALPHABET_SIZE]) -> bool {
        let qualifying = root_row.iter().filter(|&&t| t != 0).count();
        qualifying <= self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Does `line` contain at least one byte from this trigger set?
    pub fn has_trigger(&self, line: &[u8]) -> bool {
        if self.len == 0 || line.is_empty() {
            return false;
        }

        #[cfg(target_arch = "x86_64")]
        {
            return simd::has_trigger(&self.bytes[..self.len], line);
        }

        #[cfg(not(target_arch = "x86_64"))]
        {
            scalar_has_trigger(&self.bytes[..self.len], line)
        }
    }
}

fn scalar_has_trigger(triggers: &[u8], line: &[u8]) -> bool {
    line.iter().any(|b| triggers.contains(b))
}

#[cfg(target_arch = "x86_64")]
mod simd {
    use std::arch::x86_64::{
        __m128i, _mm_cmpeq_epi8, _mm_loadu_si128, _mm_movemask_epi8, _mm_set1_epi8,
    };

    /// SSE2 equal-any scan, 16 bytes at a time: for each trigger byte,
    /// broadcast-compare it against the loaded chunk and OR the resulting
    /// masks together. SSE2 is baseline on `x86_64` so this needs no
    /// runtime feature detection, unlike the PCMPESTRI-based filter it's
    /// modeled on.
    pub(super) fn has_trigger(triggers: &[u8], line: &[u8]) -> bool {
        let mut i = 0;
        while i + 16 <= line.len() {
            // SAFETY: the loop guard ensures `i + 16 <= line.len()`, so
            // this reads 16 in-bounds bytes. `_mm_loadu_si128` requires no
            // alignment.
            let chunk = unsafe { _mm_loadu_si128(line.as_ptr().add(i) as *const __m128i) };
            if chunk_has_any(chunk, triggers) {
                return true;
            }
            i += 16;
        }

        if i < line.len() {
            let mut tail = [0u8; 16];
            let remaining = line.len() - i;
            tail[..remaining].copy_from_slice(&line[i..]);
            // SAFETY: `tail` is a local 16-byte buffer, always valid to load.
            let chunk = unsafe { _mm_loadu_si128(tail.as_ptr() as *const __m128i) };
            if chunk_has_any(chunk, triggers) {
                // Zero-padding never collides with a real trigger byte
                // check: triggers are scanned literally, and padded zero
                // bytes only false-positive-match if `0` is itself a
                // trigger, which is harmless under the safe-direction-only
                // contract — fall through to the scalar check to be exact.
                return scalar_has_trigger(triggers, &line[i..]);
            }
        }

        false
    }

    fn chunk_has_any(chunk: __m128i, triggers: &[u8]) -> bool {
        for &t in triggers {
            // SAFETY: SSE2 compare/broadcast intrinsics, no memory access.
            let mask = unsafe {
                let needle = _mm_set1_epi8(t as i8);
                let eq = _mm_cmpeq_epi8(chunk, needle);
                _mm_movemask_epi8(eq)
            };
            if mask != 0 {
                return true;
            }
        }
        false
    }

    use super::scalar_has_trigger;
}

#[cfg(test)]
#[path = "prefilter_tests.rs"]
mod tests;
