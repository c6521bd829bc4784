// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Differential tests against the `aho-corasick` crate (dev-dependency
//! only — see `Cargo.toml`). This hand-rolled engine exists because the
//! public crate doesn't expose the flat/compressed DFA representations
//! spec.md asks for, but its overlapping-match semantics are the right
//! oracle to check this implementation against.

use aho_corasick::AhoCorasick;
use proptest::prelude::*;

use super::{Automaton, AutomatonBuilder};

const LITERALS: &[&str] = &["he", "she", "his", "hers", "password", "secret", "a", "ab", "abc"];

fn ours() -> Automaton {
    let mut builder = AutomatonBuilder::new(4096);
    for (i, lit) in LITERALS.iter().enumerate() {
        builder.insert(lit.as_bytes(), i as u32).unwrap();
    }
    Automaton::from_builder(builder).unwrap()
}

fn oracle_positions(haystack: &[u8]) -> Vec<(usize, u32)> {
    let ac = AhoCorasick::new(LITERALS).unwrap();
    ac.find_overlapping_iter(haystack)
        .map(|m| (m.end() - 1, m.pattern().as_u32()))
        .collect()
}

fn our_positions(ac: &Automaton, haystack: &[u8]) -> Vec<(usize, u32)> {
    ac.scan_all(haystack, usize::MAX)
        .into_iter()
        .map(|m| (m.position, m.pattern_id))
        .collect()
}

#[test]
fn matches_oracle_on_fixed_corpus() {
    let ours = ours();
    for haystack in [
        "ushers",
        "the password and the secret",
        "abcabcabc",
        "no matches here",
        "",
        "hhhhheeeee",
    ] {
        let mut expected = oracle_positions(haystack.as_bytes());
        let mut actual = our_positions(&ours, haystack.as_bytes());
        expected.sort_unstable();
        actual.sort_unstable();
        assert_eq!(expected, actual, "mismatch on {haystack:?}");
    }
}

proptest! {
    #[test]
    fn matches_oracle_on_random_ascii(s in "[a-z ]{0,64}") {
        let ours = ours();
        let mut expected = oracle_positions(s.as_bytes());
        let mut actual = our_positions(&ours, s.as_bytes());
        expected.sort_unstable();
        actual.sort_unstable();
        prop_assert_eq!(expected, actual);
    }

    #[test]
    fn matches_oracle_on_random_bytes(bytes in proptest::collection::vec(any::<u8>(), 0..128)) {
        let ours = ours();
        let mut expected = oracle_positions(&bytes);
        let mut actual = our_positions(&ours, &bytes);
        expected.sort_unstable();
        actual.sort_unstable();
        prop_assert_eq!(expected, actual);
    }
}
