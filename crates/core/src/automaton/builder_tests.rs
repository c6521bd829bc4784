// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn build(literals: &[&str]) -> Built {
    let mut builder = AutomatonBuilder::new(4096);
    for (i, lit) in literals.iter().enumerate() {
        builder.insert(lit.as_bytes(), i as u32).unwrap();
    }
    builder.build().unwrap()
}

fn run(built: &Built, haystack: &str) -> Vec<(usize, u32)> {
    let mut state: i16 = 0;
    let mut hits = Vec::new();
    for (i, &byte) in haystack.as_bytes().iter().enumerate() {
        state = built.row(state)[byte as usize];
        let mut m = state;
        while m != 0 {
            if built.meta.is_final[m as usize] {
                hits.push((i, built.meta.pattern_id[m as usize]));
            }
            m = built.meta.output_link[m as usize];
        }
    }
    hits
}

#[test]
fn single_literal_matches() {
    let built = build(&["he"]);
    let hits = run(&built, "she");
    assert_eq!(hits, vec![(2, 0)]);
}

#[test]
fn overlapping_literals_all_reported() {
    // classic AC example: he, she, his, hers
    let built = build(&["he", "she", "his", "hers"]);
    let hits = run(&built, "ushers");
    // "she" ends at 3, "he" ends at 3, "hers" ends at 5
    assert!(hits.contains(&(3, 1))); // she
    assert!(hits.contains(&(3, 0))); // he
    assert!(hits.contains(&(5, 3))); // hers
}

#[test]
fn table_is_dfa_complete_every_state_has_defined_transition() {
    let built = build(&["abc", "bcd"]);
    for state in 0..built.state_count as i16 {
        for byte in 0..256usize {
            let target = built.row(state)[byte];
            assert!(target >= 0, "state {state} byte {byte} undefined");
            assert!((target as usize) < built.state_count);
        }
    }
}

#[test]
fn no_failure_link_chasing_needed_root_self_loops() {
    let built = build(&["zz"]);
    // any byte not 'z' from root should map back to root (0)
    assert_eq!(built.row(0)[b'a' as usize], 0);
    assert_eq!(built.row(0)[b'z' as usize], 1);
}

#[test]
fn empty_literal_is_rejected() {
    let mut builder = AutomatonBuilder::new(16);
    let err = builder.insert(b"", 0).unwrap_err();
    assert!(matches!(err, Error::BuildOverflow(_)));
}

#[test]
fn state_cap_is_enforced() {
    let mut builder = AutomatonBuilder::new(3);
    // root + 2 states is all that's allowed; third char must overflow
    let err = builder.insert(b"abc", 0).unwrap_err();
    assert!(matches!(err, Error::BuildOverflow(_)));
}

#[test]
fn repeated_literal_shares_trie_path() {
    let mut builder = AutomatonBuilder::new(64);
    builder.insert(b"abc", 0).unwrap();
    builder.insert(b"abc", 1).unwrap();
    let built = builder.build().unwrap();
    // only one terminal state should exist for "abc", tagged with the
    // second pattern id (last insert wins)
    let hits = run(&built, "xabc");
    assert_eq!(hits, vec![(3, 1)]);
}

#[test]
fn depth_is_tracked_per_state() {
    let built = build(&["abc"]);
    assert_eq!(built.meta.depth[0], 0);
    // walk a->b->c
    let a = built.row(0)[b'a' as usize];
    let b = built.row(a)[b'b' as usize];
    let c = built.row(b)[b'c' as usize];
    assert_eq!(built.meta.depth[a as usize], 1);
    assert_eq!(built.meta.depth[b as usize], 2);
    assert_eq!(built.meta.depth[c as usize], 3);
}
