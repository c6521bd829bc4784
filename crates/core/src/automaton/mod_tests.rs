// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn automaton(literals: &[&str]) -> Automaton {
    let mut builder = AutomatonBuilder::new(4096);
    for (i, lit) in literals.iter().enumerate() {
        builder.insert(lit.as_bytes(), i as u32).unwrap();
    }
    Automaton::from_builder(builder).unwrap()
}

#[test]
fn scan_all_reports_every_overlapping_match() {
    let ac = automaton(&["he", "she", "his", "hers"]);
    let hits = ac.scan_all(b"ushers", 64);
    let positions: Vec<_> = hits.iter().map(|m| (m.position, m.pattern_id)).collect();
    assert!(positions.contains(&(3, 1))); // she
    assert!(positions.contains(&(3, 0))); // he
    assert!(positions.contains(&(5, 3))); // hers
}

#[test]
fn scan_first_short_circuits_on_earliest_end_position() {
    let ac = automaton(&["he", "she"]);
    let m = ac.scan_first(b"she").unwrap();
    assert_eq!(m.position, 2);
}

#[test]
fn scan_first_returns_none_when_nothing_matches() {
    let ac = automaton(&["zzz"]);
    assert!(ac.scan_first(b"hello world").is_none());
}

#[test]
fn any_match_is_true_exactly_when_scan_first_is_some() {
    let ac = automaton(&["token", "secret"]);
    assert!(ac.any_match(b"the secret is out"));
    assert!(!ac.any_match(b"nothing to see here"));
}

#[test]
fn scan_all_respects_cap() {
    let ac = automaton(&["a"]);
    let hits = ac.scan_all(b"aaaaaa", 3);
    assert_eq!(hits.len(), 3);
}

#[test]
fn match_length_matches_literal_length() {
    let ac = automaton(&["password"]);
    let m = ac.scan_first(b"the password here").unwrap();
    assert_eq!(m.length, "password".len() as u16);
}

#[test]
fn large_pattern_set_is_materialized_as_compressed() {
    let mut builder = AutomatonBuilder::new(8192);
    // force state_count comfortably above COMPRESSED_STATE_THRESHOLD
    for i in 0..600u32 {
        let lit = format!("literal-{i:04}");
        builder.insert(lit.as_bytes(), i).unwrap();
    }
    let ac = Automaton::from_builder(builder).unwrap();
    assert!(matches!(ac.transitions, Transitions::Compressed(_)));
}

#[test]
fn small_pattern_set_is_materialized_as_flat() {
    let ac = automaton(&["a", "b", "c"]);
    assert!(matches!(ac.transitions, Transitions::Flat(_)));
}

#[test]
fn from_builder_flat_stays_flat_past_the_compressed_threshold() {
    let mut builder = AutomatonBuilder::new(8192);
    for i in 0..600u32 {
        let lit = format!("literal-{i:04}");
        builder.insert(lit.as_bytes(), i).unwrap();
    }
    let ac = Automaton::from_builder_flat(builder).unwrap();
    assert!(matches!(ac.transitions, Transitions::Flat(_)));
}

#[test]
fn root_row_reflects_inserted_first_bytes() {
    let ac = automaton(&["aws_key", "github_token"]);
    let row = ac.root_row();
    assert_ne!(row[b'a' as usize], 0);
    assert_ne!(row[b'g' as usize], 0);
    assert_eq!(row[b'z' as usize], 0);
}

#[test]
fn scan_into_matches_scan_all_and_never_exceeds_buffer() {
    let ac = automaton(&["he", "she", "his", "hers"]);
    let mut buf = [AcMatch { position: 0, pattern_id: 0, length: 0 }; 2];
    let count = ac.scan_into(b"ushers", &mut buf);
    assert_eq!(count, 2);
    let all = ac.scan_all(b"ushers", 64);
    assert_eq!(&buf[..count], &all[..count]);
}

#[test]
fn pattern_count_matches_inserted_literals() {
    let ac = automaton(&["one", "two", "three"]);
    assert_eq!(ac.pattern_count(), 3);
}
