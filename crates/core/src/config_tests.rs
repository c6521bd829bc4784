// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn default_limits_match_named_constants() {
    let limits = Limits::default();
    assert_eq!(limits.max_patterns, MAX_PATTERNS);
    assert_eq!(limits.max_states, DEFAULT_MAX_STATES);
    assert_eq!(limits.hot_ac_size, HOT_AC_SIZE);
    assert_eq!(limits.trigger_set_cap, TRIGGER_SET_CAP);
}

#[test]
fn hot_pattern_names_fit_under_hot_ac_size() {
    assert!(DEFAULT_HOT_PATTERN_NAMES.len() <= HOT_AC_SIZE);
}

#[test]
fn state_id_ceiling_fits_in_i16() {
    assert!(STATE_ID_CEILING <= i16::MAX as usize);
    assert!(DEFAULT_MAX_STATES <= STATE_ID_CEILING);
}

#[test]
fn sentinel_tokens_are_non_empty_and_unique() {
    let mut seen = std::collections::HashSet::new();
    for tok in DEFAULT_SENTINEL_TOKENS {
        assert!(!tok.is_empty());
        assert!(seen.insert(*tok), "duplicate sentinel token: {tok}");
    }
}

#[test]
fn limits_can_be_overridden_independently() {
    let limits = Limits {
        max_patterns: 4,
        ..Limits::default()
    };
    assert_eq!(limits.max_patterns, 4);
    assert_eq!(limits.max_states, DEFAULT_MAX_STATES);
}
