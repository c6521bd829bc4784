// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[test]
fn build_overflow_displays_reason() {
    let err = Error::BuildOverflow("state cap exceeded".into());
    assert!(err.to_string().contains("state cap exceeded"));
}

#[test]
fn oversized_input_reports_both_lengths() {
    let err = Error::OversizedInput {
        len: 70_000,
        max: 65_536,
    };
    let msg = err.to_string();
    assert!(msg.contains("70000"));
    assert!(msg.contains("65536"));
}

#[test]
fn arena_exhausted_reports_requested_and_remaining() {
    let err = Error::ArenaExhausted {
        requested: 256,
        remaining: 10,
    };
    let msg = err.to_string();
    assert!(msg.contains("256"));
    assert!(msg.contains("10"));
}

#[parameterized(
    add_after_build = { Error::AddAfterBuild },
    capacity_reached = { Error::CapacityReached(1024) },
    empty_regex = { Error::EmptyRegex("password".into()) },
)]
fn every_variant_has_a_non_empty_message(err: Error) {
    assert!(!err.to_string().is_empty());
}

#[test]
fn invalid_regex_wraps_source() {
    let source = fancy_regex::Regex::new("(unclosed").unwrap_err();
    let err = Error::InvalidRegex {
        name: "broken".into(),
        source: Box::new(source),
    };
    assert!(err.to_string().contains("broken"));
}
