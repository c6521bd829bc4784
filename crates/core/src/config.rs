// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Engine tunables.
//!
//! These are compiled-in defaults, not a file format — the pattern-file
//! grammar described in the crate's external-interface docs is parsed by
//! callers, not here. Everything in this module mirrors a `#define` from
//! the original implementation's `config.h`.

/// Number of distinct byte values an automaton transitions over.
pub const ALPHABET_SIZE: usize = 256;

/// Upper bound on trie states per automaton, so state ids fit in `i16`.
pub const STATE_ID_CEILING: usize = 32_767;

/// Default cap on trie states for a single automaton build.
pub const DEFAULT_MAX_STATES: usize = 8 * 1024;

/// Maximum number of patterns a single [`crate::pattern_set::PatternSet`]
/// may hold.
pub const MAX_PATTERNS: usize = 1024;

/// Maximum literal length accepted for a pattern's seed literal.
pub const MAX_LITERAL_LEN: usize = 255;

/// Maximum pattern name length.
pub const MAX_PATTERN_NAME_LEN: usize = 63;

/// Cap on the number of literals in the L1-resident hot automaton.
pub const HOT_AC_SIZE: usize = 20;

/// Cap on the number of distinct first bytes collected into the SIMD
/// trigger set (the PCMPESTRI-era limit the original pre-filter inherited;
/// kept here because the trigger register is still 16 lanes wide).
pub const TRIGGER_SET_CAP: usize = 16;

/// Cap on verified matches kept for a single line, bounding per-line work
/// and stack usage in the redactor.
pub const MAX_MATCHES_PER_LINE: usize = 64;

/// Default regex backtracking budget passed to `fancy_regex::RegexBuilder`.
/// `fancy-regex` does not expose step count and recursion depth as
/// separate knobs (see DESIGN.md), so this single limit stands in for
/// both the step limit and the recursion-depth limit from spec.md §7.
pub const DEFAULT_REGEX_BACKTRACK_LIMIT: usize = 100_000;

/// Default arena size backing a single [`crate::arena::Arena`] (128 MiB,
/// matching `PLUMBR_ARENA_SIZE`).
pub const DEFAULT_ARENA_SIZE: usize = 128 * 1024 * 1024;

/// Default per-worker scratch arena size (1 MiB, matching
/// `PLUMBR_SCRATCH_SIZE`).
pub const DEFAULT_SCRATCH_ARENA_SIZE: usize = 1024 * 1024;

/// Default maximum accepted line length (64 KiB).
pub const DEFAULT_MAX_LINE_SIZE: usize = 64 * 1024;

/// Default redactor output buffer capacity. Sized generously over the max
/// line length since replacements can be longer than the literal they
/// replace.
pub const DEFAULT_OUTPUT_CAPACITY: usize = DEFAULT_MAX_LINE_SIZE * 2;

/// Default number of rendezvous-barrier distance bytes to search behind an
/// Aho-Corasick hit before invoking the regex verifier (spec.md §4.6:
/// `max(0, end_position - length - 10)`).
pub const VERIFY_BACKTRACK_WINDOW: usize = 10;

/// Ceiling on worker threads the parallel executor will spin up when the
/// caller asks for "as many as the machine has" (`num_threads == 0`).
pub const MAX_AUTO_WORKERS: usize = 12;

/// State-count threshold above which an automaton is materialized as a
/// [`crate::automaton::compressed::CompressedTable`] rather than a
/// [`crate::automaton::flat::FlatTable`]. Below this a dense table is a few
/// hundred KiB at most and the extra indirection of the bitmap-sparse
/// representation buys nothing; the hot and sentinel automata (at most
/// [`HOT_AC_SIZE`] literals) always stay flat.
pub const COMPRESSED_STATE_THRESHOLD: usize = 512;

/// Pattern names, in priority order, whose literals seed the L1-resident
/// hot automaton. Mirrors `hot_names` in the original `patterns.c`: the
/// empirically highest-frequency secret patterns in real-world logs. Must
/// line up with the names [`crate::pattern_set::default_patterns`] assigns
/// its own patterns, or the hot tier silently goes (near-)empty for the
/// default set.
pub const DEFAULT_HOT_PATTERN_NAMES: &[&str] = &[
    "password",
    "aws_access_key",
    "api_key",
    "github_token",
    "github_oauth",
    "generic_secret",
    "bearer_token",
    "jwt",
    "email",
    "slack_token",
    "private_key",
];

/// Curated sentinel tokens, spanning core-secret and compliance-family
/// (HIPAA / PCI-DSS / GDPR / SOC2) triggers. Mirrors `sentinels[]` in the
/// original `patterns.c` in full — spec.md's "~50 tokens" is an example
/// list, not a ceiling, and the Non-goals never narrow it.
pub const DEFAULT_SENTINEL_TOKENS: &[&str] = &[
    // Core secrets
    "password",
    "secret",
    "token",
    "AKIA",
    "ghp_",
    "sk_live_",
    "postgres://",
    "mongodb://",
    "-----BEGIN",
    "xoxb-",
    "eyJ",
    "Bearer",
    "api_key",
    "credential",
    "key",
    // HIPAA
    "MRN",
    "NPI",
    "diagnosis",
    "patient",
    "beneficiary",
    "ICD",
    "glucose",
    "A1C",
    "blood",
    "heart_rate",
    "encounter",
    "prescription",
    "Rx",
    // PCI-DSS
    "cardholder",
    "%B",
    "PIN",
    "track",
    "card_number",
    "cvv",
    "merchant",
    // GDPR
    "IBAN",
    "NINO",
    "DNI",
    "NIE",
    "INSEE",
    "Steuernummer",
    "codice_fiscale",
    "driving_licen",
    // SOC2
    "audit_id",
    "session_id",
    "role",
    "permission",
    "acl",
    "privilege",
    "encryption_key",
    "signing_key",
    "master_key",
    "mfa",
    "totp",
    "recovery_code",
    "kms",
];

/// Bundle of tunables a [`crate::pattern_set::PatternSet`] or
/// [`crate::redactor::Redactor`] is built with. Defaults match the
/// constants above; tests override individual fields to exercise limits
/// (e.g. a tiny `max_patterns` to hit [`crate::error::Error::CapacityReached`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    pub max_patterns: usize,
    pub max_states: usize,
    pub hot_ac_size: usize,
    pub trigger_set_cap: usize,
    pub max_matches_per_line: usize,
    pub regex_backtrack_limit: usize,
    pub max_line_size: usize,
    pub output_capacity: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_patterns: MAX_PATTERNS,
            max_states: DEFAULT_MAX_STATES,
            hot_ac_size: HOT_AC_SIZE,
            trigger_set_cap: TRIGGER_SET_CAP,
            max_matches_per_line: MAX_MATCHES_PER_LINE,
            regex_backtrack_limit: DEFAULT_REGEX_BACKTRACK_LIMIT,
            max_line_size: DEFAULT_MAX_LINE_SIZE,
            output_capacity: DEFAULT_OUTPUT_CAPACITY,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
