// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `plumbr-core`: a streaming redaction engine.
//!
//! Reads arbitrary text line by line, detects substrings matching a
//! curated set of sensitive-data patterns (credentials, tokens, PII,
//! payment data) via a multi-tier Aho-Corasick + regex-verification
//! pipeline, and rewrites each match in place with a named placeholder.
//!
//! This crate is the in-process engine only: it has no `main`, opens no
//! files or sockets, and parses no command lines or pattern files — those
//! are the job of external callers (a CLI, an HTTP/RPC server, a log
//! shipper integration). See [`pattern_set`] to build a pattern set,
//! [`redactor::Redactor`] to redact a single line at a time, and
//! [`executor::Executor`] to redact a batch of lines across a worker pool.

pub mod arena;
pub mod config;
pub mod error;
pub mod executor;
pub mod pattern_set;
pub mod redactor;

mod automaton;
mod pattern;
mod prefilter;

pub use arena::{Arena, Scope};
pub use config::Limits;
pub use error::{Error, Result};
pub use executor::{Executor, ItemOutcome};
pub use pattern_set::{PatternSet, PatternSetBuilder, default_patterns};
pub use redactor::{Redacted, Redactor, Stats};
