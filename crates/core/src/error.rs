//! Engine error types.
//!
//! One variant per row of the error-kind table: construction and build
//! errors are reported synchronously at the call site; per-line errors
//! (`OutputTruncated`, `RegexLimitHit`) never reach here — those are
//! "fail closed" and surface as a stats counter / log event instead (see
//! `redactor.rs`).

/// Errors raised by pattern-set construction, automaton building, and
/// engine/executor setup.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Trie state count exceeded the configured maximum, the 16-bit id
    /// ceiling was hit, or a pattern's regex failed to compile.
    #[error("automaton build overflow: {0}")]
    BuildOverflow(String),

    /// `PatternSet::add` was called after `PatternSet::build`.
    #[error("cannot add pattern after the pattern set has been built")]
    AddAfterBuild,

    /// The pattern set is already at `Limits::max_patterns`.
    #[error("pattern set capacity reached ({0} patterns)")]
    CapacityReached(usize),

    /// A line handed to `Redactor::process` exceeded the configured
    /// maximum line size.
    #[error("input line of {len} bytes exceeds the maximum of {max} bytes")]
    OversizedInput { len: usize, max: usize },

    /// An arena allocation failed (the arena's backing buffer is full).
    #[error("arena exhausted: requested {requested} bytes, {remaining} remaining")]
    ArenaExhausted { requested: usize, remaining: usize },

    /// A pattern was added with an empty regex source.
    #[error("pattern {0:?} has an empty regex")]
    EmptyRegex(String),

    /// A pattern's regex failed to compile.
    #[error("pattern {name:?} regex is invalid: {source}")]
    InvalidRegex {
        name: String,
        #[source]
        source: Box<fancy_regex::Error>,
    },
}

/// Result type using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
