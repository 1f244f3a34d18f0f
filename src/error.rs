//! Stable, programmatic error kinds for the synthesizer.
//!
//! Every fallible public operation in this crate returns `Result<T, Error>`.
//! `ExecutorError` is the only kind a candidate program can raise without
//! ending the search: the synthesizer catches it and treats the candidate
//! as rejected (see [`crate::synthesizer::Synthesizer`]).

use thiserror::Error;

/// Errors produced by the synthesizer and its collaborators.
#[derive(Error, Debug)]
pub enum Error {
    /// The example lacked a required component: an empty node/relation
    /// family, a zero-column output table, or a constant containing a
    /// raw newline.
    #[error("example is underspecified: {0}")]
    ExampleUnderspecified(String),

    /// A source file in the example directory declared a kind tag this
    /// crate does not recognize.
    #[error("unknown example file kind: {0}")]
    UnknownExampleKind(String),

    /// A sketch does not begin with `Match`, or yields no ground program
    /// for a reason other than an empty environment at some level.
    #[error("malformed sketch: {0}")]
    MalformedSketch(String),

    /// The executor rejected a query or failed in transport. Non-fatal:
    /// callers inside the search loop convert this into a rejection of
    /// the current candidate rather than propagating it.
    #[error("executor error: {0}")]
    ExecutorError(#[from] anyhow::Error),

    /// The sketch-dequeue limit was reached without a matching program.
    /// Carries the statement count of the last sketch attempted.
    #[error("search exhausted after exploring sketches up to {last_program_size} statements")]
    SearchExhausted {
        /// Number of statements in the last sketch dequeued before the
        /// limit was reached.
        last_program_size: usize,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
