//! Errors surfaced by outcome sets, resolutions and dispatchers.
//!
//! Every variant is a usage error: nothing in this crate retries or recovers
//! from them, they are handed straight back to the caller.

use std::fmt::Debug;

use thiserror::Error;

/// Errors raised while declaring, dispatching or probing outcomes.
#[derive(Debug, Error)]
pub enum OutcomeError<N: Debug> {
    #[error("at least one outcome name has to be declared")]
    EmptyOutcomeSet,

    #[error("outcome {0:?} is not declared")]
    InvalidOutcome(N),

    #[error("cannot provide a handler to both construction and dispatch")]
    DuplicateHandler,

    #[error("no handler was provided at construction or dispatch")]
    MissingHandler,

    #[error("already resolved with outcome {recorded:?}, cannot dispatch {attempted:?}")]
    AlreadyResolved { recorded: N, attempted: N },

    #[error(transparent)]
    Argument(#[from] ArgumentError),
}

impl<N: Debug> OutcomeError<N> {
    /// Returns offending name for errors that carry one.
    pub fn name(&self) -> Option<&N> {
        match self {
            OutcomeError::InvalidOutcome(name) => Some(name),
            OutcomeError::AlreadyResolved { attempted, .. } => Some(attempted),
            _ => None,
        }
    }
}

/// Errors produced while moving values in and out of [`crate::Arguments`].
#[derive(Debug, Error)]
pub enum ArgumentError {
    #[error("handler takes {expected} argument(s) but {found} were recorded")]
    Count { expected: usize, found: usize },

    #[error("could not decode argument at position {index}")]
    Decode {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not encode argument at position {index}")]
    Encode {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}
