//! Error types for the crate.

use thiserror::Error;

/// Errors raised by the knowledge tree, its storage and configuration loading.
///
/// Game input that is simply not allowed right now (a click on an occupied cell, a move out
/// of turn) is not an error; those calls return `false` instead.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("malformed knowledge tree: {message}")]
    MalformedKnowledge { message: String },

    #[error("traversal has not been started")]
    TraversalNotStarted,

    #[error("cannot advance past an answer")]
    AdvanceFromAnswer,

    #[error("the current node is a question, not an answer")]
    NotAnAnswer,

    #[error("text must not be empty")]
    EmptyText,

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

/// Result type alias using the crate [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
