//! Error types for write-guard
//!
//! A security block is not an error: it is a [`Verdict`](crate::output::Verdict).
//! Everything here is either a malformed request or a fault raised while
//! evaluating the policy.

use thiserror::Error;

/// Errors raised while parsing a request or evaluating a policy
#[derive(Error, Debug)]
pub enum GuardError {
    /// The hook payload does not have the expected shape
    #[error("malformed hook input: {0}")]
    RequestParse(#[from] serde_json::Error),

    /// A configured pattern is longer than the compile cap
    #[error("pattern is {len} bytes, over the {max} byte limit: {pattern}")]
    PatternTooLong {
        pattern: String,
        len: usize,
        max: usize,
    },

    /// A content rule regex failed to compile
    #[error("invalid content rule pattern '{pattern}': {reason}")]
    InvalidContentRule { pattern: String, reason: String },

    /// Configuration file could not be parsed
    #[error("failed to parse config {path}: {reason}")]
    Config { path: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GuardError>;
