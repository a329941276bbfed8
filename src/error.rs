use std::io;

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, GrafitoError>;

/// Errors surfaced by loading and mining.
///
/// Graph-store misuse (stale or foreign ids) is a caller contract violation
/// and is deliberately not represented here.
#[derive(Debug, Error)]
pub enum GrafitoError {
    /// Underlying I/O failure while reading an input file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Malformed input text; the load is aborted and no partial graph is
    /// left addressable.
    #[error("parse error at line {line}: {msg}")]
    Parse {
        /// 1-based line number in the input file.
        line: usize,
        /// What was wrong with the line.
        msg: String,
    },
    /// A caller-supplied parameter outside its documented range.
    #[error("invalid argument: {0}")]
    Invalid(&'static str),
}

impl GrafitoError {
    pub(crate) fn parse(line: usize, msg: impl Into<String>) -> Self {
        GrafitoError::Parse {
            line,
            msg: msg.into(),
        }
    }
}
