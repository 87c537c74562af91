use thiserror::Error;

use crate::format::Format;
use crate::graph::VertexId;

pub type Result<T> = std::result::Result<T, Error>;

/// Fatal conversion errors. Line numbers are 1-based physical lines of the
/// input; binary record indices are 0-based.
#[derive(Debug, Error)]
pub enum Error {
    #[error("wrong number of vertex lines: expected {expected}, found {found}")]
    CountMismatch { expected: usize, found: usize },

    #[error("line {line}: last token must be '#'")]
    MissingTerminator { line: usize },

    #[error("vertex {id} declared twice ({location})")]
    DuplicateVertex { id: VertexId, location: String },

    #[error("line {line}: malformed line")]
    MalformedLine { line: usize },

    #[error("record {record}: vertex id must be non-negative, found {id}")]
    InvalidVertexId { record: usize, id: VertexId },

    #[error("line {line}: more data lines than the {expected} declared in the header")]
    TooManyLines { expected: usize, line: usize },

    #[error("{format} input has no header line")]
    MissingHeader { format: Format },

    #[error("line {line}: '{token}' is not a valid integer")]
    InvalidNumber { line: usize, token: String },

    #[error("invalid header: {reason}")]
    InvalidHeader { reason: String },

    #[error("binary input is {len} bytes, shorter than the 16-byte header")]
    TruncatedHeader { len: usize },

    #[error("record {record}: expected {expected} bytes, found {found}")]
    TruncatedRecord {
        record: usize,
        expected: usize,
        found: usize,
    },

    #[error("{format} output cannot shift vertex ids {min}..={max} without overflowing i64")]
    IdRangeOverflow {
        format: Format,
        min: VertexId,
        max: VertexId,
    },

    #[error("line {line}: input is not valid UTF-8")]
    InvalidUtf8 { line: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Parse a decimal integer token, reporting `line` on failure.
    pub(crate) fn parse_int<T: std::str::FromStr>(token: &str, line: usize) -> Result<T> {
        token.trim().parse().map_err(|_| Error::InvalidNumber {
            line,
            token: token.trim().to_string(),
        })
    }
}
