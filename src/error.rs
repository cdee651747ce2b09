//! Error taxonomy shared by every stage of the mapping engine.
//!
//! Schema and header validation errors are raised once, when a session is
//! constructed. Row-level failures are wrapped in [`Error::Line`] so callers
//! can tell which input line produced them.

use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot use '{type_name}', only record types are supported")]
    UnsupportedRootType { type_name: &'static str },

    #[error("no csv-mappable fields found on '{type_name}'")]
    NoMappableFields { type_name: &'static str },

    #[error("record type '{type_name}' contains itself through field '{path}'")]
    RecursiveRecord { type_name: &'static str, path: String },

    #[error("expected one or more of headers {expected:?}, but got {found:?}")]
    NoHeaderOverlap {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("found unmatched struct fields with names {0:?}")]
    UnmatchedStructFields(Vec<String>),

    #[error("repeated header name: {0}")]
    DuplicateHeaderName(String),

    #[error("input ended before a header row was read")]
    MissingHeader,

    #[error("cannot assign column {column} to field '{path}': {source}")]
    FieldConversion {
        column: usize,
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("field path '{path}' does not match the declared layout of '{type_name}'")]
    ShapeMismatch { type_name: &'static str, path: String },

    #[error("expected '{expected}', but got '{found}'")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("on line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: Box<Error>,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub(crate) fn on_line(self, line: usize) -> Self {
        Error::Line {
            line,
            source: Box::new(self),
        }
    }

    /// The 1-based input line a row-level error was raised on, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Line { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// The error without its line annotation.
    pub fn root(&self) -> &Error {
        match self {
            Error::Line { source, .. } => source.root(),
            other => other,
        }
    }
}
