use crate::Pre;
use thiserror::Error;

/// Failures raised by raw table mutators.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("range {pre}..{end} is out of bounds (table has {len} records)")]
    OutOfBounds { pre: Pre, end: Pre, len: usize },
    #[error("table capacity exceeded: {requested} records")]
    Capacity { requested: usize },
    #[error("atom table exhausted")]
    AtomsExhausted,
    #[error("node {pre} cannot carry a {field}")]
    NoSuchField { pre: Pre, field: &'static str },
}

/// Failures raised while reading markup into a table.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("unexpected end of input at byte {offset}")]
    UnexpectedEof { offset: usize },
    #[error("invalid name at byte {offset}")]
    InvalidName { offset: usize },
    #[error("end tag </{found}> at byte {offset} does not match <{expected}>")]
    MismatchedEndTag {
        expected: String,
        found: String,
        offset: usize,
    },
    #[error("end tag </{found}> at byte {offset} has no open element")]
    UnmatchedEndTag { found: String, offset: usize },
    #[error("element <{name}> is never closed")]
    UnclosedElement { name: String },
    #[error("malformed attribute at byte {offset}")]
    MalformedAttribute { offset: usize },
    #[error("unknown entity reference at byte {offset}")]
    UnknownEntity { offset: usize },
    #[error("attribute outside of a start tag")]
    StrayAttribute,
    #[error(transparent)]
    Table(#[from] TableError),
}
