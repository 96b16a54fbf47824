use crate::primitive::PrimitiveKind;
use table::{InvariantViolation, Kind, Pre, TableError};
use thiserror::Error;

/// Failures of one edit pass. Everything except `Table` and `Invariant` is
/// raised while operations are accumulated, before the table is touched.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum UpdateError {
    #[error("invalid order at location {location} (previous location {previous})")]
    InvalidOrder { location: Pre, previous: Pre },
    #[error("multiple deletes/replaces on node {pre}")]
    MultipleDestructive { pre: Pre },
    #[error("multiple renames on node {pre}")]
    MultipleRenames { pre: Pre },
    #[error("multiple value updates on node {pre}")]
    MultipleValueUpdates { pre: Pre },
    #[error("invalid sequence of delete, insert at location {pre}")]
    DeleteInsertSequence { pre: Pre },
    #[error("invalid sequence of replace, insert at location {pre}")]
    ReplaceInsertSequence { pre: Pre },
    #[error("invalid sequence of value update/rename and delete/replace on node {pre}")]
    ValueDestructiveSequence { pre: Pre },
    #[error("ambiguous order: two {kind:?} primitives on node {target}")]
    AmbiguousOrder { target: Pre, kind: PrimitiveKind },
    #[error("node {pre} is out of bounds (table has {len} records)")]
    OutOfBounds { pre: Pre, len: usize },
    #[error("{operation} cannot target {kind:?} node {pre}")]
    WrongKind {
        pre: Pre,
        kind: Kind,
        operation: &'static str,
    },
    #[error("{pre} is not an insertion point below node {parent}")]
    InvalidInsertionPoint { pre: Pre, parent: Pre },
    #[error("clip content does not fit the insertion at {pre}")]
    ClipMismatch { pre: Pre },
    #[error("the document node cannot be deleted or replaced")]
    DocumentNode,
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("table invariant violated after update: {0}")]
    Invariant(#[from] InvariantViolation),
}

impl UpdateError {
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            UpdateError::InvalidOrder { .. } | UpdateError::AmbiguousOrder { .. }
        )
    }

    pub fn is_exclusivity(&self) -> bool {
        matches!(
            self,
            UpdateError::MultipleDestructive { .. }
                | UpdateError::MultipleRenames { .. }
                | UpdateError::MultipleValueUpdates { .. }
        )
    }

    pub fn is_sequencing(&self) -> bool {
        matches!(
            self,
            UpdateError::DeleteInsertSequence { .. }
                | UpdateError::ReplaceInsertSequence { .. }
                | UpdateError::ValueDestructiveSequence { .. }
        )
    }

    /// The table position the error refers to, if any.
    pub fn location(&self) -> Option<Pre> {
        match self {
            UpdateError::InvalidOrder { location, .. } => Some(*location),
            UpdateError::MultipleDestructive { pre }
            | UpdateError::MultipleRenames { pre }
            | UpdateError::MultipleValueUpdates { pre }
            | UpdateError::DeleteInsertSequence { pre }
            | UpdateError::ReplaceInsertSequence { pre }
            | UpdateError::ValueDestructiveSequence { pre }
            | UpdateError::OutOfBounds { pre, .. }
            | UpdateError::WrongKind { pre, .. }
            | UpdateError::InvalidInsertionPoint { pre, .. }
            | UpdateError::ClipMismatch { pre } => Some(*pre),
            UpdateError::AmbiguousOrder { target, .. } => Some(*target),
            UpdateError::DocumentNode => Some(0),
            UpdateError::Table(_) | UpdateError::Invariant(_) => None,
        }
    }
}
