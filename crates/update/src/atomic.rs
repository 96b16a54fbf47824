//! Atomic table operations queued by the update cache.
//!
//! Every operation is keyed by the pre value it had when it was added, i.e. a
//! position in the unmodified table.

use table::{Pre, TableClip};

#[derive(Clone, Debug)]
pub enum AtomicOp {
    /// Remove the subtree at `pre`; `size` is captured when the op is added.
    Delete { pre: Pre, size: usize },
    /// Insert the clips, in order, so that the first starts at `pre`, below
    /// `parent`. With `attributes` set, they extend `parent`'s attribute list.
    Insert {
        pre: Pre,
        parent: Pre,
        clips: Vec<TableClip>,
        attributes: bool,
    },
    /// Delete the subtree at `pre` and put the clips in its place.
    Replace {
        pre: Pre,
        size: usize,
        clips: Vec<TableClip>,
    },
    Rename {
        pre: Pre,
        name: String,
        uri: Option<String>,
    },
    UpdateValue { pre: Pre, value: String },
}

impl AtomicOp {
    pub fn location(&self) -> Pre {
        match self {
            AtomicOp::Delete { pre, .. }
            | AtomicOp::Insert { pre, .. }
            | AtomicOp::Replace { pre, .. }
            | AtomicOp::Rename { pre, .. }
            | AtomicOp::UpdateValue { pre, .. } => *pre,
        }
    }

    pub fn is_destructive(&self) -> bool {
        matches!(self, AtomicOp::Delete { .. } | AtomicOp::Replace { .. })
    }

    /// Operations that move records; renames and value updates keep every
    /// pre value in place.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            AtomicOp::Delete { .. } | AtomicOp::Insert { .. } | AtomicOp::Replace { .. }
        )
    }

    /// Records added by the operation.
    pub fn inserted(&self) -> usize {
        match self {
            AtomicOp::Insert { clips, .. } | AtomicOp::Replace { clips, .. } => {
                clips.iter().map(TableClip::len).sum()
            }
            _ => 0,
        }
    }

    /// Records removed by the operation.
    pub fn removed(&self) -> usize {
        match self {
            AtomicOp::Delete { size, .. } | AtomicOp::Replace { size, .. } => *size,
            _ => 0,
        }
    }

    /// Net change of the table length.
    pub fn shift(&self) -> isize {
        self.inserted() as isize - self.removed() as isize
    }

    /// First pre value of the unmodified table that lies after the operation.
    pub(crate) fn old_end(&self) -> Pre {
        self.location() + self.removed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shifts() {
        let clip = TableClip::parse("<a/><b/>").unwrap();
        let insert = AtomicOp::Insert {
            pre: 4,
            parent: 1,
            clips: vec![clip.clone()],
            attributes: false,
        };
        let delete = AtomicOp::Delete { pre: 4, size: 3 };
        let replace = AtomicOp::Replace {
            pre: 4,
            size: 3,
            clips: vec![clip.clone(), clip],
        };
        assert_eq!((insert.shift(), insert.old_end()), (2, 4));
        assert_eq!((delete.shift(), delete.old_end()), (-3, 7));
        assert_eq!((replace.shift(), replace.old_end()), (1, 7));
        assert!(!AtomicOp::Rename { pre: 2, name: "x".into(), uri: None }.is_structural());
    }
}
