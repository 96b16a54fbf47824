//! Structural consistency checks over a whole table.
//!
//! Used by tests and by the update engine when invariant verification is
//! enabled. The walk is linear in the table length.

use crate::record::{Kind, Pre};
use crate::store::TableStore;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("record {pre}: {detail}")]
pub struct InvariantViolation {
    pub pre: Pre,
    pub detail: String,
}

/// Which optional rules `check_with` applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CheckOptions {
    /// Reject text nodes that directly follow a text sibling.
    pub merged_text: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self { merged_text: true }
    }
}

fn violation(pre: Pre, detail: impl Into<String>) -> InvariantViolation {
    InvariantViolation {
        pre,
        detail: detail.into(),
    }
}

/// Verifies:
/// - pre 0 is the only document node and spans the whole table;
/// - every other record's parent is the innermost container enclosing it;
/// - every subtree lies within its parent's range;
/// - attributes sit directly after their owner element, inside `asize`;
/// - no two text nodes are adjacent siblings.
pub fn check<S: TableStore + ?Sized>(store: &S) -> Result<(), InvariantViolation> {
    check_with(store, CheckOptions::default())
}

/// Like [`check`], with the text adjacency rule under the caller's control.
pub fn check_with<S: TableStore + ?Sized>(
    store: &S,
    options: CheckOptions,
) -> Result<(), InvariantViolation> {
    let len = store.len();
    if len == 0 {
        return Err(violation(0, "table has no document node"));
    }
    if store.kind(0) != Kind::Document {
        return Err(violation(0, "record 0 is not a document node"));
    }
    if store.dist(0) != 0 {
        return Err(violation(0, "document node has a parent"));
    }
    if store.size(0) != len {
        return Err(violation(
            0,
            format!("document size {} != table length {len}", store.size(0)),
        ));
    }

    let mut open: Vec<Pre> = vec![0];
    let mut previous_sibling: Vec<Option<Pre>> = vec![None];
    for pre in 1..len {
        while let Some(&top) = open.last() {
            if pre < top + store.size(top) {
                break;
            }
            open.pop();
            previous_sibling.pop();
        }
        let Some(&parent) = open.last() else {
            return Err(violation(pre, "record lies outside the document"));
        };

        let kind = store.kind(pre);
        if kind == Kind::Document {
            return Err(violation(pre, "nested document node"));
        }
        if store.dist(pre) != pre - parent {
            return Err(violation(
                pre,
                format!("dist {} but enclosing container is {parent}", store.dist(pre)),
            ));
        }
        let size = store.size(pre);
        if size == 0 || pre + size > parent + store.size(parent) {
            return Err(violation(pre, format!("size {size} overruns parent {parent}")));
        }
        if !kind.is_container() && size != 1 {
            return Err(violation(pre, format!("leaf with size {size}")));
        }
        let asize = store.attribute_size(pre);
        if asize == 0 || asize > size {
            return Err(violation(pre, format!("attribute size {asize} of size {size}")));
        }
        let in_attribute_range = pre < parent + store.attribute_size(parent);
        if (kind == Kind::Attribute) != in_attribute_range {
            return Err(violation(
                pre,
                format!("{kind:?} misplaced relative to attributes of {parent}"),
            ));
        }
        for attr in pre + 1..pre + asize {
            if store.kind(attr) != Kind::Attribute {
                return Err(violation(attr, format!("non-attribute inside asize of {pre}")));
            }
        }

        if let Some(slot) = previous_sibling.last_mut() {
            if let Some(prev) = *slot {
                if options.merged_text && kind == Kind::Text && store.kind(prev) == Kind::Text {
                    return Err(violation(pre, format!("adjacent text siblings {prev} and {pre}")));
                }
            }
            *slot = Some(pre);
        }
        if kind.is_container() {
            open.push(pre);
            previous_sibling.push(None);
        }
    }
    Ok(())
}
