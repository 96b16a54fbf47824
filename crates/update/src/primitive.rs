//! Update primitives as produced by the query layer.
//!
//! Invariants:
//! - `target` is a pre value of the table snapshot the pass runs against.
//! - Insertion parents are derived from the table, never carried.
//! - Clip payloads are immutable and shared; cloning a primitive is cheap.

use crate::error::UpdateError;
use table::{Kind, Pre, TableClip, TableStore};

/// One requested edit. The enum is closed; dispatch is by pattern match.
#[derive(Clone, Debug)]
pub enum UpdatePrimitive {
    DeleteNode {
        target: Pre,
    },
    /// Append the clip to the target's children.
    InsertInto {
        target: Pre,
        clip: TableClip,
    },
    /// Prepend the clip to the target's children.
    InsertIntoAsFirst {
        target: Pre,
        clip: TableClip,
    },
    InsertBefore {
        target: Pre,
        clip: TableClip,
    },
    InsertAfter {
        target: Pre,
        clip: TableClip,
    },
    /// Append attribute nodes to the target element.
    InsertAttribute {
        target: Pre,
        clip: TableClip,
    },
    RenameNode {
        target: Pre,
        name: String,
        uri: Option<String>,
    },
    ReplaceNode {
        target: Pre,
        clip: TableClip,
    },
    ReplaceValue {
        target: Pre,
        value: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    DeleteNode,
    InsertInto,
    InsertIntoAsFirst,
    InsertBefore,
    InsertAfter,
    InsertAttribute,
    RenameNode,
    ReplaceNode,
    ReplaceValue,
}

impl PrimitiveKind {
    /// Position on the type-precedence ladder; lower ranks apply first.
    pub fn rank(self) -> u8 {
        match self {
            PrimitiveKind::InsertAfter => 0,
            PrimitiveKind::InsertInto => 1,
            PrimitiveKind::InsertIntoAsFirst => 2,
            PrimitiveKind::InsertAttribute => 3,
            PrimitiveKind::ReplaceValue => 4,
            PrimitiveKind::RenameNode => 5,
            PrimitiveKind::ReplaceNode => 6,
            PrimitiveKind::DeleteNode => 7,
            PrimitiveKind::InsertBefore => 8,
        }
    }

    pub fn is_insert(self) -> bool {
        matches!(
            self,
            PrimitiveKind::InsertInto
                | PrimitiveKind::InsertIntoAsFirst
                | PrimitiveKind::InsertBefore
                | PrimitiveKind::InsertAfter
                | PrimitiveKind::InsertAttribute
        )
    }

    /// Inserts whose insertion parent is the target itself.
    pub fn inserts_below_target(self) -> bool {
        matches!(
            self,
            PrimitiveKind::InsertInto
                | PrimitiveKind::InsertIntoAsFirst
                | PrimitiveKind::InsertAttribute
        )
    }
}

impl UpdatePrimitive {
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            UpdatePrimitive::DeleteNode { .. } => PrimitiveKind::DeleteNode,
            UpdatePrimitive::InsertInto { .. } => PrimitiveKind::InsertInto,
            UpdatePrimitive::InsertIntoAsFirst { .. } => PrimitiveKind::InsertIntoAsFirst,
            UpdatePrimitive::InsertBefore { .. } => PrimitiveKind::InsertBefore,
            UpdatePrimitive::InsertAfter { .. } => PrimitiveKind::InsertAfter,
            UpdatePrimitive::InsertAttribute { .. } => PrimitiveKind::InsertAttribute,
            UpdatePrimitive::RenameNode { .. } => PrimitiveKind::RenameNode,
            UpdatePrimitive::ReplaceNode { .. } => PrimitiveKind::ReplaceNode,
            UpdatePrimitive::ReplaceValue { .. } => PrimitiveKind::ReplaceValue,
        }
    }

    pub fn target(&self) -> Pre {
        match self {
            UpdatePrimitive::DeleteNode { target }
            | UpdatePrimitive::InsertInto { target, .. }
            | UpdatePrimitive::InsertIntoAsFirst { target, .. }
            | UpdatePrimitive::InsertBefore { target, .. }
            | UpdatePrimitive::InsertAfter { target, .. }
            | UpdatePrimitive::InsertAttribute { target, .. }
            | UpdatePrimitive::RenameNode { target, .. }
            | UpdatePrimitive::ReplaceNode { target, .. }
            | UpdatePrimitive::ReplaceValue { target, .. } => *target,
        }
    }

    pub fn clip(&self) -> Option<&TableClip> {
        match self {
            UpdatePrimitive::InsertInto { clip, .. }
            | UpdatePrimitive::InsertIntoAsFirst { clip, .. }
            | UpdatePrimitive::InsertBefore { clip, .. }
            | UpdatePrimitive::InsertAfter { clip, .. }
            | UpdatePrimitive::InsertAttribute { clip, .. }
            | UpdatePrimitive::ReplaceNode { clip, .. } => Some(clip),
            _ => None,
        }
    }

    /// Position of the atomic operation this primitive turns into: the target
    /// itself, the end of its subtree, or the end of its attribute list.
    pub fn location<S: TableStore + ?Sized>(&self, store: &S) -> Pre {
        let target = self.target();
        match self.kind() {
            PrimitiveKind::InsertAfter | PrimitiveKind::InsertInto => target + store.size(target),
            PrimitiveKind::InsertIntoAsFirst | PrimitiveKind::InsertAttribute => {
                target + store.attribute_size(target)
            }
            _ => target,
        }
    }

    /// Parent of the nodes an insert creates; `None` for other primitives.
    pub fn insertion_parent<S: TableStore + ?Sized>(&self, store: &S) -> Option<Pre> {
        let kind = self.kind();
        if kind.inserts_below_target() {
            Some(self.target())
        } else if kind.is_insert() {
            store.parent(self.target())
        } else {
            None
        }
    }

    /// Checks the target and payload against the table.
    pub fn validate<S: TableStore + ?Sized>(&self, store: &S) -> Result<(), UpdateError> {
        let target = self.target();
        check_bounds(store, target)?;
        let kind = store.kind(target);
        match self {
            UpdatePrimitive::DeleteNode { .. } => check_removable(target),
            UpdatePrimitive::ReplaceNode { clip, .. } => {
                check_removable(target)?;
                check_replacement(store, target, clip)
            }
            UpdatePrimitive::InsertInto { clip, .. }
            | UpdatePrimitive::InsertIntoAsFirst { clip, .. } => {
                if !kind.is_container() {
                    return Err(wrong_kind(target, kind, "insert into"));
                }
                check_clip(target, clip, false)
            }
            UpdatePrimitive::InsertBefore { clip, .. }
            | UpdatePrimitive::InsertAfter { clip, .. } => {
                if target == 0 || kind == Kind::Attribute {
                    return Err(wrong_kind(target, kind, "insert before/after"));
                }
                check_clip(target, clip, false)
            }
            UpdatePrimitive::InsertAttribute { clip, .. } => {
                if kind != Kind::Element {
                    return Err(wrong_kind(target, kind, "insert attribute"));
                }
                check_clip(target, clip, true)
            }
            UpdatePrimitive::RenameNode { .. } => check_renamable(store, target),
            UpdatePrimitive::ReplaceValue { .. } => check_has_value(store, target),
        }
    }
}

pub(crate) fn wrong_kind(pre: Pre, kind: Kind, operation: &'static str) -> UpdateError {
    UpdateError::WrongKind {
        pre,
        kind,
        operation,
    }
}

pub(crate) fn check_bounds<S: TableStore + ?Sized>(store: &S, pre: Pre) -> Result<(), UpdateError> {
    if pre >= store.len() {
        return Err(UpdateError::OutOfBounds {
            pre,
            len: store.len(),
        });
    }
    Ok(())
}

pub(crate) fn check_removable(pre: Pre) -> Result<(), UpdateError> {
    if pre == 0 {
        return Err(UpdateError::DocumentNode);
    }
    Ok(())
}

/// Attribute clips may only go into attribute positions and vice versa; an
/// empty clip fits anywhere. Document nodes never fit.
pub(crate) fn check_clip(pre: Pre, clip: &TableClip, attributes: bool) -> Result<(), UpdateError> {
    if clip.is_empty() {
        return Ok(());
    }
    let fits = if attributes {
        clip.is_attributes()
    } else {
        !clip.has_attributes() && !clip.has_documents()
    };
    if !fits {
        return Err(UpdateError::ClipMismatch { pre });
    }
    Ok(())
}

pub(crate) fn check_replacement<S: TableStore + ?Sized>(
    store: &S,
    pre: Pre,
    clip: &TableClip,
) -> Result<(), UpdateError> {
    check_clip(pre, clip, store.kind(pre) == Kind::Attribute)
}

pub(crate) fn check_renamable<S: TableStore + ?Sized>(store: &S, pre: Pre) -> Result<(), UpdateError> {
    let kind = store.kind(pre);
    if !kind.has_name() {
        return Err(wrong_kind(pre, kind, "rename"));
    }
    Ok(())
}

pub(crate) fn check_has_value<S: TableStore + ?Sized>(store: &S, pre: Pre) -> Result<(), UpdateError> {
    let kind = store.kind(pre);
    if !kind.has_value() {
        return Err(wrong_kind(pre, kind, "replace value"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use table::Table;

    #[test]
    fn locations_follow_the_anchor() {
        let table = Table::parse(r#"<a k="v"><b/><c/></a>"#).unwrap();
        let clip = TableClip::parse("<x/>").unwrap();
        let attrs = TableClip::attributes(&[("n", "1")]).unwrap();
        let cases = [
            (UpdatePrimitive::DeleteNode { target: 1 }, 1),
            (UpdatePrimitive::InsertBefore { target: 3, clip: clip.clone() }, 3),
            (UpdatePrimitive::InsertAfter { target: 3, clip: clip.clone() }, 4),
            (UpdatePrimitive::InsertInto { target: 1, clip: clip.clone() }, 5),
            (UpdatePrimitive::InsertIntoAsFirst { target: 1, clip }, 3),
            (UpdatePrimitive::InsertAttribute { target: 1, clip: attrs }, 3),
        ];
        for (primitive, location) in cases {
            assert_eq!(primitive.location(&table), location, "{:?}", primitive.kind());
        }
    }

    #[test]
    fn insertion_parents() {
        let table = Table::parse("<a><b/></a>").unwrap();
        let clip = TableClip::parse("<x/>").unwrap();
        let before = UpdatePrimitive::InsertBefore { target: 2, clip: clip.clone() };
        let into = UpdatePrimitive::InsertInto { target: 2, clip };
        let delete = UpdatePrimitive::DeleteNode { target: 2 };
        assert_eq!(before.insertion_parent(&table), Some(1));
        assert_eq!(into.insertion_parent(&table), Some(2));
        assert_eq!(delete.insertion_parent(&table), None);
    }

    #[test]
    fn validation_rejects_bad_targets_and_payloads() {
        let table = Table::parse(r#"<a k="v">t</a>"#).unwrap();
        let element = TableClip::parse("<x/>").unwrap();
        let attrs = TableClip::attributes(&[("n", "1")]).unwrap();

        let err = UpdatePrimitive::DeleteNode { target: 9 }.validate(&table).unwrap_err();
        assert_eq!(err, UpdateError::OutOfBounds { pre: 9, len: 4 });
        assert_eq!(
            UpdatePrimitive::DeleteNode { target: 0 }.validate(&table),
            Err(UpdateError::DocumentNode)
        );
        assert!(matches!(
            UpdatePrimitive::InsertInto { target: 3, clip: element.clone() }.validate(&table),
            Err(UpdateError::WrongKind { pre: 3, .. })
        ));
        assert_eq!(
            UpdatePrimitive::InsertAttribute { target: 1, clip: element.clone() }.validate(&table),
            Err(UpdateError::ClipMismatch { pre: 1 })
        );
        assert_eq!(
            UpdatePrimitive::ReplaceNode { target: 2, clip: element }.validate(&table),
            Err(UpdateError::ClipMismatch { pre: 2 })
        );
        assert!(UpdatePrimitive::ReplaceNode { target: 2, clip: attrs }.validate(&table).is_ok());
        assert!(matches!(
            UpdatePrimitive::ReplaceValue { target: 1, value: "x".into() }.validate(&table),
            Err(UpdateError::WrongKind { pre: 1, .. })
        ));
        assert!(matches!(
            UpdatePrimitive::RenameNode { target: 3, name: "x".into(), uri: None }.validate(&table),
            Err(UpdateError::WrongKind { pre: 3, .. })
        ));
    }

    #[test]
    fn ladder_is_total() {
        let kinds = [
            PrimitiveKind::InsertAfter,
            PrimitiveKind::InsertInto,
            PrimitiveKind::InsertIntoAsFirst,
            PrimitiveKind::InsertAttribute,
            PrimitiveKind::ReplaceValue,
            PrimitiveKind::RenameNode,
            PrimitiveKind::ReplaceNode,
            PrimitiveKind::DeleteNode,
            PrimitiveKind::InsertBefore,
        ];
        for pair in kinds.windows(2) {
            assert!(pair[0].rank() < pair[1].rank());
        }
    }
}
