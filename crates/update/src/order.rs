//! Total order over update primitives.
//!
//! The first primitive in the order is applied first. Keys, in sequence:
//! 1. location of the resulting atomic operation, descending;
//! 2. at one location, primitives anchored on the node there (delete,
//!    replace, rename, replace value) before insertions;
//! 3. insertions by insertion parent, outermost first; child-list
//!    insertions before attribute insertions; insertions anchored on a child
//!    before insertions anchored on the parent itself;
//! 4. the type ladder (`PrimitiveKind::rank`);
//! 5. target, descending.
//!
//! Two primitives of one kind on one target have no defined order and are
//! rejected.

use crate::error::UpdateError;
use crate::primitive::{PrimitiveKind, UpdatePrimitive};
use std::cmp::{Ordering, Reverse};
use std::collections::HashSet;
use table::{Pre, TableStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OrderKey {
    location: Reverse<Pre>,
    insert: bool,
    parent: Pre,
    attribute: bool,
    on_parent: bool,
    rank: u8,
    target: Reverse<Pre>,
}

pub struct UpdateOrder<'a, S: TableStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: TableStore + ?Sized> UpdateOrder<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    fn key(&self, primitive: &UpdatePrimitive) -> OrderKey {
        let kind = primitive.kind();
        let insert = kind.is_insert();
        OrderKey {
            location: Reverse(primitive.location(self.store)),
            insert,
            parent: primitive.insertion_parent(self.store).unwrap_or(0),
            attribute: kind == PrimitiveKind::InsertAttribute,
            on_parent: insert && kind.inserts_below_target(),
            rank: kind.rank(),
            target: Reverse(primitive.target()),
        }
    }

    /// Relative order of two primitives. Both must be valid for the table.
    pub fn compare(&self, a: &UpdatePrimitive, b: &UpdatePrimitive) -> Result<Ordering, UpdateError> {
        if a.target() == b.target() && a.kind() == b.kind() {
            return Err(UpdateError::AmbiguousOrder {
                target: a.target(),
                kind: a.kind(),
            });
        }
        Ok(self.key(a).cmp(&self.key(b)))
    }

    /// Validates every primitive, rejects same-kind duplicates on one target,
    /// then sorts into application order.
    pub fn sort(&self, primitives: &mut [UpdatePrimitive]) -> Result<(), UpdateError> {
        let mut seen = HashSet::with_capacity(primitives.len());
        for primitive in primitives.iter() {
            primitive.validate(self.store)?;
            if !seen.insert((primitive.target(), primitive.kind())) {
                return Err(UpdateError::AmbiguousOrder {
                    target: primitive.target(),
                    kind: primitive.kind(),
                });
            }
        }
        primitives.sort_by_cached_key(|primitive| self.key(primitive));
        log::debug!(target: "update.order", "ordered {} primitives", primitives.len());
        Ok(())
    }
}
