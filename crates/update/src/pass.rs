//! One edit pass over a table snapshot: normalise, order, accumulate, apply.

use crate::cache::AtomicUpdateCache;
use crate::config::UpdateConfig;
use crate::error::UpdateError;
use crate::order::UpdateOrder;
use crate::primitive::UpdatePrimitive;
use std::collections::HashSet;
use table::invariants::{self, CheckOptions};
use table::{Pre, TableStore};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Primitives left after normalisation.
    pub primitives: usize,
    /// Atomic operations left after merging.
    pub atomic_ops: usize,
}

pub struct UpdatePass<'a, S: TableStore + ?Sized> {
    store: &'a mut S,
    config: UpdateConfig,
    primitives: Vec<UpdatePrimitive>,
}

impl<'a, S: TableStore + ?Sized> UpdatePass<'a, S> {
    pub fn new(store: &'a mut S, config: UpdateConfig) -> Self {
        Self {
            store,
            config,
            primitives: Vec::new(),
        }
    }

    pub fn push(&mut self, primitive: UpdatePrimitive) {
        self.primitives.push(primitive);
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Applies every collected primitive. On error the table is untouched
    /// unless the failure came from storage or the final invariant check.
    pub fn apply(self) -> Result<PassSummary, UpdateError> {
        let UpdatePass {
            store,
            config,
            primitives,
        } = self;
        let mut primitives = normalize(primitives);
        UpdateOrder::new(&*store).sort(&mut primitives)?;

        let mut cache = AtomicUpdateCache::new(&mut *store);
        for primitive in primitives.iter().rev() {
            cache.add_primitive(primitive)?;
        }
        let atomic_ops = cache.updates_size();
        cache.execute(config.merge_adjacent_text)?;

        if config.verify_invariants {
            let options = CheckOptions {
                merged_text: config.merge_adjacent_text,
            };
            invariants::check_with(&*store, options)?;
        }
        log::debug!(
            target: "update.pass",
            "applied {} primitives as {atomic_ops} atomic operations",
            primitives.len()
        );
        Ok(PassSummary {
            primitives: primitives.len(),
            atomic_ops,
        })
    }
}

impl<S: TableStore + ?Sized> Extend<UpdatePrimitive> for UpdatePass<'_, S> {
    fn extend<I: IntoIterator<Item = UpdatePrimitive>>(&mut self, iter: I) {
        self.primitives.extend(iter);
    }
}

/// Collapses duplicate requests that have one obvious meaning: repeated
/// deletes of a node, and a delete next to a replace of the same node (the
/// replace wins). Everything else reaches the comparator unchanged.
fn normalize(primitives: Vec<UpdatePrimitive>) -> Vec<UpdatePrimitive> {
    let replaced: HashSet<Pre> = primitives
        .iter()
        .filter_map(|primitive| match primitive {
            UpdatePrimitive::ReplaceNode { target, .. } => Some(*target),
            _ => None,
        })
        .collect();
    let mut deleted = HashSet::new();
    let before = primitives.len();
    let kept: Vec<UpdatePrimitive> = primitives
        .into_iter()
        .filter(|primitive| match primitive {
            UpdatePrimitive::DeleteNode { target } => {
                !replaced.contains(target) && deleted.insert(*target)
            }
            _ => true,
        })
        .collect();
    if kept.len() != before {
        log::trace!(
            target: "update.pass",
            "collapsed {} duplicate delete requests",
            before - kept.len()
        );
    }
    kept
}
