//! Coalescing of sibling text nodes that became adjacent during a pass.

use crate::atomic::AtomicOp;
use crate::structure::remove_subtree;
use std::collections::BTreeSet;
use table::{Kind, Pre, TableError, TableStore};

/// Post-update positions where two text siblings may now touch: the node
/// before each edited region and every node inside it. `ops` must be the
/// structural operations of the pass in ascending order.
pub(crate) fn candidates(ops: &[AtomicOp], len: usize) -> BTreeSet<Pre> {
    let mut out = BTreeSet::new();
    let mut acc: isize = 0;
    for op in ops {
        let start = (op.location() as isize + acc) as Pre;
        let last = start + op.inserted();
        for pre in start.saturating_sub(1)..last.min(len) {
            out.insert(pre);
        }
        acc += op.shift();
    }
    out
}

/// Merges text siblings at the candidate positions, highest first, so that
/// removals never move a position still to be visited. Returns the number of
/// text nodes removed.
pub(crate) fn coalesce<S: TableStore + ?Sized>(
    store: &mut S,
    candidates: &BTreeSet<Pre>,
) -> Result<usize, TableError> {
    let mut merged = 0;
    for &pre in candidates.iter().rev() {
        if pre >= store.len() || store.kind(pre) != Kind::Text {
            continue;
        }
        while pre + 1 < store.len()
            && store.kind(pre + 1) == Kind::Text
            && store.parent(pre + 1) == store.parent(pre)
        {
            let mut value = store.text(pre).unwrap_or_default().to_string();
            value.push_str(store.text(pre + 1).unwrap_or_default());
            store.set_text(pre, &value)?;
            remove_subtree(store, pre + 1)?;
            merged += 1;
        }
    }
    if merged > 0 {
        log::trace!(target: "update.cache", "coalesced {merged} text nodes");
    }
    Ok(merged)
}
