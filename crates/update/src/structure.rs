//! Raw mutations plus the size and distance repair that keeps a table
//! consistent after each one.

use table::{Kind, Pre, TableClip, TableError, TableStore};

/// Inserts `clip` at `pre` below `parent` and repairs the table. Returns the
/// number of records inserted.
pub(crate) fn insert_subtree<S: TableStore + ?Sized>(
    store: &mut S,
    pre: Pre,
    parent: Pre,
    clip: &TableClip,
    attributes: bool,
) -> Result<usize, TableError> {
    if clip.is_empty() {
        return Ok(0);
    }
    let count = store.insert(pre, clip)?;
    let end = pre + count;
    let mut top = pre;
    while top < end {
        store.set_dist(top, top - parent);
        top += store.size(top).max(1);
    }
    resize_ancestors(store, parent, count as isize);
    if attributes {
        let asize = store.attribute_size(parent);
        store.set_attribute_size(parent, asize + count);
    }
    shift_following(store, parent, end, count as isize);
    Ok(count)
}

/// Removes the subtree at `pre` and repairs the table. Returns the number of
/// records removed.
pub(crate) fn remove_subtree<S: TableStore + ?Sized>(store: &mut S, pre: Pre) -> Result<usize, TableError> {
    let Some(parent) = store.parent(pre) else {
        return Err(TableError::OutOfBounds {
            pre,
            end: pre,
            len: store.len(),
        });
    };
    let size = store.size(pre);
    let attribute = store.kind(pre) == Kind::Attribute;
    store.delete(pre, size)?;
    resize_ancestors(store, parent, -(size as isize));
    if attribute {
        let asize = store.attribute_size(parent);
        store.set_attribute_size(parent, asize - size);
    }
    shift_following(store, parent, pre, -(size as isize));
    Ok(size)
}

fn resize_ancestors<S: TableStore + ?Sized>(store: &mut S, from: Pre, delta: isize) {
    let mut ancestor = Some(from);
    while let Some(pre) = ancestor {
        let size = store.size(pre) as isize + delta;
        store.set_size(pre, size as usize);
        ancestor = store.parent(pre);
    }
}

/// Adjusts `dist` of every node that follows position `from` and whose parent
/// is `parent` or one of its ancestors. Descendants of those nodes keep their
/// relative distances.
fn shift_following<S: TableStore + ?Sized>(store: &mut S, parent: Pre, from: Pre, delta: isize) {
    let mut container = parent;
    let mut pos = from;
    loop {
        let end = container + store.size(container);
        while pos < end {
            let dist = store.dist(pos) as isize + delta;
            store.set_dist(pos, dist as usize);
            pos += store.size(pos).max(1);
        }
        match store.parent(container) {
            Some(up) => container = up,
            None => break,
        }
    }
}
