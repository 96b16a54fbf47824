//! Atomic update cache: accumulates, merges and applies the table operations
//! of one edit pass.
//!
//! Contract:
//! - Operations are added in non-decreasing location order (positions of
//!   the unmodified table). `UpdatePass` achieves this by feeding sorted
//!   primitives in reverse.
//! - Every check runs when an operation is added; `execute` only fails on
//!   storage errors.
//! - Structural operations (delete, insert, replace) and annotations
//!   (rename, value update) are queued separately. Annotations never move
//!   records and are applied first, against the unmodified positions.
//! - Structural operations are applied from the last queued to the first, so
//!   each one sees the positions it was recorded with.
//!
//! Merge rules:
//! - inserts with equal position, parent and attribute mode concatenate
//!   their clips in call order;
//! - an insert directly followed by a delete/replace of the node at the same
//!   position, below the same parent, becomes one replace;
//! - once a delete/replace covers `[pre, pre + size)`, later operations inside
//!   that range are dropped; an insert at the end of the range below a node
//!   inside it is dropped; an insert at the end of the range below the covered
//!   node's own parent (same attribute mode) folds into the replacement.
//! - a value update to the empty string on a text node deletes the node.

use crate::atomic::AtomicOp;
use crate::error::UpdateError;
use crate::primitive::{self, UpdatePrimitive};
use crate::structure::{insert_subtree, remove_subtree};
use crate::text_merge;
use std::collections::HashSet;
use std::mem;
use table::{Kind, Pre, TableClip, TableStore};

/// Range removed by the most recent destructive operation.
#[derive(Clone, Copy, Debug)]
struct Cover {
    pre: Pre,
    end: Pre,
    parent: Pre,
    attribute: bool,
}

impl Cover {
    fn contains(&self, pre: Pre) -> bool {
        pre >= self.pre && pre < self.end
    }
}

pub struct AtomicUpdateCache<'a, S: TableStore + ?Sized> {
    store: &'a mut S,
    structural: Vec<AtomicOp>,
    values: Vec<AtomicOp>,
    last_location: Option<Pre>,
    destructive: HashSet<Pre>,
    renamed: HashSet<Pre>,
    revalued: HashSet<Pre>,
    cover: Option<Cover>,
}

impl<'a, S: TableStore + ?Sized> AtomicUpdateCache<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self {
            store,
            structural: Vec::new(),
            values: Vec::new(),
            last_location: None,
            destructive: HashSet::new(),
            renamed: HashSet::new(),
            revalued: HashSet::new(),
            cover: None,
        }
    }

    pub fn store(&self) -> &S {
        &*self.store
    }

    /// Queued operations: structural ones in location order, then annotations.
    pub fn ops(&self) -> impl Iterator<Item = &AtomicOp> + '_ {
        self.structural.iter().chain(self.values.iter())
    }

    /// Number of queued operations after merging.
    pub fn updates_size(&self) -> usize {
        self.structural.len() + self.values.len()
    }

    pub fn clear(&mut self) {
        self.structural.clear();
        self.values.clear();
        self.last_location = None;
        self.destructive.clear();
        self.renamed.clear();
        self.revalued.clear();
        self.cover = None;
    }

    fn check_order(&mut self, location: Pre) -> Result<(), UpdateError> {
        if let Some(previous) = self.last_location {
            if location < previous {
                return Err(UpdateError::InvalidOrder { location, previous });
            }
        }
        self.last_location = Some(location);
        Ok(())
    }

    pub fn add_delete(&mut self, pre: Pre) -> Result<(), UpdateError> {
        primitive::check_bounds(&*self.store, pre)?;
        primitive::check_removable(pre)?;
        self.check_order(pre)?;
        self.add_destructive(pre, None)
    }

    pub fn add_replace(&mut self, pre: Pre, clip: TableClip) -> Result<(), UpdateError> {
        primitive::check_bounds(&*self.store, pre)?;
        primitive::check_removable(pre)?;
        primitive::check_replacement(&*self.store, pre, &clip)?;
        self.check_order(pre)?;
        self.add_destructive(pre, Some(clip))
    }

    fn add_destructive(&mut self, pre: Pre, clip: Option<TableClip>) -> Result<(), UpdateError> {
        if self.renamed.contains(&pre) || self.revalued.contains(&pre) {
            return Err(UpdateError::ValueDestructiveSequence { pre });
        }
        if !self.destructive.insert(pre) {
            return Err(UpdateError::MultipleDestructive { pre });
        }
        self.queue_destructive(pre, clip)
    }

    fn queue_destructive(&mut self, pre: Pre, clip: Option<TableClip>) -> Result<(), UpdateError> {
        if let Some(cover) = self.cover.filter(|cover| cover.contains(pre)) {
            log::trace!(target: "update.cache", "dropped delete/replace at {pre}: inside {}", cover.pre);
            return Ok(());
        }
        let store = &*self.store;
        let size = store.size(pre);
        let Some(parent) = store.parent(pre) else {
            return Err(UpdateError::DocumentNode);
        };
        let attribute = store.kind(pre) == Kind::Attribute;
        self.cover = Some(Cover {
            pre,
            end: pre + size,
            parent,
            attribute,
        });

        let absorbed = match self.structural.last() {
            Some(AtomicOp::Insert {
                pre: at,
                parent: into,
                attributes: false,
                ..
            }) if *at == pre && *into == parent && !attribute => match self.structural.pop() {
                Some(AtomicOp::Insert { clips, .. }) => Some(clips),
                _ => None,
            },
            _ => None,
        };
        let mut clips = match absorbed {
            Some(inserted) => {
                log::trace!(target: "update.cache", "insert at {pre} merged into delete/replace");
                inserted
            }
            None => Vec::new(),
        };
        clips.extend(clip.filter(|clip| !clip.is_empty()));
        let op = if clips.is_empty() {
            AtomicOp::Delete { pre, size }
        } else {
            AtomicOp::Replace { pre, size, clips }
        };
        self.structural.push(op);
        Ok(())
    }

    fn check_insertion(
        &self,
        pre: Pre,
        parent: Pre,
        clip: &TableClip,
        attributes: bool,
    ) -> Result<(), UpdateError> {
        let store = &*self.store;
        primitive::check_bounds(store, parent)?;
        if pre > store.len() {
            return Err(UpdateError::OutOfBounds {
                pre,
                len: store.len(),
            });
        }
        let kind = store.kind(parent);
        let first_child = parent + store.attribute_size(parent);
        let end = parent + store.size(parent);
        let valid = if attributes {
            if kind != Kind::Element {
                return Err(primitive::wrong_kind(parent, kind, "insert attribute"));
            }
            pre == first_child
        } else {
            if !kind.is_container() {
                return Err(primitive::wrong_kind(parent, kind, "insert into"));
            }
            pre == end || (pre >= first_child && pre < end && store.parent(pre) == Some(parent))
        };
        if !valid {
            return Err(UpdateError::InvalidInsertionPoint { pre, parent });
        }
        primitive::check_clip(pre, clip, attributes)
    }

    /// Queues an insert of `clip` at `pre` below `parent`. With `attributes`
    /// set, `pre` must be the end of `parent`'s attribute list.
    pub fn add_insert(
        &mut self,
        pre: Pre,
        parent: Pre,
        clip: TableClip,
        attributes: bool,
    ) -> Result<(), UpdateError> {
        self.check_insertion(pre, parent, &clip, attributes)?;
        self.check_order(pre)?;
        if clip.is_empty() {
            return Ok(());
        }
        if let Some(cover) = self.cover {
            if pre == cover.pre {
                let replaced = self
                    .structural
                    .iter()
                    .rev()
                    .find(|op| op.is_destructive() && op.location() == cover.pre);
                return Err(match replaced {
                    Some(AtomicOp::Replace { .. }) => UpdateError::ReplaceInsertSequence { pre },
                    _ => UpdateError::DeleteInsertSequence { pre },
                });
            }
            if cover.contains(pre) || (pre == cover.end && cover.contains(parent)) {
                log::trace!(target: "update.cache", "dropped insert at {pre}: inside {}", cover.pre);
                return Ok(());
            }
            if pre == cover.end && parent == cover.parent && attributes == cover.attribute {
                return self.fold_into_destructive(cover, pre, parent, clip, attributes);
            }
        }
        if let Some(AtomicOp::Insert {
            pre: at,
            parent: into,
            clips,
            attributes: mode,
        }) = self.structural.last_mut()
        {
            if *at == pre && *into == parent && *mode == attributes {
                clips.push(clip);
                return Ok(());
            }
        }
        self.structural.push(AtomicOp::Insert {
            pre,
            parent,
            clips: vec![clip],
            attributes,
        });
        Ok(())
    }

    fn fold_into_destructive(
        &mut self,
        cover: Cover,
        pre: Pre,
        parent: Pre,
        clip: TableClip,
        attributes: bool,
    ) -> Result<(), UpdateError> {
        let Some(index) = self
            .structural
            .iter()
            .rposition(|op| op.is_destructive() && op.location() == cover.pre)
        else {
            self.structural.push(AtomicOp::Insert {
                pre,
                parent,
                clips: vec![clip],
                attributes,
            });
            return Ok(());
        };
        match &mut self.structural[index] {
            AtomicOp::Replace { clips, .. } => clips.push(clip),
            &mut AtomicOp::Delete { pre: at, size } => {
                self.structural[index] = AtomicOp::Replace {
                    pre: at,
                    size,
                    clips: vec![clip],
                };
            }
            _ => return Ok(()),
        }
        log::trace!(target: "update.cache", "insert at {pre} folded into replace at {}", cover.pre);
        Ok(())
    }

    fn annotation_dropped(&self, pre: Pre) -> bool {
        let covered = self.cover.is_some_and(|cover| cover.contains(pre));
        if covered {
            log::trace!(target: "update.cache", "dropped annotation at {pre}: node is removed");
        }
        covered
    }

    pub fn add_rename(&mut self, pre: Pre, name: &str, uri: Option<&str>) -> Result<(), UpdateError> {
        primitive::check_bounds(&*self.store, pre)?;
        primitive::check_renamable(&*self.store, pre)?;
        self.check_order(pre)?;
        if !self.renamed.insert(pre) {
            return Err(UpdateError::MultipleRenames { pre });
        }
        if self.annotation_dropped(pre) {
            return Ok(());
        }
        self.values.push(AtomicOp::Rename {
            pre,
            name: name.to_string(),
            uri: uri.map(str::to_string),
        });
        Ok(())
    }

    pub fn add_update_value(&mut self, pre: Pre, value: &str) -> Result<(), UpdateError> {
        primitive::check_bounds(&*self.store, pre)?;
        primitive::check_has_value(&*self.store, pre)?;
        self.check_order(pre)?;
        if !self.revalued.insert(pre) {
            return Err(UpdateError::MultipleValueUpdates { pre });
        }
        if self.annotation_dropped(pre) {
            return Ok(());
        }
        if value.is_empty() && self.store.kind(pre) == Kind::Text {
            // text nodes never hold an empty value; the node goes instead
            if !self.destructive.insert(pre) {
                return Err(UpdateError::MultipleDestructive { pre });
            }
            log::trace!(target: "update.cache", "empty value at {pre}: text node removed");
            return self.queue_destructive(pre, None);
        }
        self.values.push(AtomicOp::UpdateValue {
            pre,
            value: value.to_string(),
        });
        Ok(())
    }

    /// Converts one primitive into its atomic operation and queues it.
    pub fn add_primitive(&mut self, update: &UpdatePrimitive) -> Result<(), UpdateError> {
        update.validate(&*self.store)?;
        let location = update.location(&*self.store);
        match update {
            UpdatePrimitive::DeleteNode { target } => self.add_delete(*target),
            UpdatePrimitive::ReplaceNode { target, clip } => self.add_replace(*target, clip.clone()),
            UpdatePrimitive::RenameNode { target, name, uri } => {
                self.add_rename(*target, name, uri.as_deref())
            }
            UpdatePrimitive::ReplaceValue { target, value } => self.add_update_value(*target, value),
            UpdatePrimitive::InsertAttribute { target, clip } => {
                self.add_insert(location, *target, clip.clone(), true)
            }
            UpdatePrimitive::InsertInto { clip, .. }
            | UpdatePrimitive::InsertIntoAsFirst { clip, .. }
            | UpdatePrimitive::InsertBefore { clip, .. }
            | UpdatePrimitive::InsertAfter { clip, .. } => {
                let parent = update
                    .insertion_parent(&*self.store)
                    .ok_or(UpdateError::DocumentNode)?;
                self.add_insert(location, parent, clip.clone(), false)
            }
        }
    }

    /// Translates a pre value across the queued structural operations.
    ///
    /// With `before_updates == false`, `pre` is a position of the current table
    /// and the result is its position once the queue is applied. With `true`,
    /// `pre` is a post-update position mapped back; positions of nodes that
    /// only exist after a pending insert/replace are returned unchanged.
    pub fn calculate_pre_value(&self, pre: Pre, before_updates: bool) -> Pre {
        let mut acc: isize = 0;
        if !before_updates {
            for op in &self.structural {
                if pre < op.old_end() {
                    break;
                }
                acc += op.shift();
            }
            return (pre as isize + acc) as Pre;
        }
        let target = pre as isize;
        for op in &self.structural {
            let start = op.location() as isize + acc;
            if target < start {
                break;
            }
            if target < start + op.inserted() as isize {
                return pre;
            }
            acc += op.shift();
        }
        (target - acc) as Pre
    }

    /// Applies the queue to the table and clears it.
    pub fn execute(&mut self, merge_text: bool) -> Result<(), UpdateError> {
        let values = mem::take(&mut self.values);
        let structural = mem::take(&mut self.structural);
        self.clear();

        for op in &values {
            match op {
                AtomicOp::Rename { pre, name, uri } => {
                    self.store.set_name(*pre, name, uri.as_deref())?;
                }
                AtomicOp::UpdateValue { pre, value } => self.store.set_text(*pre, value)?,
                _ => {}
            }
        }
        for op in structural.iter().rev() {
            log::trace!(target: "update.cache", "apply {op:?}");
            match op {
                AtomicOp::Delete { pre, .. } => {
                    remove_subtree(&mut *self.store, *pre)?;
                }
                AtomicOp::Insert {
                    pre,
                    parent,
                    clips,
                    attributes,
                } => {
                    let clip = TableClip::join(clips)?;
                    insert_subtree(&mut *self.store, *pre, *parent, &clip, *attributes)?;
                }
                AtomicOp::Replace { pre, clips, .. } => {
                    let clip = TableClip::join(clips)?;
                    let Some(parent) = self.store.parent(*pre) else {
                        return Err(UpdateError::DocumentNode);
                    };
                    let attribute = self.store.kind(*pre) == Kind::Attribute;
                    remove_subtree(&mut *self.store, *pre)?;
                    insert_subtree(&mut *self.store, *pre, parent, &clip, attribute)?;
                }
                AtomicOp::Rename { .. } | AtomicOp::UpdateValue { .. } => {}
            }
        }
        let merged = if merge_text {
            let candidates = text_merge::candidates(&structural, self.store.len());
            text_merge::coalesce(&mut *self.store, &candidates)?
        } else {
            0
        };
        log::debug!(
            target: "update.cache",
            "applied {} structural and {} value operations, merged {merged} text nodes",
            structural.len(),
            values.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use table::Table;
    use table::snapshot::to_xml;

    fn element(name: &str) -> TableClip {
        TableClip::parse(&format!("<{name}/>")).unwrap()
    }

    #[test]
    fn inserts_at_one_position_concatenate() {
        let mut table = Table::parse("<a><b/></a>").unwrap();
        let mut cache = AtomicUpdateCache::new(&mut table);
        cache.add_insert(3, 2, element("x"), false).unwrap();
        cache.add_insert(3, 2, element("y"), false).unwrap();
        assert_eq!(cache.updates_size(), 1);
        cache.execute(true).unwrap();
        assert_eq!(to_xml(&table), "<a><b><x/><y/></b></a>");
    }

    #[test]
    fn insert_then_delete_becomes_replace() {
        let mut table = Table::parse("<a><b/><c/></a>").unwrap();
        let mut cache = AtomicUpdateCache::new(&mut table);
        cache.add_insert(2, 1, element("x"), false).unwrap();
        cache.add_delete(2).unwrap();
        assert_eq!(cache.updates_size(), 1);
        assert!(matches!(cache.ops().next(), Some(AtomicOp::Replace { pre: 2, size: 1, .. })));
        cache.execute(true).unwrap();
        assert_eq!(to_xml(&table), "<a><x/><c/></a>");
    }

    #[test]
    fn delete_then_insert_after_folds() {
        let mut table = Table::parse("<a><b/><c/></a>").unwrap();
        let mut cache = AtomicUpdateCache::new(&mut table);
        cache.add_delete(2).unwrap();
        cache.add_insert(3, 1, element("x"), false).unwrap();
        assert_eq!(cache.updates_size(), 1);
        cache.execute(true).unwrap();
        assert_eq!(to_xml(&table), "<a><x/><c/></a>");
    }

    fn clip_names(clips: &[TableClip]) -> Vec<&str> {
        clips
            .iter()
            .filter_map(|clip| clip.source().name(clip.start()))
            .collect()
    }

    #[test]
    fn insert_then_replace_keeps_both_clips() {
        let mut table = Table::parse("<a><b/><c/></a>").unwrap();
        let mut cache = AtomicUpdateCache::new(&mut table);
        cache.add_insert(2, 1, element("x"), false).unwrap();
        cache.add_replace(2, element("y")).unwrap();
        assert_eq!(cache.updates_size(), 1);
        match cache.ops().next() {
            Some(AtomicOp::Replace { pre: 2, size: 1, clips }) => {
                assert_eq!(clip_names(clips), vec!["x", "y"]);
            }
            other => panic!("expected one replace, got {other:?}"),
        }
        cache.execute(true).unwrap();
        assert_eq!(to_xml(&table), "<a><x/><y/><c/></a>");
    }

    #[test]
    fn replace_then_insert_at_its_end_extends_the_replacement() {
        let mut table = Table::parse("<a><b><d/></b><c/></a>").unwrap();
        let mut cache = AtomicUpdateCache::new(&mut table);
        cache.add_replace(2, element("r")).unwrap();
        cache.add_insert(4, 1, element("x"), false).unwrap();
        cache.add_insert(4, 1, element("z"), false).unwrap();
        assert_eq!(cache.updates_size(), 1);
        match cache.ops().next() {
            Some(AtomicOp::Replace { pre: 2, size: 2, clips }) => {
                assert_eq!(clip_names(clips), vec!["r", "x", "z"]);
            }
            other => panic!("expected one replace, got {other:?}"),
        }
        assert_eq!(cache.calculate_pre_value(4, false), 5);
        cache.execute(true).unwrap();
        assert_eq!(to_xml(&table), "<a><r/><x/><z/><c/></a>");
    }

    #[test]
    fn empty_text_value_removes_the_node() {
        let mut table = Table::parse("<a>x<b/>y</a>").unwrap();
        let len = table.len();
        let mut cache = AtomicUpdateCache::new(&mut table);
        cache.add_update_value(2, "").unwrap();
        assert!(matches!(cache.ops().next(), Some(AtomicOp::Delete { pre: 2, size: 1 })));
        assert_eq!(
            cache.add_update_value(2, "again"),
            Err(UpdateError::MultipleValueUpdates { pre: 2 })
        );
        cache.execute(true).unwrap();
        assert_eq!(table.len(), len - 1);
        assert_eq!(to_xml(&table), "<a><b/>y</a>");
        assert_eq!(Table::parse(&to_xml(&table)).unwrap().len(), table.len());
    }

    #[test]
    fn empty_attribute_value_is_kept() {
        let mut table = Table::parse(r#"<a k="v"/>"#).unwrap();
        let mut cache = AtomicUpdateCache::new(&mut table);
        cache.add_update_value(2, "").unwrap();
        cache.execute(true).unwrap();
        assert_eq!(to_xml(&table), r#"<a k=""/>"#);
    }

    #[test]
    fn insert_at_deleted_position_is_rejected() {
        let mut table = Table::parse("<a><b/><c/></a>").unwrap();
        let mut cache = AtomicUpdateCache::new(&mut table);
        cache.add_delete(2).unwrap();
        let err = cache.add_insert(2, 1, element("x"), false).unwrap_err();
        assert_eq!(err, UpdateError::DeleteInsertSequence { pre: 2 });

        let mut table = Table::parse("<a><b/><c/></a>").unwrap();
        let mut cache = AtomicUpdateCache::new(&mut table);
        cache.add_replace(2, element("y")).unwrap();
        let err = cache.add_insert(2, 1, element("x"), false).unwrap_err();
        assert_eq!(err, UpdateError::ReplaceInsertSequence { pre: 2 });
        assert!(err.is_sequencing());
    }

    #[test]
    fn operations_inside_a_deleted_subtree_are_dropped() {
        let mut table = Table::parse(r#"<a><b k="v"><c>t</c></b><d/></a>"#).unwrap();
        let mut cache = AtomicUpdateCache::new(&mut table);
        cache.add_delete(2).unwrap();
        cache.add_update_value(3, "w").unwrap();
        cache.add_rename(4, "z", None).unwrap();
        cache.add_delete(5).unwrap();
        cache.add_insert(6, 4, element("x"), false).unwrap();
        assert_eq!(cache.updates_size(), 1);
        cache.execute(true).unwrap();
        assert_eq!(to_xml(&table), "<a><d/></a>");
    }

    #[test]
    fn annotations_are_exclusive() {
        let mut table = Table::parse(r#"<a k="v"/>"#).unwrap();
        let mut cache = AtomicUpdateCache::new(&mut table);
        cache.add_rename(1, "b", None).unwrap();
        assert_eq!(
            cache.add_rename(1, "c", None),
            Err(UpdateError::MultipleRenames { pre: 1 })
        );
        cache.add_update_value(2, "w").unwrap();
        let err = cache.add_update_value(2, "x").unwrap_err();
        assert_eq!(err, UpdateError::MultipleValueUpdates { pre: 2 });
        assert!(err.is_exclusivity());
    }

    #[test]
    fn destructive_then_annotation_folds() {
        let mut table = Table::parse("<a><b/></a>").unwrap();
        let mut cache = AtomicUpdateCache::new(&mut table);
        cache.add_delete(2).unwrap();
        cache.add_rename(2, "z", None).unwrap();
        assert_eq!(cache.updates_size(), 1);
        cache.execute(true).unwrap();
        assert_eq!(to_xml(&table), "<a/>");
    }

    #[test]
    fn annotation_then_destructive_is_rejected() {
        let mut table = Table::parse("<a><b/></a>").unwrap();
        let mut cache = AtomicUpdateCache::new(&mut table);
        cache.add_rename(2, "z", None).unwrap();
        assert_eq!(
            cache.add_delete(2),
            Err(UpdateError::ValueDestructiveSequence { pre: 2 })
        );
    }

    #[test]
    fn annotations_apply_before_structural_changes() {
        let mut table = Table::parse(r#"<a><b/><c k="v"/></a>"#).unwrap();
        let mut cache = AtomicUpdateCache::new(&mut table);
        cache.add_insert(2, 1, TableClip::parse("<x><y/></x>").unwrap(), false).unwrap();
        cache.add_rename(3, "d", Some("urn:d")).unwrap();
        cache.add_update_value(4, "w").unwrap();
        cache.execute(true).unwrap();
        assert_eq!(to_xml(&table), r#"<a><x><y/></x><b/><d k="w"/></a>"#);
        assert_eq!(table.uri(5), Some("urn:d"));
    }

    #[test]
    fn attribute_replace_and_insert() {
        let mut table = Table::parse(r#"<a k="1" m="2"><b/></a>"#).unwrap();
        let mut cache = AtomicUpdateCache::new(&mut table);
        cache
            .add_replace(2, TableClip::attributes(&[("n", "3")]).unwrap())
            .unwrap();
        cache
            .add_insert(4, 1, TableClip::attributes(&[("o", "4")]).unwrap(), true)
            .unwrap();
        cache.execute(true).unwrap();
        assert_eq!(to_xml(&table), r#"<a n="3" m="2" o="4"><b/></a>"#);
        assert_eq!(table.attribute_size(1), 4);
    }

    #[test]
    fn invalid_insertion_points_are_rejected() {
        let mut table = Table::parse(r#"<a k="v"><b/>t</a>"#).unwrap();
        let mut cache = AtomicUpdateCache::new(&mut table);
        assert_eq!(
            cache.add_insert(2, 1, element("x"), false),
            Err(UpdateError::InvalidInsertionPoint { pre: 2, parent: 1 })
        );
        assert!(matches!(
            cache.add_insert(4, 4, element("x"), false),
            Err(UpdateError::WrongKind { pre: 4, .. })
        ));
        assert_eq!(
            cache.add_insert(3, 1, element("x"), true),
            Err(UpdateError::ClipMismatch { pre: 3 })
        );
        assert_eq!(cache.add_delete(0), Err(UpdateError::DocumentNode));
        assert_eq!(cache.updates_size(), 0);
    }

    #[test]
    fn clear_resets_every_check() {
        let mut table = Table::parse("<a><b/><c/></a>").unwrap();
        let mut cache = AtomicUpdateCache::new(&mut table);
        cache.add_delete(3).unwrap();
        cache.clear();
        assert_eq!(cache.updates_size(), 0);
        cache.add_delete(2).unwrap();
        cache.add_delete(3).unwrap();
        assert_eq!(cache.updates_size(), 2);
    }
}
