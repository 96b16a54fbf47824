//! Immutable insert/replace payloads.

use crate::builder::{self, BuilderConfig, TableBuilder};
use crate::error::{BuildError, TableError};
use crate::record::{Kind, Pre};
use crate::store::TableStore;
use crate::table::Table;
use std::ops::Range;
use std::sync::Arc;

/// Read-only view of a contiguous run of fully formed nodes in a source
/// table. The range must start on a node boundary and cover whole subtrees.
#[derive(Clone, Debug)]
pub struct TableClip {
    source: Arc<Table>,
    start: Pre,
    end: Pre,
}

impl TableClip {
    pub fn new(source: Arc<Table>, start: Pre, end: Pre) -> Result<Self, TableError> {
        if start > end || end > source.len() {
            return Err(TableError::OutOfBounds {
                pre: start,
                end,
                len: source.len(),
            });
        }
        Ok(Self { source, start, end })
    }

    /// Every node below the document node of a fragment table.
    pub fn whole(fragment: Table) -> Self {
        let end = fragment.len();
        Self {
            source: Arc::new(fragment),
            start: 1,
            end,
        }
    }

    /// Reads a markup fragment (any number of top-level nodes).
    pub fn parse(input: &str) -> Result<Self, BuildError> {
        builder::parse_fragment(input, &BuilderConfig::default())
    }

    /// A single text node.
    pub fn text(value: &str) -> Result<Self, TableError> {
        let mut builder = TableBuilder::new(BuilderConfig {
            strip_whitespace: false,
        });
        builder.text(value)?;
        Ok(Self::whole(builder.finish()))
    }

    /// Top-level attribute nodes, in the given order.
    pub fn attributes(pairs: &[(&str, &str)]) -> Result<Self, TableError> {
        let mut builder = TableBuilder::new(BuilderConfig::default());
        for (name, value) in pairs {
            builder.loose_attribute(name, value)?;
        }
        Ok(Self::whole(builder.finish()))
    }

    pub fn source(&self) -> &Table {
        &self.source
    }

    pub fn start(&self) -> Pre {
        self.start
    }

    pub fn end(&self) -> Pre {
        self.end
    }

    pub fn range(&self) -> Range<Pre> {
        self.start..self.end
    }

    /// Number of records the clip spans.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Pre values (in the source table) of the top-level nodes.
    pub fn roots(&self) -> Roots<'_> {
        Roots {
            clip: self,
            next: self.start,
        }
    }

    /// True when the clip is non-empty and consists of attributes only.
    pub fn is_attributes(&self) -> bool {
        !self.is_empty() && self.roots().all(|pre| self.source.kind(pre) == Kind::Attribute)
    }

    pub fn has_attributes(&self) -> bool {
        self.roots().any(|pre| self.source.kind(pre) == Kind::Attribute)
    }

    pub fn has_documents(&self) -> bool {
        self.roots().any(|pre| self.source.kind(pre) == Kind::Document)
    }

    /// A new clip holding this clip's nodes followed by `other`'s.
    pub fn concat(&self, other: &TableClip) -> Result<TableClip, TableError> {
        Self::join([self, other])
    }

    /// One clip holding the nodes of every given clip in order. The records
    /// are copied once, whatever the number of parts.
    pub fn join<'a, I>(clips: I) -> Result<TableClip, TableError>
    where
        I: IntoIterator<Item = &'a TableClip>,
    {
        let parts: Vec<&TableClip> = clips.into_iter().filter(|clip| !clip.is_empty()).collect();
        match parts.as_slice() {
            [] => Ok(Self::whole(Table::new())),
            [single] => Ok((*single).clone()),
            _ => Ok(Self::whole(Table::from_clips(parts)?)),
        }
    }
}

pub struct Roots<'a> {
    clip: &'a TableClip,
    next: Pre,
}

impl Iterator for Roots<'_> {
    type Item = Pre;

    fn next(&mut self) -> Option<Pre> {
        if self.next >= self.clip.end {
            return None;
        }
        let pre = self.next;
        self.next += self.clip.source.size(pre).max(1);
        Some(pre)
    }
}
