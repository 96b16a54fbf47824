//! Fixed-size node records.
//!
//! A document is a flat array of records in pre-order. Structure is encoded
//! with three integers per record:
//! - `dist`: offset to the parent (`parent = pre - dist`); only the document
//!   node at pre 0 has `dist == 0`.
//! - `size`: number of records spanned by the node, its attributes and its
//!   descendants. Leaves have size 1.
//! - `asize`: 1 + number of attributes. Attributes occupy the records directly
//!   after their owner element.

use crate::atom::AtomId;

/// Document-order position of a node in a table.
pub type Pre = usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    Document,
    Element,
    Attribute,
    Text,
    Comment,
    ProcessingInstruction,
}

impl Kind {
    /// Kinds that may own attributes and children.
    pub fn is_container(self) -> bool {
        matches!(self, Kind::Document | Kind::Element)
    }

    pub fn has_name(self) -> bool {
        matches!(
            self,
            Kind::Element | Kind::Attribute | Kind::ProcessingInstruction
        )
    }

    pub fn has_value(self) -> bool {
        matches!(
            self,
            Kind::Attribute | Kind::Text | Kind::Comment | Kind::ProcessingInstruction
        )
    }
}

/// Index into a table's text heap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeRecord {
    pub kind: Kind,
    pub dist: u32,
    pub size: u32,
    pub asize: u32,
    pub name: Option<AtomId>,
    pub uri: Option<AtomId>,
    pub value: Option<TextId>,
}

impl NodeRecord {
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            dist: 0,
            size: 1,
            asize: 1,
            name: None,
            uri: None,
            value: None,
        }
    }
}
