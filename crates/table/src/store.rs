//! Read/write contract between the update engine and table storage.
//!
//! Contract:
//! - Accessors index by pre value and panic on out-of-range positions, like
//!   slice indexing. Callers validate positions before reaching storage.
//! - Mutators are raw: `insert` and `delete` move records but never repair
//!   ancestor sizes or the distances of following nodes. That repair belongs
//!   to the caller, which knows the whole batch of edits.
//! - Inserted top-level records keep whatever `dist` the clip carried; the
//!   caller rewrites them against the new parent.

use crate::clip::TableClip;
use crate::error::TableError;
use crate::record::{Kind, Pre};

pub trait TableStore {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn kind(&self, pre: Pre) -> Kind;

    fn dist(&self, pre: Pre) -> usize;

    fn size(&self, pre: Pre) -> usize;

    fn attribute_size(&self, pre: Pre) -> usize;

    fn name(&self, pre: Pre) -> Option<&str>;

    fn uri(&self, pre: Pre) -> Option<&str>;

    /// Value of a text, comment, attribute or processing-instruction node.
    fn text(&self, pre: Pre) -> Option<&str>;

    fn parent(&self, pre: Pre) -> Option<Pre> {
        match self.dist(pre) {
            0 => None,
            dist => Some(pre - dist),
        }
    }

    /// Copies the clip's records so that its first record lands at `pre`.
    /// Returns the number of records inserted.
    fn insert(&mut self, pre: Pre, clip: &TableClip) -> Result<usize, TableError>;

    /// Removes `count` records starting at `pre`.
    fn delete(&mut self, pre: Pre, count: usize) -> Result<(), TableError>;

    fn set_dist(&mut self, pre: Pre, dist: usize);

    fn set_size(&mut self, pre: Pre, size: usize);

    fn set_attribute_size(&mut self, pre: Pre, asize: usize);

    fn set_name(&mut self, pre: Pre, name: &str, uri: Option<&str>) -> Result<(), TableError>;

    fn set_text(&mut self, pre: Pre, value: &str) -> Result<(), TableError>;
}
