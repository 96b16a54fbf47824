use crate::atom::{AtomId, AtomTable};
use crate::builder::{self, BuilderConfig};
use crate::clip::TableClip;
use crate::error::{BuildError, TableError};
use crate::record::{Kind, NodeRecord, Pre, TextId};
use crate::store::TableStore;

/// In-memory node table: an arena of fixed-size records addressed by pre
/// value, plus the atom table and text heap the records point into.
///
/// Text heap entries are owned by exactly one record. Deleted records put
/// their entries on a free list that later allocations take from first.
#[derive(Clone, Debug)]
pub struct Table {
    records: Vec<NodeRecord>,
    atoms: AtomTable,
    texts: Vec<Box<str>>,
    free_texts: Vec<TextId>,
}

impl Table {
    /// A table holding only a document node.
    pub fn new() -> Self {
        Self {
            records: vec![NodeRecord::new(Kind::Document)],
            atoms: AtomTable::new(),
            texts: Vec::new(),
            free_texts: Vec::new(),
        }
    }

    /// Reads a document with the default builder configuration.
    pub fn parse(input: &str) -> Result<Self, BuildError> {
        builder::parse_document(input, &BuilderConfig::default())
    }

    pub fn record(&self, pre: Pre) -> &NodeRecord {
        &self.records[pre]
    }

    pub fn records(&self) -> &[NodeRecord] {
        &self.records
    }

    pub fn atoms(&self) -> &AtomTable {
        &self.atoms
    }

    pub(crate) fn record_mut(&mut self, pre: Pre) -> &mut NodeRecord {
        &mut self.records[pre]
    }

    pub(crate) fn push(&mut self, record: NodeRecord) -> Result<Pre, TableError> {
        let pre = self.records.len();
        if pre >= u32::MAX as usize {
            return Err(TableError::Capacity { requested: pre + 1 });
        }
        self.records.push(record);
        Ok(pre)
    }

    pub(crate) fn intern(&mut self, name: &str) -> Result<AtomId, TableError> {
        self.atoms.intern(name)
    }

    pub(crate) fn alloc_text(&mut self, value: &str) -> Result<TextId, TableError> {
        if let Some(id) = self.free_texts.pop() {
            self.texts[id.0 as usize] = value.into();
            return Ok(id);
        }
        let id: u32 = self
            .texts
            .len()
            .try_into()
            .map_err(|_| TableError::Capacity {
                requested: self.texts.len() + 1,
            })?;
        self.texts.push(value.into());
        Ok(TextId(id))
    }

    fn resolve_text(&self, id: TextId) -> Option<&str> {
        self.texts.get(id.0 as usize).map(|s| s.as_ref())
    }

    /// Copies a record out of `source`, re-homing its name, URI and value into
    /// this table's atom table and text heap.
    fn import(&mut self, source: &Table, pre: Pre) -> Result<NodeRecord, TableError> {
        let mut record = *source.record(pre);
        record.name = match record.name.and_then(|id| source.atoms.resolve(id)) {
            Some(name) => Some(self.intern(name)?),
            None => None,
        };
        record.uri = match record.uri.and_then(|id| source.atoms.resolve(id)) {
            Some(uri) => Some(self.intern(uri)?),
            None => None,
        };
        record.value = match record.value.and_then(|id| source.resolve_text(id)) {
            Some(value) => Some(self.alloc_text(value)?),
            None => None,
        };
        Ok(record)
    }

    fn check_range(&self, pre: Pre, end: Pre) -> Result<(), TableError> {
        if pre > end || end > self.records.len() {
            return Err(TableError::OutOfBounds {
                pre,
                end,
                len: self.records.len(),
            });
        }
        Ok(())
    }

    /// Builds a fragment table (document node + top-level nodes) from the
    /// concatenation of several clips.
    pub fn from_clips<'a, I>(clips: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = &'a TableClip>,
    {
        let mut table = Table::new();
        for clip in clips {
            let at = table.len();
            table.insert(at, clip)?;
        }
        let len = table.len();
        let root = table.record_mut(0);
        root.size = len as u32;
        let mut pre = 1;
        while pre < len {
            table.records[pre].dist = pre as u32;
            pre += table.records[pre].size as usize;
        }
        Ok(table)
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl TableStore for Table {
    fn len(&self) -> usize {
        self.records.len()
    }

    fn kind(&self, pre: Pre) -> Kind {
        self.records[pre].kind
    }

    fn dist(&self, pre: Pre) -> usize {
        self.records[pre].dist as usize
    }

    fn size(&self, pre: Pre) -> usize {
        self.records[pre].size as usize
    }

    fn attribute_size(&self, pre: Pre) -> usize {
        self.records[pre].asize as usize
    }

    fn name(&self, pre: Pre) -> Option<&str> {
        self.records[pre].name.and_then(|id| self.atoms.resolve(id))
    }

    fn uri(&self, pre: Pre) -> Option<&str> {
        self.records[pre].uri.and_then(|id| self.atoms.resolve(id))
    }

    fn text(&self, pre: Pre) -> Option<&str> {
        self.records[pre].value.and_then(|id| self.resolve_text(id))
    }

    fn insert(&mut self, pre: Pre, clip: &TableClip) -> Result<usize, TableError> {
        self.check_range(pre, pre)?;
        let count = clip.len();
        let requested = self.records.len() + count;
        if requested > u32::MAX as usize {
            return Err(TableError::Capacity { requested });
        }
        let source = clip.source();
        let mut imported = Vec::with_capacity(count);
        for src in clip.range() {
            imported.push(self.import(source, src)?);
        }
        self.records.splice(pre..pre, imported);
        Ok(count)
    }

    fn delete(&mut self, pre: Pre, count: usize) -> Result<(), TableError> {
        self.check_range(pre, pre + count)?;
        for record in self.records.drain(pre..pre + count) {
            if let Some(id) = record.value {
                self.texts[id.0 as usize] = Box::default();
                self.free_texts.push(id);
            }
        }
        Ok(())
    }

    fn set_dist(&mut self, pre: Pre, dist: usize) {
        self.records[pre].dist = dist as u32;
    }

    fn set_size(&mut self, pre: Pre, size: usize) {
        self.records[pre].size = size as u32;
    }

    fn set_attribute_size(&mut self, pre: Pre, asize: usize) {
        self.records[pre].asize = asize as u32;
    }

    fn set_name(&mut self, pre: Pre, name: &str, uri: Option<&str>) -> Result<(), TableError> {
        self.check_range(pre, pre + 1)?;
        if !self.records[pre].kind.has_name() {
            return Err(TableError::NoSuchField { pre, field: "name" });
        }
        let name = self.intern(name)?;
        let uri = match uri {
            Some(uri) => Some(self.intern(uri)?),
            None => None,
        };
        let record = &mut self.records[pre];
        record.name = Some(name);
        record.uri = uri;
        Ok(())
    }

    fn set_text(&mut self, pre: Pre, value: &str) -> Result<(), TableError> {
        self.check_range(pre, pre + 1)?;
        if !self.records[pre].kind.has_value() {
            return Err(TableError::NoSuchField { pre, field: "value" });
        }
        match self.records[pre].value {
            Some(id) => self.texts[id.0 as usize] = value.into(),
            None => {
                let id = self.alloc_text(value)?;
                self.records[pre].value = Some(id);
            }
        }
        Ok(())
    }
}
