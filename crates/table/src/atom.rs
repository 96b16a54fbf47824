//! Atom table for element, attribute and processing-instruction names and
//! namespace URIs.

use crate::error::TableError;
use std::collections::HashMap;
use std::sync::Arc;

/// Opaque atom identifier, only meaningful for the table that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtomId(pub u32);

/// Per-table atom table.
///
/// Names are stored verbatim; XML names are case-sensitive, so there is no
/// folding.
#[derive(Clone, Debug, Default)]
pub struct AtomTable {
    atoms: Vec<Arc<str>>,
    map: HashMap<Arc<str>, AtomId>,
}

impl AtomTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> Result<AtomId, TableError> {
        let idx: u32 = self
            .atoms
            .len()
            .try_into()
            .map_err(|_| TableError::AtomsExhausted)?;
        Ok(AtomId(idx))
    }

    pub fn intern(&mut self, name: &str) -> Result<AtomId, TableError> {
        if let Some(id) = self.map.get(name) {
            return Ok(*id);
        }
        let atom = Arc::<str>::from(name);
        let id = self.next_id()?;
        self.atoms.push(Arc::clone(&atom));
        self.map.insert(atom, id);
        Ok(id)
    }

    pub fn resolve(&self, id: AtomId) -> Option<&str> {
        self.atoms.get(id.0 as usize).map(|s| s.as_ref())
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_idempotent_and_case_sensitive() {
        let mut atoms = AtomTable::new();
        let a = atoms.intern("item").unwrap();
        let b = atoms.intern("item").unwrap();
        let c = atoms.intern("Item").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(atoms.resolve(c), Some("Item"));
        assert_eq!(atoms.len(), 2);
    }

    #[test]
    fn unknown_ids_do_not_resolve() {
        let atoms = AtomTable::new();
        assert_eq!(atoms.resolve(AtomId(3)), None);
    }
}
