//! XML node tables in pre/dist/size encoding and the update engine that
//! rewrites them.
//!
//! ```
//! use xstore::table::{Table, TableClip};
//! use xstore::update::UpdatePrimitive;
//!
//! let mut table = Table::parse("<a><b/></a>").unwrap();
//! let clip = TableClip::parse("<c/>").unwrap();
//! xstore::apply(&mut table, [UpdatePrimitive::InsertAfter { target: 2, clip }]).unwrap();
//! assert_eq!(xstore::table::snapshot::to_xml(&table), "<a><b/><c/></a>");
//! ```

pub use table;
pub use update;

use table::TableStore;
use update::{PassSummary, UpdateConfig, UpdateError, UpdatePass, UpdatePrimitive};

/// Runs one update pass with the default configuration.
pub fn apply<S, I>(store: &mut S, primitives: I) -> Result<PassSummary, UpdateError>
where
    S: TableStore + ?Sized,
    I: IntoIterator<Item = UpdatePrimitive>,
{
    let mut pass = UpdatePass::new(store, UpdateConfig::default());
    pass.extend(primitives);
    pass.apply()
}
