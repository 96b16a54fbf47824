//! Pre/dist/size node table for XML documents.
//!
//! A document is stored as a flat pre-order array of fixed-size records.
//! The update engine works against the [`TableStore`] trait; [`Table`] is the
//! in-memory implementation.

pub mod atom;
pub mod builder;
pub mod clip;
pub mod error;
pub mod invariants;
pub mod record;
pub mod snapshot;
pub mod store;
mod table;

pub use atom::{AtomId, AtomTable};
pub use builder::{BuilderConfig, TableBuilder};
pub use clip::TableClip;
pub use error::{BuildError, TableError};
pub use invariants::{CheckOptions, InvariantViolation};
pub use record::{Kind, NodeRecord, Pre, TextId};
pub use store::TableStore;
pub use table::Table;
