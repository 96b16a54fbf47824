//! Update engine for pre/dist/size node tables.
//!
//! Update primitives are put into application order by [`UpdateOrder`], fed
//! into an [`AtomicUpdateCache`] in reverse (ascending location), merged into
//! the fewest atomic operations and applied in one pass. [`UpdatePass`] drives
//! the whole sequence.

pub mod atomic;
pub mod cache;
pub mod config;
pub mod error;
pub mod order;
pub mod pass;
pub mod primitive;
mod structure;
mod text_merge;

pub use atomic::AtomicOp;
pub use cache::AtomicUpdateCache;
pub use config::UpdateConfig;
pub use error::UpdateError;
pub use order::UpdateOrder;
pub use pass::{PassSummary, UpdatePass};
pub use primitive::{PrimitiveKind, UpdatePrimitive};
