//! Data model for reconstructed yield tables.
//!
//! These types are what the parser produces and what the renderers consume.
//! They carry no parsing state of their own.

mod context;
mod record;
mod table;

pub use context::{ColumnContext, Entity, UNKNOWN_ENTITY};
pub use record::{DataRecord, YieldEntry, YieldRange};
pub use table::ResultTable;
