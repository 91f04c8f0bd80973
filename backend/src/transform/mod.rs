//! Transformation module.
//!
//! - Normalize: any record shape to the canonical tuple
//! - Pipeline: CSV import into a store
//! - Export: records back to CSV

pub mod export;
pub mod normalize;
pub mod pipeline;

pub use export::{export_csv, write_csv, HEADER, HEADER_WITH_ID};
pub use normalize::{normalize, Attributes, NormalizedRow, RawRecord};
pub use pipeline::{import_bytes, import_csv, ImportOutcome};
