//! # Livraria - bookstore catalog import and export
//!
//! Livraria reconciles book records arriving in heterogeneous shapes
//! (spreadsheet exports with unpredictable delimiters and header spellings,
//! positional tuples, JSON objects, stored books) into one canonical record,
//! validates every field, and reports the outcome of each row.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│  Normalize  │────▶│  Validate   │───▶ BookStore
//! │ (any delim) │     │ (dialect +  │     │ (RawRecord) │     │ (per field) │
//! └─────────────┘     │  aliases)   │     └─────────────┘     └─────────────┘
//!                     └─────────────┘            │
//!                                                └──────▶ Export (CSV)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use livraria::{export_csv, import_csv, CatalogStore};
//!
//! let mut store = CatalogStore::open("data/livraria.json")?;
//! let outcome = import_csv("planilha.csv", &mut store);
//! println!("{} inseridos, {} ignorados", outcome.inserted, outcome.skipped);
//!
//! let path = export_csv(store.all(), "exports/livros.csv")?;
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`models`] - Book record and column aliases
//! - [`validation`] - Field validators
//! - [`parser`] - CSV decoding, dialect sniffing, header resolution
//! - [`transform`] - Normalization, import pipeline, export
//! - [`store`] - Catalog store and backups
//! - [`config`] - Environment configuration
//! - [`logs`] - Pipeline logging

// Core modules
pub mod error;
pub mod models;

// Configuration and logging
pub mod config;
pub mod logs;

// Validation
pub mod validation;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Storage
pub mod store;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{CsvError, ExportError, HeaderError, StoreError, ValidationError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Book, Field, COLUMN_ALIASES};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{validate_price, validate_row, validate_text, validate_year};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    detect_dialect,
    detect_encoding,
    parse_bytes_auto,
    parse_csv_file_auto,
    resolve_columns,
    ColumnMapping,
    Dialect,
    ParseResult,
};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::{
    export_csv,
    import_bytes,
    import_csv,
    normalize,
    ImportOutcome,
    NormalizedRow,
    RawRecord,
};

// =============================================================================
// Re-exports - Store
// =============================================================================

pub use store::{BookStore, CatalogStore};

pub use config::Config;
