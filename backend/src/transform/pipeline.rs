//! CSV import pipeline.
//!
//! Drives a whole import: read the file, sniff its dialect, map its header
//! onto the catalog columns, then validate and insert each row on its own.
//!
//! ```text
//! open file ─▶ detect dialect ─▶ resolve headers ─▶ per row: read ─▶ validate ─▶ insert | reject ─▶ summary
//! ```
//!
//! Only a missing/unreadable file or an unusable header aborts the import.
//! Every other problem is confined to its row: the row is counted as skipped
//! and its reason recorded as `"Linha {n}: {motivo}"`, where the header is
//! line 1.
//!
//! # Example
//!
//! ```rust,ignore
//! use livraria::{import_csv, CatalogStore};
//!
//! let mut store = CatalogStore::open("data/livraria.json")?;
//! let outcome = import_csv("livros.csv", &mut store);
//! println!("{}", outcome.summary());
//! for error in &outcome.errors {
//!     println!("{}", error);
//! }
//! ```

use serde::Serialize;
use std::path::{Path, PathBuf};

use super::normalize::normalize;
use crate::error::CsvError;
use crate::logs::{log_error, log_info, log_info_indent, log_success, log_warning};
use crate::models::{Book, Field};
use crate::parser::{parse_bytes_auto, resolve_columns, ColumnMapping, ParseResult, RowResult};
use crate::store::BookStore;
use crate::validation::validate_row;

/// Line number of the header row.
const HEADER_LINE: usize = 1;

/// Line number of the first data row.
const FIRST_DATA_LINE: usize = HEADER_LINE + 1;

/// Summary of one import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportOutcome {
    /// Rows added to the store
    pub inserted: usize,
    /// Rows rejected by validation or ignored as duplicates
    pub skipped: usize,
    /// One message per skipped row, or a single message when the whole
    /// import failed
    pub errors: Vec<String>,
}

impl ImportOutcome {
    fn failed(message: impl Into<String>) -> Self {
        Self {
            inserted: 0,
            skipped: 0,
            errors: vec![message.into()],
        }
    }

    fn reject(&mut self, line: usize, reason: impl std::fmt::Display) {
        self.skipped += 1;
        self.errors.push(format!("Linha {}: {}", line, reason));
    }

    /// `(inserted, skipped, errors)`.
    pub fn into_parts(self) -> (usize, usize, Vec<String>) {
        (self.inserted, self.skipped, self.errors)
    }

    /// Whether the import failed as a whole (unreadable file, bad header)
    /// rather than row by row.
    pub fn is_failure(&self) -> bool {
        self.inserted == 0 && self.skipped == 0 && !self.errors.is_empty()
    }

    /// One-line human summary.
    pub fn summary(&self) -> String {
        format!("Inseridos: {}, ignorados: {}", self.inserted, self.skipped)
    }
}

fn display_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Import the CSV file at `path` into `store`.
///
/// Never fails as a whole: a missing file or bad header yields zero counts
/// and a single error message.
pub fn import_csv<S>(path: impl AsRef<Path>, store: &mut S) -> ImportOutcome
where
    S: BookStore + ?Sized,
{
    let path = path.as_ref();
    log_info(format!("📖 Lendo {}", path.display()));

    if !path.is_file() {
        let message = format!("Arquivo não encontrado: {}", display_path(path).display());
        log_error(&message);
        return ImportOutcome::failed(message);
    }

    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            let message = CsvError::from(e).to_string();
            log_error(&message);
            return ImportOutcome::failed(message);
        }
    };

    import_bytes(&bytes, store)
}

/// Import CSV content already in memory.
pub fn import_bytes<S>(bytes: &[u8], store: &mut S) -> ImportOutcome
where
    S: BookStore + ?Sized,
{
    match parse_bytes_auto(bytes) {
        Ok(parsed) => import_parsed(parsed, store),
        Err(e) => {
            log_error(e.to_string());
            ImportOutcome::failed(e.to_string())
        }
    }
}

fn import_parsed<S>(parsed: ParseResult, store: &mut S) -> ImportOutcome
where
    S: BookStore + ?Sized,
{
    log_success(format!("Codificação: {}", parsed.encoding));
    log_success(format!("Separador: '{}'", parsed.dialect.delimiter_display()));

    let columns = match resolve_columns(&parsed.headers) {
        Ok(columns) => columns,
        Err(e) => {
            let message = format!("Linha {}: {}", HEADER_LINE, e);
            log_error(&message);
            return ImportOutcome::failed(message);
        }
    };
    for field in Field::REQUIRED {
        if let Some(header) = columns.header(field) {
            log_info_indent(format!("{} ← '{}'", field.canonical_name(), header), 1);
        }
    }

    let mut outcome = ImportOutcome::default();

    for (offset, row) in parsed.rows.into_iter().enumerate() {
        let line = offset + FIRST_DATA_LINE;
        match import_row(row, &columns, store) {
            Ok(true) => outcome.inserted += 1,
            Ok(false) => outcome.reject(line, "livro já cadastrado (mesmo título, autor e ano); ignorado."),
            Err(reason) => outcome.reject(line, reason),
        }
    }

    for error in &outcome.errors {
        log_warning(error);
    }
    log_success(outcome.summary());

    outcome
}

/// Validate and insert one row.
///
/// `Ok(false)` is the store's duplicate signal; `Err` carries the reason the
/// row was rejected, whatever stage it came from.
fn import_row<S>(
    row: RowResult,
    columns: &ColumnMapping,
    store: &mut S,
) -> Result<bool, String>
where
    S: BookStore + ?Sized,
{
    let cells = row.map_err(|e| e.to_string())?;
    let normalized = normalize(&columns.to_raw_record(&cells));
    let book: Book = validate_row(&normalized).map_err(|e| e.to_string())?;
    store.insert(&book).map_err(|e| e.to_string())
}
