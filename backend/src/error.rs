//! Error types for the Livraria catalog pipeline.
//!
//! - [`ValidationError`] - Field-level failures (empty, too long, unparsable, out of range)
//! - [`CsvError`] - Reading and decoding CSV input
//! - [`HeaderError`] - Header row cannot be mapped to the required columns
//! - [`StoreError`] - Catalog store persistence errors
//! - [`ExportError`] - Writing CSV exports
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.
//!
//! User-facing messages are in Brazilian Portuguese, matching the catalog
//! data itself.

use thiserror::Error;

// =============================================================================
// Validation Errors
// =============================================================================

/// A single field failed validation.
///
/// Every variant carries the human-readable label of the field so the
/// rendered message can name it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Nothing left after trimming.
    #[error("{label} não pode ser vazio.")]
    Empty { label: String },

    /// Shorter than the configured minimum.
    #[error("{label} deve ter no mínimo {min} caracteres.")]
    TooShort { label: String, min: usize },

    /// Longer than the configured maximum.
    #[error("{label} deve ter no máximo {max} caracteres.")]
    TooLong { label: String, max: usize },

    /// Only punctuation or symbols.
    #[error("{label} parece inválido.")]
    Invalid { label: String },

    /// Year is not an integer.
    #[error("{label} deve ser um número inteiro (ex.: 1999).")]
    NotInteger { label: String },

    /// Year outside the accepted window.
    #[error("{label} deve estar entre {min} e {max}.")]
    YearOutOfRange { label: String, min: i32, max: i32 },

    /// Price is not a number.
    #[error("{label} deve ser um número (ex.: 35.90).")]
    NotNumber { label: String },

    /// Price below the minimum.
    #[error("{label} deve ser maior ou igual a {min:.2}.")]
    BelowMinimum { label: String, min: f64 },

    /// Price above the maximum.
    #[error("{label} não pode ser maior que {max:.2}.")]
    AboveMaximum { label: String, max: f64 },
}

impl ValidationError {
    /// Label of the field that failed.
    pub fn label(&self) -> &str {
        match self {
            Self::Empty { label }
            | Self::TooShort { label, .. }
            | Self::TooLong { label, .. }
            | Self::Invalid { label }
            | Self::NotInteger { label }
            | Self::YearOutOfRange { label, .. }
            | Self::NotNumber { label }
            | Self::BelowMinimum { label, .. }
            | Self::AboveMaximum { label, .. } => label,
        }
    }
}

// =============================================================================
// CSV Errors
// =============================================================================

/// Errors while reading CSV input.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Erro ao ler arquivo: {0}")]
    Io(#[from] std::io::Error),

    /// Bytes could not be decoded.
    #[error("Erro de codificação: {0}")]
    Encoding(String),

    /// A record could not be parsed.
    #[error("Registro CSV inválido: {0}")]
    Malformed(#[from] csv::Error),
}

// =============================================================================
// Header Errors
// =============================================================================

/// The header row cannot be mapped onto the catalog columns.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HeaderError {
    /// No header row at all.
    #[error("Cabeçalho ausente: o arquivo está vazio.")]
    Empty,

    /// Required canonical columns have no matching header.
    #[error("Cabeçalho inválido. Colunas ausentes: {}", .0.join(", "))]
    MissingColumns(Vec<&'static str>),
}

// =============================================================================
// Store Errors
// =============================================================================

/// Errors from the catalog store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error.
    #[error("Erro de armazenamento: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("Arquivo do catálogo corrompido: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Export Errors
// =============================================================================

/// Errors while writing a CSV export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// IO error.
    #[error("Erro ao gravar exportação: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writer error.
    #[error("Erro ao gerar CSV: {0}")]
    Csv(#[from] csv::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for field validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Result type for CSV reading.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for exports.
pub type ExportResult<T> = Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_names_label() {
        let err = ValidationError::NotInteger {
            label: "Ano de publicação".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Ano de publicação"));
        assert!(msg.contains("deve ser um número inteiro"));
        assert_eq!(err.label(), "Ano de publicação");
    }

    #[test]
    fn test_price_bounds_render_two_decimals() {
        let err = ValidationError::AboveMaximum {
            label: "Preço".into(),
            max: 1_000_000.0,
        };
        assert_eq!(err.to_string(), "Preço não pode ser maior que 1000000.00.");
    }

    #[test]
    fn test_missing_columns_lists_canonical_names() {
        let err = HeaderError::MissingColumns(vec!["ano_publicacao", "preco"]);
        assert_eq!(
            err.to_string(),
            "Cabeçalho inválido. Colunas ausentes: ano_publicacao, preco"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: StoreError = io.into();
        assert!(err.to_string().contains("denied"));
    }
}
