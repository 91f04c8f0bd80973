//! CSV reading with encoding and dialect auto-detection.
//!
//! Turns raw file bytes into a header row plus data rows. Nothing
//! catalog-specific happens here beyond header cleanup; mapping headers to
//! catalog columns lives in [`columns`], sniffing in [`dialect`].

pub mod columns;
pub mod dialect;

use std::path::Path;

use crate::error::{CsvError, CsvResult};

pub use columns::{resolve_columns, ColumnMapping, ResolvedColumn};
pub use dialect::{detect_dialect, sniff, take_sample, Dialect, CANDIDATE_DELIMITERS, SAMPLE_SIZE};

/// One data row, or the reason it could not be read.
pub type RowResult = Result<Vec<String>, CsvError>;

/// Result of parsing with metadata
#[derive(Debug)]
pub struct ParseResult {
    /// Detected encoding
    pub encoding: String,
    /// Detected or default dialect
    pub dialect: Dialect,
    /// Column headers, trimmed
    pub headers: Vec<String>,
    /// Data rows in file order, blank lines excluded
    pub rows: Vec<RowResult>,
}

/// Detect the encoding of raw bytes.
///
/// Valid UTF-8 is reported as such; anything else goes through chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let charset = chardet::detect(bytes).0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        "" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to string using the specified encoding, dropping a leading BOM.
pub fn decode_content(bytes: &[u8], encoding: &str) -> CsvResult<String> {
    let decoded = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => String::from_utf8_lossy(bytes).into_owned(),
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        label => {
            let codec = encoding_rs::Encoding::for_label(label.as_bytes())
                .ok_or_else(|| CsvError::Encoding(format!("codificação não suportada: {}", label)))?;
            codec.decode(bytes).0.into_owned()
        }
    };

    Ok(decoded.trim_start_matches('\u{feff}').to_string())
}

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Split decoded content into headers and rows using `dialect`.
pub fn parse_string(content: &str, dialect: Dialect, encoding: String) -> CsvResult<ParseResult> {
    let mut reader = dialect
        .reader_builder()
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.iter().map(normalize_header).collect();

    let rows = reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect())
                .map_err(CsvError::from)
        })
        .collect();

    Ok(ParseResult {
        encoding,
        dialect,
        headers,
        rows,
    })
}

/// Parse CSV bytes with auto-detection of encoding and dialect.
pub fn parse_bytes_auto(bytes: &[u8]) -> CsvResult<ParseResult> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    let dialect = detect_dialect(take_sample(&content));
    parse_string(&content, dialect, encoding)
}

/// Parse a CSV file with auto-detection of encoding and dialect.
///
/// The file handle is closed before parsing starts.
pub fn parse_csv_file_auto<P: AsRef<Path>>(path: P) -> CsvResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes_auto(&bytes)
}
