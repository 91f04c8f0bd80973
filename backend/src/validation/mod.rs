//! Field validators for catalog records.
//!
//! Each validator takes a human-readable label and a raw value of unknown
//! provenance (string, number or null, as produced by the normalizer) and
//! returns the typed, normalized value or a [`ValidationError`] naming the
//! label.
//!
//! All validators share the same coercion policy: `null` becomes the empty
//! string, anything else is rendered to text and trimmed.
//!
//! # Example
//!
//! ```rust,ignore
//! use serde_json::json;
//! use livraria::validation::{validate_price, validate_year};
//!
//! assert_eq!(validate_price("Preço", &json!("29,90")).unwrap(), 29.9);
//! assert!(validate_year("Ano", &json!("abc")).is_err());
//! ```

use chrono::Datelike;
use serde_json::Value;

use crate::error::{ValidationError, ValidationResult};
use crate::models::{Book, Field};
use crate::transform::normalize::NormalizedRow;

/// Default minimum length for text fields.
pub const DEFAULT_MIN_LEN: usize = 1;

/// Default maximum length for text fields.
pub const DEFAULT_MAX_LEN: usize = 200;

/// Oldest accepted publication year.
pub const DEFAULT_MIN_YEAR: i32 = 1400;

/// Default price bounds.
pub const DEFAULT_MIN_PRICE: f64 = 0.0;
pub const DEFAULT_MAX_PRICE: f64 = 1_000_000.0;

fn coerce_str(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    }
}

/// Validate a title or author with the default length bounds.
pub fn validate_text(label: &str, value: &Value) -> ValidationResult<String> {
    validate_text_bounded(label, value, DEFAULT_MIN_LEN, DEFAULT_MAX_LEN)
}

/// Validate free text: trimmed length within `[min_len, max_len]` characters
/// and at least one alphanumeric character.
pub fn validate_text_bounded(
    label: &str,
    value: &Value,
    min_len: usize,
    max_len: usize,
) -> ValidationResult<String> {
    let s = coerce_str(value);
    let len = s.chars().count();

    if len == 0 {
        return Err(ValidationError::Empty { label: label.to_string() });
    }
    if len < min_len {
        return Err(ValidationError::TooShort {
            label: label.to_string(),
            min: min_len,
        });
    }
    if len > max_len {
        return Err(ValidationError::TooLong {
            label: label.to_string(),
            max: max_len,
        });
    }
    if !s.chars().any(char::is_alphanumeric) {
        return Err(ValidationError::Invalid { label: label.to_string() });
    }

    Ok(s)
}

/// Validate a publication year against `[1400, current_year + 1]`.
pub fn validate_year(label: &str, value: &Value) -> ValidationResult<i32> {
    validate_year_from(label, value, DEFAULT_MIN_YEAR)
}

/// Validate a publication year against `[min_year, current_year + 1]`.
///
/// The upper bound is computed at call time so entries announced for next
/// year are accepted.
pub fn validate_year_from(label: &str, value: &Value, min_year: i32) -> ValidationResult<i32> {
    let s = coerce_str(value);
    if s.is_empty() {
        return Err(ValidationError::Empty { label: label.to_string() });
    }

    let year: i64 = s.parse().map_err(|_| ValidationError::NotInteger {
        label: label.to_string(),
    })?;

    let max_year = chrono::Local::now().year() + 1;
    if year < i64::from(min_year) || year > i64::from(max_year) {
        return Err(ValidationError::YearOutOfRange {
            label: label.to_string(),
            min: min_year,
            max: max_year,
        });
    }

    // Bounded by the range check above.
    Ok(year as i32)
}

/// Rewrite a price typed with Brazilian conventions into a parseable one.
///
/// Whitespace is dropped. A comma is taken as the decimal separator only when
/// the string has no period (`"12,34"` becomes `"12.34"`, `"1,234.5"` is left
/// alone).
pub fn normalize_decimal(s: &str) -> String {
    let s: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    if s.contains(',') && !s.contains('.') {
        s.replace(',', ".")
    } else {
        s
    }
}

/// Round to two decimal places.
///
/// Rounds the exact binary value through its two-decimal rendering, so
/// `2.675`, stored just below the half, gives `2.67`.
pub fn round_cents(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Validate a price against `[0.00, 1_000_000.00]`.
pub fn validate_price(label: &str, value: &Value) -> ValidationResult<f64> {
    validate_price_within(label, value, DEFAULT_MIN_PRICE, DEFAULT_MAX_PRICE)
}

/// Validate a price against `[min_value, max_value]`, accepting either `.` or
/// `,` as decimal separator. Returns the value rounded to cents.
pub fn validate_price_within(
    label: &str,
    value: &Value,
    min_value: f64,
    max_value: f64,
) -> ValidationResult<f64> {
    let s = coerce_str(value);
    if s.is_empty() {
        return Err(ValidationError::Empty { label: label.to_string() });
    }

    let price: f64 = normalize_decimal(&s)
        .parse()
        .ok()
        .filter(|p: &f64| p.is_finite())
        .ok_or_else(|| ValidationError::NotNumber {
            label: label.to_string(),
        })?;

    if price < min_value {
        return Err(ValidationError::BelowMinimum {
            label: label.to_string(),
            min: min_value,
        });
    }
    if price > max_value {
        return Err(ValidationError::AboveMaximum {
            label: label.to_string(),
            max: max_value,
        });
    }

    Ok(round_cents(price))
}

/// Validate every field of a normalized row, stopping at the first failure.
///
/// The id is not carried over: validated rows are new records.
pub fn validate_row(row: &NormalizedRow) -> ValidationResult<Book> {
    let title = validate_text(Field::Title.label(), &row.title)?;
    let author = validate_text(Field::Author.label(), &row.author)?;
    let year = validate_year(Field::Year.label(), &row.year)?;
    let price = validate_price(Field::Price.label(), &row.price)?;
    Ok(Book::new(title, author, year, price))
}
