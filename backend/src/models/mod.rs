//! Domain models for the catalog pipeline.
//!
//! - [`Book`] - Canonical book record (id is `None` until persisted)
//! - [`Field`] - Canonical catalog columns
//! - [`COLUMN_ALIASES`] - Accepted header spellings for each column

use serde::{Deserialize, Serialize};

// =============================================================================
// Book
// =============================================================================

/// Canonical book record.
///
/// Once built through [`crate::validation::validate_row`], title and author are
/// non-empty printable text of at most 200 characters, the year lies in
/// `[1400, current_year + 1]` and the price in `[0.00, 1_000_000.00]` with two
/// decimal places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Surrogate key assigned by the store.
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "autor")]
    pub author: String,
    #[serde(rename = "ano_publicacao")]
    pub year: i32,
    #[serde(rename = "preco")]
    pub price: f64,
}

impl Book {
    /// Build a record that has not been persisted yet.
    pub fn new(title: impl Into<String>, author: impl Into<String>, year: i32, price: f64) -> Self {
        Self {
            id: None,
            title: title.into(),
            author: author.into(),
            year,
            price,
        }
    }

    /// Same record with the given surrogate key.
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Whether `other` collides with this record on the uniqueness key
    /// (title, author, year).
    pub fn same_identity(&self, other: &Book) -> bool {
        self.title == other.title && self.author == other.author && self.year == other.year
    }
}

// =============================================================================
// Fields and aliases
// =============================================================================

/// A canonical catalog column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    Title,
    Author,
    Year,
    Price,
}

/// Accepted spellings for each canonical column, canonical name first.
///
/// Matching is case-insensitive; earlier entries win.
pub const COLUMN_ALIASES: [(Field, &[&str]); 5] = [
    (Field::Id, &["id"]),
    (Field::Title, &["titulo", "title"]),
    (Field::Author, &["autor", "author"]),
    (Field::Year, &["ano_publicacao", "ano", "year"]),
    (Field::Price, &["preco", "price"]),
];

impl Field {
    /// Columns an import cannot do without.
    pub const REQUIRED: [Field; 4] = [Field::Title, Field::Author, Field::Year, Field::Price];

    /// Column name used in storage and exports.
    pub fn canonical_name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "titulo",
            Self::Author => "autor",
            Self::Year => "ano_publicacao",
            Self::Price => "preco",
        }
    }

    /// Label used in validation messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Title => "Título",
            Self::Author => "Autor",
            Self::Year => "Ano de publicação",
            Self::Price => "Preço",
        }
    }

    /// Accepted spellings, in priority order.
    pub fn aliases(self) -> &'static [&'static str] {
        COLUMN_ALIASES
            .iter()
            .find(|(field, _)| *field == self)
            .map(|(_, aliases)| *aliases)
            .unwrap_or(&[])
    }

    /// Resolve a key or header to its canonical column, ignoring case and
    /// surrounding whitespace.
    pub fn from_alias(key: &str) -> Option<Self> {
        let key = key.trim().to_lowercase();
        COLUMN_ALIASES
            .iter()
            .find(|(_, aliases)| aliases.contains(&key.as_str()))
            .map(|(field, _)| *field)
    }
}
