//! Header resolution against [`COLUMN_ALIASES`].
//!
//! Maps each canonical column to the header actually present in a file,
//! so `Title,Author,Year,Price` and `titulo,autor,ano_publicacao,preco`
//! import the same way.

use serde_json::{Map, Value};

use crate::error::HeaderError;
use crate::models::{Field, COLUMN_ALIASES};
use crate::transform::normalize::RawRecord;

/// A header found in the file and its position in each row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    pub header: String,
    pub index: usize,
}

/// Canonical column to file header mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub id: Option<ResolvedColumn>,
    pub title: ResolvedColumn,
    pub author: ResolvedColumn,
    pub year: ResolvedColumn,
    pub price: ResolvedColumn,
}

impl ColumnMapping {
    /// Column resolved for `field`.
    pub fn get(&self, field: Field) -> Option<&ResolvedColumn> {
        match field {
            Field::Id => self.id.as_ref(),
            Field::Title => Some(&self.title),
            Field::Author => Some(&self.author),
            Field::Year => Some(&self.year),
            Field::Price => Some(&self.price),
        }
    }

    /// Header string resolved for `field`.
    pub fn header(&self, field: Field) -> Option<&str> {
        self.get(field).map(|c| c.header.as_str())
    }

    /// Pull the mapped cells out of a data row, keyed by canonical name.
    ///
    /// Cells missing from a short row come out as `null`.
    pub fn to_raw_record(&self, row: &[String]) -> RawRecord {
        let mut map = Map::new();
        for (field, _) in COLUMN_ALIASES {
            if let Some(column) = self.get(field) {
                let value = row
                    .get(column.index)
                    .map(|cell| Value::String(cell.clone()))
                    .unwrap_or(Value::Null);
                map.insert(field.canonical_name().to_string(), value);
            }
        }
        RawRecord::Mapping(map)
    }
}

fn find_column(headers: &[String], field: Field) -> Option<ResolvedColumn> {
    let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
    field.aliases().iter().find_map(|alias| {
        lowered
            .iter()
            .position(|h| h == alias)
            .map(|index| ResolvedColumn {
                header: headers[index].clone(),
                index,
            })
    })
}

/// Resolve the header row of a file.
///
/// For each canonical column the accepted spellings are tried in priority
/// order and the first header matching case-insensitively wins. Fails with
/// the canonical names of every required column left unmatched; `id` is
/// optional.
pub fn resolve_columns(headers: &[String]) -> Result<ColumnMapping, HeaderError> {
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(HeaderError::Empty);
    }

    let found = Field::REQUIRED.map(|field| find_column(headers, field));
    let missing: Vec<&'static str> = Field::REQUIRED
        .iter()
        .zip(&found)
        .filter(|(_, column)| column.is_none())
        .map(|(field, _)| field.canonical_name())
        .collect();

    let [Some(title), Some(author), Some(year), Some(price)] = found else {
        return Err(HeaderError::MissingColumns(missing));
    };

    Ok(ColumnMapping {
        id: find_column(headers, Field::Id),
        title,
        author,
        year,
        price,
    })
}
