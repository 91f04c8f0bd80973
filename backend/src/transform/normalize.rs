//! Structural normalization of raw book records.
//!
//! Records reach the pipeline in several shapes: key/value mappings (CSV rows
//! or JSON objects), positional sequences (query results, caller-supplied
//! lists) and attribute-bearing objects ([`Book`]). [`RawRecord`] has one
//! variant per shape and [`normalize`] reduces all of them to a
//! [`NormalizedRow`].
//!
//! No validation happens here. Exports normalize already-persisted rows that
//! may not pass today's rules, so values are reshaped, never checked.
//!
//! ```text
//! Mapping  {"Title": .., "autor": .., "year": .., "price": ..}  ─┐
//! Sequence [id, titulo, autor, ano, preco] or [titulo, ..]       ├─▶ (id, titulo, autor, ano, preco)
//! Object   Book { id, title, author, year, price }              ─┘
//! ```

use serde_json::{Map, Value};

use crate::models::{Book, Field};

/// Named attributes of an object-shaped record. Absent attributes are `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    pub id: Value,
    pub titulo: Value,
    pub autor: Value,
    pub ano_publicacao: Value,
    pub preco: Value,
}

/// A book record in any accepted input shape.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRecord {
    /// Keys drawn from the alias table, any case. Unknown keys are ignored.
    Mapping(Map<String, Value>),
    /// `[id, titulo, autor, ano, preco]`, `[titulo, autor, ano, preco]`, or
    /// fewer elements padded with `null`.
    Sequence(Vec<Value>),
    /// Object exposing `id/titulo/autor/ano_publicacao/preco`.
    Object(Attributes),
}

impl RawRecord {
    /// Classify an arbitrary JSON value.
    ///
    /// Objects become mappings, arrays sequences; a lone scalar is read as a
    /// one-element sequence.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::Mapping(map),
            Value::Array(items) => Self::Sequence(items),
            other => Self::Sequence(vec![other]),
        }
    }
}

impl From<Map<String, Value>> for RawRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self::Mapping(map)
    }
}

impl From<Vec<Value>> for RawRecord {
    fn from(items: Vec<Value>) -> Self {
        Self::Sequence(items)
    }
}

impl From<Attributes> for RawRecord {
    fn from(attrs: Attributes) -> Self {
        Self::Object(attrs)
    }
}

impl From<&Book> for RawRecord {
    fn from(book: &Book) -> Self {
        Self::Object(Attributes {
            id: book.id.map(Value::from).unwrap_or(Value::Null),
            titulo: Value::from(book.title.as_str()),
            autor: Value::from(book.author.as_str()),
            ano_publicacao: Value::from(book.year),
            preco: Value::from(book.price),
        })
    }
}

impl From<Book> for RawRecord {
    fn from(book: Book) -> Self {
        Self::from(&book)
    }
}

/// Canonical `(id, titulo, autor, ano_publicacao, preco)` tuple, values
/// still unvalidated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedRow {
    pub id: Value,
    pub title: Value,
    pub author: Value,
    pub year: Value,
    pub price: Value,
}

impl NormalizedRow {
    fn from_positions(id: Value, rest: &[Value]) -> Self {
        let at = |i: usize| rest.get(i).cloned().unwrap_or(Value::Null);
        Self {
            id,
            title: at(0),
            author: at(1),
            year: at(2),
            price: at(3),
        }
    }
}

fn lookup(entries: &[(String, &Value)], field: Field) -> Value {
    field
        .aliases()
        .iter()
        .find_map(|alias| entries.iter().find(|(key, _)| key == alias))
        .map(|(_, value)| (*value).clone())
        .unwrap_or(Value::Null)
}

/// Reshape any accepted record into the canonical tuple.
///
/// - Mappings: keys are matched case-insensitively against the alias table;
///   when several spellings of the same column are present, the one listed
///   first in the table wins.
/// - Sequences of 5 or more: `id, titulo, autor, ano, preco`, trailing extras
///   ignored.
/// - Sequences of exactly 4: no id.
/// - Shorter sequences: read like the 4-element layout, padded with `null`.
/// - Objects: attributes read by name.
pub fn normalize(item: &RawRecord) -> NormalizedRow {
    match item {
        RawRecord::Mapping(map) => {
            let entries: Vec<(String, &Value)> = map
                .iter()
                .map(|(key, value)| (key.trim().to_lowercase(), value))
                .collect();
            NormalizedRow {
                id: lookup(&entries, Field::Id),
                title: lookup(&entries, Field::Title),
                author: lookup(&entries, Field::Author),
                year: lookup(&entries, Field::Year),
                price: lookup(&entries, Field::Price),
            }
        }
        RawRecord::Sequence(items) if items.len() >= 5 => {
            NormalizedRow::from_positions(items[0].clone(), &items[1..5])
        }
        RawRecord::Sequence(items) => NormalizedRow::from_positions(Value::Null, items),
        RawRecord::Object(attrs) => NormalizedRow {
            id: attrs.id.clone(),
            title: attrs.titulo.clone(),
            author: attrs.autor.clone(),
            year: attrs.ano_publicacao.clone(),
            price: attrs.preco.clone(),
        },
    }
}
