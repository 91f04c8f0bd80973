//! CSV export of catalog records.
//!
//! Records of any [`RawRecord`] shape are normalized, then written as one
//! rectangular table. The `id` column is decided once for the whole export:
//! present on every row as soon as any record carries an id, absent
//! everywhere otherwise.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::normalize::{normalize, NormalizedRow, RawRecord};
use crate::error::ExportResult;
use crate::validation::normalize_decimal;

/// Header written when at least one record has an id.
pub const HEADER_WITH_ID: [&str; 5] = ["id", "titulo", "autor", "ano_publicacao", "preco"];

/// Header written when no record has an id.
pub const HEADER: [&str; 4] = ["titulo", "autor", "ano_publicacao", "preco"];

fn text_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn year_cell(value: &Value) -> String {
    match value {
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(f)) if f.fract() == 0.0 => format!("{:.0}", f),
            _ => n.to_string(),
        },
        other => text_cell(other),
    }
}

/// Prices render with exactly two decimals when they read as numbers;
/// anything else is written back verbatim.
fn price_cell(value: &Value) -> String {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => normalize_decimal(s).parse::<f64>().ok(),
        _ => None,
    };
    match parsed.filter(|p| p.is_finite()) {
        Some(price) => format!("{:.2}", price),
        None => text_cell(value),
    }
}

fn row_cells(row: &NormalizedRow, with_id: bool) -> Vec<String> {
    let mut cells = Vec::with_capacity(5);
    if with_id {
        cells.push(text_cell(&row.id));
    }
    cells.push(text_cell(&row.title));
    cells.push(text_cell(&row.author));
    cells.push(year_cell(&row.year));
    cells.push(price_cell(&row.price));
    cells
}

/// Write `records` as comma-separated CSV to `writer`.
///
/// Returns the number of data rows written.
pub fn write_csv<I, R, W>(records: I, writer: W) -> ExportResult<usize>
where
    I: IntoIterator<Item = R>,
    R: Into<RawRecord>,
    W: Write,
{
    let rows: Vec<NormalizedRow> = records
        .into_iter()
        .map(|record| normalize(&record.into()))
        .collect();
    let with_id = rows.iter().any(|row| !row.id.is_null());

    let mut csv_writer = csv::Writer::from_writer(writer);
    if with_id {
        csv_writer.write_record(HEADER_WITH_ID)?;
    } else {
        csv_writer.write_record(HEADER)?;
    }
    for row in &rows {
        csv_writer.write_record(row_cells(row, with_id))?;
    }
    csv_writer.flush()?;

    Ok(rows.len())
}

/// Export `records` to `path`, creating parent directories as needed.
///
/// Returns the resolved path of the written file.
pub fn export_csv<I, R>(records: I, path: impl AsRef<Path>) -> ExportResult<PathBuf>
where
    I: IntoIterator<Item = R>,
    R: Into<RawRecord>,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file = fs::File::create(path)?;
    write_csv(records, file)?;

    Ok(fs::canonicalize(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Book;
    use serde_json::json;
    use tempfile::tempdir;

    fn render<R: Into<RawRecord>>(records: Vec<R>) -> String {
        let mut out = Vec::new();
        write_csv(records, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_no_ids_omits_column() {
        let out = render(vec![Book::new("Iracema", "José de Alencar", 1865, 19.9)]);
        assert_eq!(out, "titulo,autor,ano_publicacao,preco\nIracema,José de Alencar,1865,19.90\n");
    }

    #[test]
    fn test_any_id_adds_column_everywhere() {
        let out = render(vec![
            RawRecord::from(vec![json!("Sem id"), json!("Autor"), json!(2001), json!(5)]),
            RawRecord::from(&Book::new("Com id", "Autor", 2002, 7.5).with_id(12)),
        ]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "id,titulo,autor,ano_publicacao,preco");
        assert_eq!(lines[1], ",Sem id,Autor,2001,5.00");
        assert_eq!(lines[2], "12,Com id,Autor,2002,7.50");
    }

    #[test]
    fn test_invalid_legacy_values_written_verbatim() {
        let out = render(vec![RawRecord::from_json(json!({
            "titulo": "",
            "autor": null,
            "ano": "desconhecido",
            "preco": "a combinar"
        }))]);
        assert_eq!(out.lines().nth(1), Some(",,desconhecido,a combinar"));
    }

    #[test]
    fn test_decimal_comma_price_rendered() {
        let out = render(vec![RawRecord::from_json(json!({
            "titulo": "Dom Casmurro",
            "autor": "Machado de Assis",
            "ano_publicacao": "1899",
            "preco": "29,9"
        }))]);
        assert!(out.ends_with("Dom Casmurro,Machado de Assis,1899,29.90\n"));
    }

    #[test]
    fn test_fields_with_commas_quoted() {
        let out = render(vec![Book::new("Quincas Borba, o filósofo", "Machado de Assis", 1891, 12.5)]);
        assert!(out.contains("\"Quincas Borba, o filósofo\""));
    }

    #[test]
    fn test_empty_export_has_header_only() {
        let out = render(Vec::<Book>::new());
        assert_eq!(out, "titulo,autor,ano_publicacao,preco\n");
    }

    #[test]
    fn test_export_csv_creates_dirs_and_resolves_path() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("exports").join("livros.csv");
        let resolved = export_csv(vec![Book::new("A", "B", 2000, 1.0)], &target).unwrap();

        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("exports/livros.csv"));
        let content = fs::read_to_string(resolved).unwrap();
        assert!(content.starts_with("titulo,autor"));
    }
}
