//! CSV dialect sniffing.
//!
//! Looks at the first few kilobytes of a file and decides which of a fixed
//! set of delimiters is in use, and whether fields are quoted with `"` or `'`.
//! Detection never fails: anything ambiguous falls back to
//! [`Dialect::default`] (comma, double quote, doubled-quote escaping).

use csv::ReaderBuilder;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Delimiters considered by the sniffer, in tie-break order.
pub const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Number of characters inspected.
pub const SAMPLE_SIZE: usize = 4096;

/// Share of sampled rows that must agree on the field count.
const MIN_CONSISTENCY: f64 = 0.75;

static DOUBLE_QUOTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)(?:^|[,;\t|]) *"[^"\n]*" *(?:[,;\t|]|$)"#).unwrap());

static SINGLE_QUOTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)(?:^|[,;\t|]) *'[^'\n]*' *(?:[,;\t|]|$)").unwrap());

/// Delimiter and quoting convention of a CSV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dialect {
    pub delimiter: u8,
    pub quote: u8,
    /// Quotes inside quoted fields are escaped by doubling them.
    pub double_quote: bool,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            double_quote: true,
        }
    }
}

impl Dialect {
    /// Printable form of the delimiter (`\t` for tabs).
    pub fn delimiter_display(&self) -> String {
        match self.delimiter {
            b'\t' => "\\t".to_string(),
            d => (d as char).to_string(),
        }
    }

    /// A `csv` reader builder configured for this dialect.
    pub fn reader_builder(&self) -> ReaderBuilder {
        let mut builder = ReaderBuilder::new();
        builder
            .delimiter(self.delimiter)
            .quote(self.quote)
            .double_quote(self.double_quote)
            .flexible(true);
        builder
    }
}

/// Leading part of `content` used for sniffing.
///
/// When the content is longer than [`SAMPLE_SIZE`] characters the sample is
/// cut back to the last complete line so a truncated row does not skew the
/// field counts.
pub fn take_sample(content: &str) -> &str {
    match content.char_indices().nth(SAMPLE_SIZE) {
        None => content,
        Some((cut, _)) => {
            let head = &content[..cut];
            match head.rfind('\n') {
                Some(nl) => &head[..nl],
                None => head,
            }
        }
    }
}

/// Infer the dialect of `sample`, falling back to the default on failure.
pub fn detect_dialect(sample: &str) -> Dialect {
    sniff(sample).unwrap_or_default()
}

/// Infer the dialect of `sample`, or `None` when it is empty, has a single
/// column, or two delimiters fit equally well.
pub fn sniff(sample: &str) -> Option<Dialect> {
    if sample.trim().is_empty() {
        return None;
    }

    let quote = guess_quote(sample);

    let mut best: Option<(Score, u8)> = None;
    let mut tied = false;

    for &delimiter in &CANDIDATE_DELIMITERS {
        let dialect = Dialect {
            delimiter,
            quote,
            double_quote: true,
        };
        let Some(score) = score_delimiter(sample, &dialect) else {
            continue;
        };
        match &best {
            Some((current, _)) if score == *current => tied = true,
            Some((current, _)) if score < *current => {}
            _ => {
                best = Some((score, delimiter));
                tied = false;
            }
        }
    }

    if tied {
        return None;
    }

    best.map(|(_, delimiter)| Dialect {
        delimiter,
        quote,
        double_quote: true,
    })
}

/// Ranking of a candidate: row agreement first, then column count.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
struct Score {
    consistency: f64,
    fields: usize,
}

fn score_delimiter(sample: &str, dialect: &Dialect) -> Option<Score> {
    let mut reader = dialect
        .reader_builder()
        .has_headers(false)
        .from_reader(sample.as_bytes());

    let mut counts = Vec::new();
    for record in reader.records() {
        counts.push(record.ok()?.len());
    }

    let header_fields = *counts.first()?;
    if header_fields < 2 {
        return None;
    }

    let agreeing = counts.iter().filter(|&&n| n == header_fields).count();
    let consistency = agreeing as f64 / counts.len() as f64;
    if consistency < MIN_CONSISTENCY {
        return None;
    }

    Some(Score {
        consistency,
        fields: header_fields,
    })
}

fn guess_quote(sample: &str) -> u8 {
    let double = DOUBLE_QUOTED.find_iter(sample).count();
    let single = SINGLE_QUOTED.find_iter(sample).count();
    if single > double {
        b'\''
    } else {
        b'"'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_comma() {
        let sample = "titulo,autor,ano_publicacao,preco\nIracema,José de Alencar,1865,19.90\n";
        assert_eq!(detect_dialect(sample), Dialect::default());
    }

    #[test]
    fn test_detect_semicolon_with_decimal_comma() {
        let sample = "titulo;autor;ano_publicacao;preco\nDom Casmurro;Machado de Assis;1899;29,90\n";
        let dialect = detect_dialect(sample);
        assert_eq!(dialect.delimiter, b';');
        assert_eq!(dialect.quote, b'"');
    }

    #[test]
    fn test_detect_tab() {
        let sample = "titulo\tautor\tano\tpreco\nA\tB\t2000\t10\n";
        assert_eq!(detect_dialect(sample).delimiter, b'\t');
    }

    #[test]
    fn test_detect_pipe() {
        let sample = "titulo|autor|ano|preco\nA|B|2000|10\nC|D|2001|11\n";
        let dialect = detect_dialect(sample);
        assert_eq!(dialect.delimiter, b'|');
        assert_eq!(dialect.delimiter_display(), "|");
    }

    #[test]
    fn test_quoted_delimiters_do_not_confuse() {
        let sample = "titulo,autor,ano,preco\n\"Memórias; Póstumas\",\"Machado de Assis\",1881,\"35,00\"\n";
        assert_eq!(detect_dialect(sample).delimiter, b',');
    }

    #[test]
    fn test_single_quote_detected() {
        let sample = "titulo;autor;ano;preco\n'O Cortiço';'Aluísio Azevedo';1890;'22,50'\n";
        let dialect = detect_dialect(sample);
        assert_eq!(dialect.delimiter, b';');
        assert_eq!(dialect.quote, b'\'');
    }

    #[test]
    fn test_ragged_row_tolerated() {
        let sample = "a;b;c;d\n1;2;3;4\n5;6;7;8\n9;10;11\n12;13;14;15\n";
        assert_eq!(detect_dialect(sample).delimiter, b';');
    }

    #[test]
    fn test_empty_falls_back() {
        assert_eq!(sniff(""), None);
        assert_eq!(detect_dialect("   \n"), Dialect::default());
    }

    #[test]
    fn test_single_column_falls_back() {
        assert_eq!(sniff("titulo\nIracema\n"), None);
        assert_eq!(detect_dialect("titulo\nIracema\n"), Dialect::default());
    }

    #[test]
    fn test_ambiguous_falls_back() {
        // Two columns under both comma and semicolon.
        let sample = "a,b;c\n1,2;3\n";
        assert_eq!(sniff(sample), None);
        assert_eq!(detect_dialect(sample), Dialect::default());
    }

    #[test]
    fn test_take_sample_cuts_at_line() {
        let line = "titulo;autor;ano;preco\n";
        let content = line.repeat(400);
        let sample = take_sample(&content);
        assert!(sample.chars().count() <= SAMPLE_SIZE);
        assert!(sample.ends_with("preco"));

        assert_eq!(take_sample("a,b\n1,2"), "a,b\n1,2");
    }
}
