// file: src/parser/csv.rs
// description: csv parsing as a validity check, and canonical re-serialization
// reference: https://docs.rs/csv

use crate::error::{LoaderError, Result};
use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCsv {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ParsedCsv {
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Header line then one line per row, `\n` terminated, quoting only
    /// fields that need it.
    pub fn to_csv_string(&self) -> Result<String> {
        let mut writer = WriterBuilder::new()
            .terminator(Terminator::Any(b'\n'))
            .quote_style(QuoteStyle::Necessary)
            .from_writer(Vec::new());

        writer
            .write_record(&self.headers)
            .map_err(|e| LoaderError::Serialization(e.to_string()))?;
        for row in &self.rows {
            writer
                .write_record(row)
                .map_err(|e| LoaderError::Serialization(e.to_string()))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| LoaderError::Serialization(e.to_string()))?;

        String::from_utf8(bytes).map_err(|e| LoaderError::Serialization(e.to_string()))
    }
}

pub struct CsvNormalizer;

impl Default for CsvNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Parses `data` with a header row. Blank lines are skipped, short rows
    /// are padded with empty fields, and rows longer than the header fail.
    pub fn parse(&self, file: &str, data: &[u8]) -> Result<ParsedCsv> {
        if let Some(line) = unterminated_quote_line(data) {
            return Err(parse_error(
                file,
                format!("EOF inside string starting at line {}", line),
            ));
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(data);

        let raw_headers = reader
            .headers()
            .map_err(|e| parse_error(file, e.to_string()))?
            .clone();

        if raw_headers.is_empty() {
            return Err(parse_error(file, "No columns to parse from file".to_string()));
        }

        let headers = dedupe_headers(raw_headers.iter());
        let width = headers.len();
        let mut rows = Vec::new();

        for record in reader.records() {
            let record = record.map_err(|e| parse_error(file, e.to_string()))?;

            if record.len() > width {
                let line = record.position().map(|p| p.line()).unwrap_or(0);
                return Err(parse_error(
                    file,
                    format!(
                        "Expected {} fields in line {}, saw {}",
                        width,
                        line,
                        record.len()
                    ),
                ));
            }

            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(width, String::new());
            rows.push(row);
        }

        debug!(
            "Parsed {}: {} columns, {} rows",
            file,
            width,
            rows.len()
        );

        Ok(ParsedCsv { headers, rows })
    }

    pub fn normalize(&self, file: &str, data: &[u8]) -> Result<String> {
        self.parse(file, data)?.to_csv_string()
    }
}

fn parse_error(file: &str, message: String) -> LoaderError {
    LoaderError::CsvParse {
        file: file.to_string(),
        message,
    }
}

/// The reader treats a quote left open at end of input as closed, folding
/// every remaining line into one field. Returns the 1-based line where such
/// a quote was opened.
fn unterminated_quote_line(data: &[u8]) -> Option<usize> {
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);

    let mut line = 1;
    let mut opened_at = None;
    let mut field_start = true;
    let mut bytes = data.iter().peekable();

    while let Some(&byte) = bytes.next() {
        if opened_at.is_some() {
            match byte {
                b'"' if bytes.peek() == Some(&&b'"') => {
                    bytes.next();
                }
                b'"' => opened_at = None,
                b'\n' => line += 1,
                _ => {}
            }
            continue;
        }

        match byte {
            b'"' if field_start => {
                opened_at = Some(line);
                field_start = false;
            }
            b',' | b'\r' => field_start = true,
            b'\n' => {
                line += 1;
                field_start = true;
            }
            _ => field_start = false,
        }
    }

    opened_at
}

/// Repeated column names get `.1`, `.2`, ... suffixes so every column stays
/// addressable after re-serialization.
fn dedupe_headers<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut headers = Vec::new();

    for name in names {
        let candidate = match seen.get(name).copied() {
            None => name.to_string(),
            Some(mut count) => {
                let mut candidate;
                loop {
                    count += 1;
                    candidate = format!("{}.{}", name, count);
                    if !seen.contains_key(&candidate) {
                        break;
                    }
                }
                seen.insert(name.to_string(), count);
                candidate
            }
        };
        seen.entry(candidate.clone()).or_insert(0);
        headers.push(candidate);
    }

    headers
}
