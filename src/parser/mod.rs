// file: src/parser/mod.rs
// description: csv parsing module exports
// reference: internal module structure

pub mod csv;

pub use self::csv::{CsvNormalizer, ParsedCsv};
