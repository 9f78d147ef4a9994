// file: src/repository/mod.rs
// description: local csv folder operations module exports
// reference: Internal module structure

pub mod scanner;

pub use scanner::{CsvScanner, ScannedFile};
