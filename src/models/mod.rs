// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod document;

pub use document::{IndexingResult, SearchDocument};
