// file: src/search/mod.rs
// description: search service module exports
// reference: internal module structure

pub mod client;
pub mod indexer;
pub mod schema;

pub use client::{SEARCH_API_VERSION, SearchService, SearchServiceClient};
pub use indexer::{CsvIndexer, IndexReport};
pub use schema::{IndexDefinition, IndexProvisioner, ProvisionOutcome};
