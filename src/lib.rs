// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod repository;
pub mod search;
pub mod storage;
pub mod utils;

#[cfg(test)]
mod testing;

pub use auth::{AzureDeveloperCliCredential, StaticTokenCredential, TokenCredential};
pub use config::{AuthConfig, Config, ConfigOverrides, LoaderConfig, SearchConfig, StorageConfig};
pub use error::{LoaderError, Result};
pub use models::{IndexingResult, SearchDocument};
pub use parser::{CsvNormalizer, ParsedCsv};
pub use pipeline::{LoadStats, Loader, ProgressTracker, RunOutcome};
pub use repository::{CsvScanner, ScannedFile};
pub use search::{
    CsvIndexer, IndexDefinition, IndexProvisioner, IndexReport, ProvisionOutcome, SearchService,
    SearchServiceClient,
};
pub use storage::{BlobServiceClient, BlobStore, BlobUploader};
pub use utils::Validator;
