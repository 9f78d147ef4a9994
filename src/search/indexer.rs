// file: src/search/indexer.rs
// description: parses a csv file and upserts it as a single search document
// reference: https://learn.microsoft.com/rest/api/searchservice/documents

use crate::error::{LoaderError, Result};
use crate::models::{IndexingResult, SearchDocument};
use crate::parser::CsvNormalizer;
use crate::repository::ScannedFile;
use crate::search::SearchService;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct IndexReport {
    pub document_id: String,
    pub results: Vec<IndexingResult>,
}

impl IndexReport {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.succeeded).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }
}

pub struct CsvIndexer<'a, S: SearchService + ?Sized> {
    service: &'a S,
    index: &'a str,
    normalizer: CsvNormalizer,
}

impl<'a, S: SearchService + ?Sized> CsvIndexer<'a, S> {
    pub fn new(service: &'a S, index: &'a str) -> Self {
        Self {
            service,
            index,
            normalizer: CsvNormalizer::new(),
        }
    }

    pub fn build_document(&self, file_name: &str, data: &[u8]) -> Result<SearchDocument> {
        let content = self.normalizer.normalize(file_name, data)?;
        info!("Successfully parsed {}", file_name);
        Ok(SearchDocument::from_csv(file_name, content))
    }

    /// Nothing is sent to the service if the file does not parse.
    pub async fn index(&self, file: &ScannedFile) -> Result<IndexReport> {
        let data = tokio::fs::read(&file.path)
            .await
            .map_err(|source| LoaderError::FileOperation {
                path: file.path.clone(),
                source,
            })?;

        let document = self.build_document(&file.file_name, &data)?;
        let document_id = document.id.clone();

        let results = self
            .service
            .upload_documents(self.index, std::slice::from_ref(&document))
            .await?;

        let report = IndexReport {
            document_id,
            results,
        };

        info!(
            "\tIndexed {} files, {} succeeded",
            report.total(),
            report.succeeded()
        );

        for result in report.results.iter().filter(|r| !r.succeeded) {
            warn!(
                "\tDocument {} rejected ({}): {}",
                result.key,
                result.status_code,
                result.error_message.as_deref().unwrap_or("no error message")
            );
        }

        Ok(report)
    }
}
