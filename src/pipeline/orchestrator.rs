// file: src/pipeline/orchestrator.rs
// description: drives teardown or the sequential upload-and-index run
// reference: orchestrates blob upload and search indexing per csv file

use crate::config::Config;
use crate::error::Result;
use crate::pipeline::progress::{LoadStats, ProgressTracker};
use crate::repository::CsvScanner;
use crate::search::{CsvIndexer, IndexProvisioner, SearchService};
use crate::storage::{BlobStore, BlobUploader};
use crate::utils::logging::format_step;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Index and container were deleted; nothing was uploaded.
    TornDown,
    /// The CSV folder had no matching files; no service was called.
    NoFiles,
    Processed(LoadStats),
}

pub struct Loader<B: BlobStore, S: SearchService> {
    config: Config,
    blobs: B,
    search: S,
    show_progress: bool,
    colored: bool,
}

impl<B: BlobStore, S: SearchService> Loader<B, S> {
    pub fn new(config: Config, blobs: B, search: S) -> Self {
        Self {
            config,
            blobs,
            search,
            show_progress: true,
            colored: true,
        }
    }

    pub fn with_progress(mut self, show_progress: bool, colored: bool) -> Self {
        self.show_progress = show_progress;
        self.colored = colored;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn blobs(&self) -> &B {
        &self.blobs
    }

    pub fn search(&self) -> &S {
        &self.search
    }

    pub async fn run(&self, delete: bool) -> Result<RunOutcome> {
        if delete {
            info!(
                "Deleting search index {} and blob container {} ...",
                self.config.search.index, self.config.storage.container
            );
            self.teardown().await?;
            return Ok(RunOutcome::TornDown);
        }

        self.process().await
    }

    /// The container is only deleted once the index delete has succeeded.
    pub async fn teardown(&self) -> Result<()> {
        info!("Deleting search index {}", self.config.search.index);
        self.search.delete_index(&self.config.search.index).await?;

        info!("Deleting blob container {}", self.config.storage.container);
        self.blobs
            .delete_container(&self.config.storage.container)
            .await?;

        Ok(())
    }

    /// Stops at the first failing file; later files are left untouched.
    pub async fn process(&self) -> Result<RunOutcome> {
        let csv_dir = &self.config.loader.csv_dir;
        let scanner = CsvScanner::new(&self.config.loader.pattern)?;
        let files = scanner.scan_directory(csv_dir)?;

        if files.is_empty() {
            info!("No CSV files found in {} folder", csv_dir.display());
            return Ok(RunOutcome::NoFiles);
        }

        IndexProvisioner::new(&self.search)
            .ensure_index(&self.config.search.index)
            .await?;

        let uploader = BlobUploader::new(&self.blobs, &self.config.storage.container);
        let indexer = CsvIndexer::new(&self.search, &self.config.search.index);

        let tracker = if self.show_progress {
            ProgressTracker::with_color(files.len(), self.colored)
        } else {
            ProgressTracker::hidden(files.len())
        };

        info!("Processing files...");

        for (position, file) in files.iter().enumerate() {
            info!(
                "{}",
                format_step(position + 1, files.len(), &file.path.display().to_string())
            );
            tracker.set_message(file.file_name.clone());

            let bytes = uploader.upload(file).await?;
            tracker.add_blob(bytes);

            let report = indexer.index(file).await?;
            tracker.add_documents(report.succeeded(), report.failed());
            tracker.inc_file();
        }

        tracker.finish();
        Ok(RunOutcome::Processed(tracker.get_stats()))
    }
}
