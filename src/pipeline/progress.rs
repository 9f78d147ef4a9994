// file: src/pipeline/progress.rs
// description: progress tracking and statistics reporting for a load run
// reference: uses indicatif for progress bars and tracks upload/index counts

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadStats {
    pub files_found: usize,
    pub blobs_uploaded: usize,
    pub documents_indexed: usize,
    pub documents_failed: usize,
    pub bytes_uploaded: u64,
    pub duration_secs: u64,
}

impl LoadStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bytes_per_second(&self) -> f64 {
        if self.duration_secs == 0 {
            return 0.0;
        }
        self.bytes_uploaded as f64 / self.duration_secs as f64
    }

    pub fn success_rate(&self) -> f64 {
        let total = self.documents_indexed + self.documents_failed;
        if total == 0 {
            return 0.0;
        }
        (self.documents_indexed as f64 / total as f64) * 100.0
    }

    pub fn summary(&self) -> String {
        format!(
            "{} blobs uploaded ({} bytes), {} documents indexed, {} failed in {}s",
            self.blobs_uploaded,
            self.bytes_uploaded,
            self.documents_indexed.to_string().green(),
            self.documents_failed.to_string().red(),
            self.duration_secs
        )
    }
}

pub struct ProgressTracker {
    main_bar: ProgressBar,
    detail_bar: ProgressBar,
    total_files: usize,
    blobs_uploaded: Arc<AtomicUsize>,
    documents_indexed: Arc<AtomicUsize>,
    documents_failed: Arc<AtomicUsize>,
    bytes_uploaded: Arc<AtomicU64>,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn new(total_files: usize) -> Self {
        Self::with_color(total_files, true)
    }

    pub fn with_color(total_files: usize, colored: bool) -> Self {
        let multi_progress = MultiProgress::new();

        let main_bar = create_progress_bar(&multi_progress, total_files as u64, colored);
        let detail_bar = create_detail_bar(&multi_progress);

        Self::from_bars(total_files, main_bar, detail_bar)
    }

    /// Counts without drawing anything.
    pub fn hidden(total_files: usize) -> Self {
        Self::from_bars(total_files, ProgressBar::hidden(), ProgressBar::hidden())
    }

    fn from_bars(total_files: usize, main_bar: ProgressBar, detail_bar: ProgressBar) -> Self {
        Self {
            main_bar,
            detail_bar,
            total_files,
            blobs_uploaded: Arc::new(AtomicUsize::new(0)),
            documents_indexed: Arc::new(AtomicUsize::new(0)),
            documents_failed: Arc::new(AtomicUsize::new(0)),
            bytes_uploaded: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn add_blob(&self, bytes: u64) {
        self.blobs_uploaded.fetch_add(1, Ordering::SeqCst);
        self.bytes_uploaded.fetch_add(bytes, Ordering::SeqCst);
    }

    pub fn add_documents(&self, indexed: usize, failed: usize) {
        self.documents_indexed.fetch_add(indexed, Ordering::SeqCst);
        self.documents_failed.fetch_add(failed, Ordering::SeqCst);
    }

    pub fn inc_file(&self) {
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn set_message(&self, message: String) {
        self.main_bar.set_message(message);
    }

    pub fn finish(&self) {
        self.main_bar.finish_with_message("Processing complete");
        self.detail_bar.finish_and_clear();
    }

    pub fn get_stats(&self) -> LoadStats {
        LoadStats {
            files_found: self.total_files,
            blobs_uploaded: self.blobs_uploaded.load(Ordering::SeqCst),
            documents_indexed: self.documents_indexed.load(Ordering::SeqCst),
            documents_failed: self.documents_failed.load(Ordering::SeqCst),
            bytes_uploaded: self.bytes_uploaded.load(Ordering::SeqCst),
            duration_secs: self.start_time.elapsed().as_secs(),
        }
    }

    fn update_detail_bar(&self) {
        let indexed = self.documents_indexed.load(Ordering::SeqCst);
        let failed = self.documents_failed.load(Ordering::SeqCst);

        self.detail_bar
            .set_message(format!("Indexed: {} | Failed: {}", indexed, failed));
    }
}

/// A tracker dropped before `finish` belongs to an aborted run.
impl Drop for ProgressTracker {
    fn drop(&mut self) {
        if !self.main_bar.is_finished() {
            self.main_bar.abandon();
            self.detail_bar.finish_and_clear();
        }
    }
}

fn create_progress_bar(multi_progress: &MultiProgress, total: u64, colored: bool) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(total));
    let (template, chars) = if colored {
        (
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            "█▓▒░",
        )
    } else {
        ("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} {msg}", "=>-")
    };

    match ProgressStyle::default_bar().template(template) {
        Ok(style) => bar.set_style(style.progress_chars(chars)),
        Err(_) => bar.set_style(ProgressStyle::default_bar()),
    }
    bar
}

fn create_detail_bar(multi_progress: &MultiProgress) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(0));
    if let Ok(style) = ProgressStyle::default_bar().template("{msg}") {
        bar.set_style(style);
    }
    bar
}
