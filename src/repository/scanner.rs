// file: src/repository/scanner.rs
// description: csv file discovery in the local upload folder
// reference: https://docs.rs/walkdir

use crate::error::{LoaderError, Result};
use crate::utils::Validator;
use globset::{Glob, GlobMatcher};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

pub struct CsvScanner {
    matcher: GlobMatcher,
}

#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub file_name: String,
    pub size: u64,
}

impl CsvScanner {
    /// Only the last path component of `pattern` is used, so `..\*.csv` and
    /// `data/*.csv` both filter by `*.csv`.
    pub fn new(pattern: &str) -> Result<Self> {
        let name_pattern = Path::new(pattern)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(pattern);
        let name_pattern = name_pattern.rsplit('\\').next().unwrap_or(name_pattern);

        let matcher = Glob::new(name_pattern)
            .map_err(|e| LoaderError::Config(format!("Invalid file pattern {}: {}", pattern, e)))?
            .compile_matcher();

        Ok(Self { matcher })
    }

    pub fn scan_directory(&self, root: &Path) -> Result<Vec<ScannedFile>> {
        Validator::validate_directory(root)?;
        info!("Scanning directory: {}", root.display());

        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| LoaderError::FileOperation {
                path: root.to_path_buf(),
                source: e.into(),
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let Some(file_name) = entry.file_name().to_str() else {
                debug!("Skipping non UTF-8 file name: {}", entry.path().display());
                continue;
            };

            if !file_name.ends_with(".csv") || !self.matcher.is_match(file_name) {
                debug!("Skipping file: {}", file_name);
                continue;
            }

            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);

            files.push(ScannedFile {
                path: entry.path().to_path_buf(),
                file_name: file_name.to_string(),
                size,
            });
        }

        info!("Found {} CSV files", files.len());
        Ok(files)
    }
}
