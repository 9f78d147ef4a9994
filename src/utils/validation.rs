// file: src/utils/validation.rs
// description: input validation for resource names, endpoints and local paths
// reference: azure resource naming rules

use crate::error::{LoaderError, Result};
use std::path::Path;

const MAX_INDEX_NAME_LEN: usize = 128;

pub struct Validator;

impl Validator {
    pub fn validate_not_empty(what: &str, value: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(LoaderError::Validation(format!("{} must be set", what)));
        }
        Ok(())
    }

    pub fn validate_directory(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(LoaderError::Validation(format!(
                "Directory does not exist: {}",
                path.display()
            )));
        }

        if !path.is_dir() {
            return Err(LoaderError::Validation(format!(
                "Path is not a directory: {}",
                path.display()
            )));
        }

        Ok(())
    }

    /// Blob container names: 3-63 chars of `[a-z0-9-]`, alphanumeric at both
    /// ends, no consecutive hyphens.
    pub fn validate_container_name(name: &str) -> Result<()> {
        Self::validate_not_empty("container", name)?;

        let len = name.len();
        if !(3..=63).contains(&len) {
            return Err(LoaderError::Validation(format!(
                "Container name must be 3-63 characters: {}",
                name
            )));
        }

        if !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(LoaderError::Validation(format!(
                "Container name may only contain lowercase letters, digits and hyphens: {}",
                name
            )));
        }

        if name.starts_with('-') || name.ends_with('-') || name.contains("--") {
            return Err(LoaderError::Validation(format!(
                "Container name has a misplaced hyphen: {}",
                name
            )));
        }

        Ok(())
    }

    pub fn validate_index_name(name: &str) -> Result<()> {
        Self::validate_not_empty("index", name)?;

        if name.len() > MAX_INDEX_NAME_LEN {
            return Err(LoaderError::Validation(format!(
                "Index name longer than {} characters: {}",
                MAX_INDEX_NAME_LEN, name
            )));
        }

        let valid_chars = name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
        let valid_start = name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit());

        if !valid_chars || !valid_start {
            return Err(LoaderError::Validation(format!(
                "Index name must be lowercase alphanumeric with '-' or '_': {}",
                name
            )));
        }

        Ok(())
    }

    pub fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(LoaderError::Validation(format!(
                "Invalid URL format: {}",
                url
            )));
        }
        Ok(())
    }

    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            Some((idx, _)) => format!("{}...", &text[..idx]),
            None => text.to_string(),
        }
    }
}
