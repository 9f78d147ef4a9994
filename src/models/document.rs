// file: src/models/document.rs
// description: search document built from one csv file, and per-document indexing results
// reference: https://learn.microsoft.com/rest/api/searchservice/documents

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchDocument {
    pub id: String,
    pub content: String,
    pub category: Option<String>,
    pub sourcepage: String,
    pub sourcefile: String,
}

impl SearchDocument {
    pub fn from_csv(file_name: &str, content: String) -> Self {
        Self {
            id: Self::document_id(file_name),
            content,
            category: None,
            sourcepage: file_name.to_string(),
            sourcefile: file_name.to_string(),
        }
    }

    /// Keys may not contain dots, so `sales.2024.csv` becomes `sales_2024_csv`.
    pub fn document_id(file_name: &str) -> String {
        file_name.replace('.', "_")
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexingResult {
    pub key: String,
    #[serde(rename = "status")]
    pub succeeded: bool,
    #[serde(default)]
    pub error_message: Option<String>,
    pub status_code: u16,
}
