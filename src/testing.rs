// file: src/testing.rs
// description: in-memory blob store and search service used by unit tests

use crate::error::{LoaderError, Result};
use crate::models::{IndexingResult, SearchDocument};
use crate::repository::ScannedFile;
use crate::search::{IndexDefinition, SearchService};
use crate::storage::BlobStore;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;

pub fn scanned(dir: &Path, file_name: &str, contents: &str) -> ScannedFile {
    let path = dir.join(file_name);
    std::fs::write(&path, contents).unwrap();
    ScannedFile {
        path,
        file_name: file_name.to_string(),
        size: contents.len() as u64,
    }
}

#[derive(Default)]
struct BlobState {
    containers: HashMap<String, HashMap<String, Vec<u8>>>,
    calls: Vec<String>,
}

#[derive(Default)]
pub struct FakeBlobStore {
    state: Mutex<BlobState>,
}

impl FakeBlobStore {
    pub fn with_container(name: &str) -> Self {
        let store = Self::default();
        store
            .state
            .lock()
            .unwrap()
            .containers
            .insert(name.to_string(), HashMap::new());
        store
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn has_container(&self, name: &str) -> bool {
        self.state.lock().unwrap().containers.contains_key(name)
    }

    pub fn blob(&self, container: &str, name: &str) -> Option<Vec<u8>> {
        self.state
            .lock()
            .unwrap()
            .containers
            .get(container)
            .and_then(|blobs| blobs.get(name).cloned())
    }

    pub fn blob_count(&self, container: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .containers
            .get(container)
            .map_or(0, HashMap::len)
    }
}

fn not_found(service: &'static str, what: &str) -> LoaderError {
    LoaderError::service(service, StatusCode::NOT_FOUND, what.to_string())
}

#[async_trait]
impl BlobStore for FakeBlobStore {
    async fn container_exists(&self, container: &str) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("container_exists {}", container));
        Ok(state.containers.contains_key(container))
    }

    async fn create_container(&self, container: &str) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("create_container {}", container));
        if state.containers.contains_key(container) {
            return Ok(false);
        }
        state.containers.insert(container.to_string(), HashMap::new());
        Ok(true)
    }

    async fn upload_blob(&self, container: &str, blob_name: &str, data: Vec<u8>) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state
            .calls
            .push(format!("upload_blob {}/{}", container, blob_name));
        let blobs = state
            .containers
            .get_mut(container)
            .ok_or_else(|| not_found("blob storage", "ContainerNotFound"))?;
        blobs.insert(blob_name.to_string(), data);
        Ok(())
    }

    async fn delete_container(&self, container: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("delete_container {}", container));
        state
            .containers
            .remove(container)
            .map(|_| ())
            .ok_or_else(|| not_found("blob storage", "ContainerNotFound"))
    }
}

#[derive(Default)]
struct SearchState {
    indexes: HashMap<String, HashMap<String, SearchDocument>>,
    rejected: HashSet<String>,
    fail_delete: bool,
    calls: Vec<String>,
}

#[derive(Default)]
pub struct FakeSearchService {
    state: Mutex<SearchState>,
}

impl FakeSearchService {
    pub fn with_index(name: &str) -> Self {
        let service = Self::default();
        service
            .state
            .lock()
            .unwrap()
            .indexes
            .insert(name.to_string(), HashMap::new());
        service
    }

    /// Documents with this key come back with `status: false`.
    pub fn rejecting(self, key: &str) -> Self {
        self.state.lock().unwrap().rejected.insert(key.to_string());
        self
    }

    pub fn failing_delete(self) -> Self {
        self.state.lock().unwrap().fail_delete = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn index_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.state.lock().unwrap().indexes.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn document(&self, index: &str, id: &str) -> Option<SearchDocument> {
        self.state
            .lock()
            .unwrap()
            .indexes
            .get(index)
            .and_then(|docs| docs.get(id).cloned())
    }

    pub fn document_count(&self, index: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .indexes
            .get(index)
            .map_or(0, HashMap::len)
    }
}

#[async_trait]
impl SearchService for FakeSearchService {
    async fn list_index_names(&self) -> Result<Vec<String>> {
        self.state
            .lock()
            .unwrap()
            .calls
            .push("list_index_names".to_string());
        Ok(self.index_names())
    }

    async fn create_index(&self, definition: &IndexDefinition) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("create_index {}", definition.name));
        state
            .indexes
            .entry(definition.name.clone())
            .or_default();
        Ok(())
    }

    async fn delete_index(&self, name: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("delete_index {}", name));
        if state.fail_delete {
            return Err(LoaderError::service(
                "search",
                StatusCode::SERVICE_UNAVAILABLE,
                "Service Unavailable".to_string(),
            ));
        }
        state
            .indexes
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| not_found("search", "IndexNotFound"))
    }

    async fn upload_documents(
        &self,
        index: &str,
        documents: &[SearchDocument],
    ) -> Result<Vec<IndexingResult>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("upload_documents {}", index));

        let rejected = state.rejected.clone();
        let docs = state
            .indexes
            .get_mut(index)
            .ok_or_else(|| not_found("search", "IndexNotFound"))?;

        let results = documents
            .iter()
            .map(|document| {
                if rejected.contains(&document.id) {
                    return IndexingResult {
                        key: document.id.clone(),
                        succeeded: false,
                        error_message: Some("Document rejected".to_string()),
                        status_code: 400,
                    };
                }
                let existed = docs.insert(document.id.clone(), document.clone()).is_some();
                IndexingResult {
                    key: document.id.clone(),
                    succeeded: true,
                    error_message: None,
                    status_code: if existed { 200 } else { 201 },
                }
            })
            .collect();

        Ok(results)
    }
}
