// file: src/search/client.rs
// description: azure ai search rest client for index management and document upload
// reference: https://learn.microsoft.com/rest/api/searchservice/

use crate::auth::{SEARCH_SCOPE, TokenCredential};
use crate::config::SearchConfig;
use crate::error::Result;
use crate::models::{IndexingResult, SearchDocument};
use crate::search::schema::IndexDefinition;
use crate::utils::http::{ensure_success, join_segments, parse_endpoint};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

pub const SEARCH_API_VERSION: &str = "2023-11-01";

const SERVICE: &str = "search";

#[async_trait]
pub trait SearchService: Send + Sync {
    async fn list_index_names(&self) -> Result<Vec<String>>;

    async fn create_index(&self, definition: &IndexDefinition) -> Result<()>;

    async fn delete_index(&self, name: &str) -> Result<()>;

    /// Upserts documents by key; the service reports success per document.
    async fn upload_documents(
        &self,
        index: &str,
        documents: &[SearchDocument],
    ) -> Result<Vec<IndexingResult>>;
}

#[derive(Debug, Deserialize)]
struct IndexList {
    value: Vec<IndexName>,
}

#[derive(Debug, Deserialize)]
struct IndexName {
    name: String,
}

#[derive(Debug, Serialize)]
struct IndexBatch<'a> {
    value: Vec<IndexAction<'a>>,
}

#[derive(Debug, Serialize)]
struct IndexAction<'a> {
    #[serde(rename = "@search.action")]
    action: &'static str,
    #[serde(flatten)]
    document: &'a SearchDocument,
}

#[derive(Debug, Deserialize)]
struct IndexBatchResponse {
    value: Vec<IndexingResult>,
}

#[derive(Clone)]
pub struct SearchServiceClient {
    http: Client,
    endpoint: Url,
    credential: Arc<dyn TokenCredential>,
}

impl SearchServiceClient {
    pub fn new(config: &SearchConfig, credential: Arc<dyn TokenCredential>) -> Result<Self> {
        Self::with_endpoint(&config.endpoint(), credential)
    }

    pub fn with_endpoint(endpoint: &str, credential: Arc<dyn TokenCredential>) -> Result<Self> {
        Ok(Self {
            http: Client::new(),
            endpoint: parse_endpoint(endpoint)?,
            credential,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = join_segments(&self.endpoint, segments)?;
        url.query_pairs_mut()
            .append_pair("api-version", SEARCH_API_VERSION);
        Ok(url)
    }

    async fn request(&self, method: Method, url: Url) -> Result<RequestBuilder> {
        let token = self.credential.get_token(SEARCH_SCOPE).await?;

        debug!("{} {}", method, url);

        Ok(self.http.request(method, url).bearer_auth(token.token))
    }
}

#[async_trait]
impl SearchService for SearchServiceClient {
    async fn list_index_names(&self) -> Result<Vec<String>> {
        let mut url = self.url(&["indexes"])?;
        url.query_pairs_mut().append_pair("$select", "name");

        let response = self.request(Method::GET, url).await?.send().await?;
        let list: IndexList = ensure_success(SERVICE, response).await?.json().await?;

        Ok(list.value.into_iter().map(|index| index.name).collect())
    }

    async fn create_index(&self, definition: &IndexDefinition) -> Result<()> {
        let url = self.url(&["indexes"])?;
        let response = self
            .request(Method::POST, url)
            .await?
            .json(definition)
            .send()
            .await?;

        ensure_success(SERVICE, response).await?;
        Ok(())
    }

    async fn delete_index(&self, name: &str) -> Result<()> {
        let url = self.url(&["indexes", name])?;
        let response = self.request(Method::DELETE, url).await?.send().await?;

        ensure_success(SERVICE, response).await?;
        Ok(())
    }

    async fn upload_documents(
        &self,
        index: &str,
        documents: &[SearchDocument],
    ) -> Result<Vec<IndexingResult>> {
        let batch = IndexBatch {
            value: documents
                .iter()
                .map(|document| IndexAction {
                    action: "upload",
                    document,
                })
                .collect(),
        };

        let url = self.url(&["indexes", index, "docs", "index"])?;
        let response = self
            .request(Method::POST, url)
            .await?
            .json(&batch)
            .send()
            .await?;

        // 207 means some documents failed; the per-document results say which.
        let results: IndexBatchResponse = ensure_success(SERVICE, response).await?.json().await?;
        Ok(results.value)
    }
}
