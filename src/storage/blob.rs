// file: src/storage/blob.rs
// description: azure blob storage rest client for container and block blob operations
// reference: https://learn.microsoft.com/rest/api/storageservices/blob-service-rest-api

use crate::auth::{STORAGE_SCOPE, TokenCredential};
use crate::config::StorageConfig;
use crate::error::{LoaderError, Result};
use crate::utils::http::{ensure_success, join_segments, parse_endpoint};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use std::sync::Arc;
use tracing::debug;

pub const STORAGE_API_VERSION: &str = "2023-11-03";

const SERVICE: &str = "blob storage";

#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn container_exists(&self, container: &str) -> Result<bool>;

    /// Returns `false` when the container already existed.
    async fn create_container(&self, container: &str) -> Result<bool>;

    async fn upload_blob(&self, container: &str, blob_name: &str, data: Vec<u8>) -> Result<()>;

    async fn delete_container(&self, container: &str) -> Result<()>;
}

#[derive(Clone)]
pub struct BlobServiceClient {
    http: Client,
    endpoint: Url,
    credential: Arc<dyn TokenCredential>,
}

impl BlobServiceClient {
    pub fn new(config: &StorageConfig, credential: Arc<dyn TokenCredential>) -> Result<Self> {
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

    pub fn container_url(&self, container: &str) -> Result<Url> {
        let mut url = join_segments(&self.endpoint, &[container])?;
        url.query_pairs_mut().append_pair("restype", "container");
        Ok(url)
    }

    pub fn blob_url(&self, container: &str, blob_name: &str) -> Result<Url> {
        join_segments(&self.endpoint, &[container, blob_name])
    }

    async fn request(&self, method: Method, url: Url) -> Result<RequestBuilder> {
        let token = self.credential.get_token(STORAGE_SCOPE).await?;
        let date = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();

        debug!("{} {}", method, url);

        Ok(self
            .http
            .request(method, url)
            .bearer_auth(token.token)
            .header("x-ms-version", STORAGE_API_VERSION)
            .header("x-ms-date", date))
    }
}

#[async_trait]
impl BlobStore for BlobServiceClient {
    async fn container_exists(&self, container: &str) -> Result<bool> {
        let url = self.container_url(container)?;
        let response = self.request(Method::HEAD, url).await?.send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }

        ensure_success(SERVICE, response).await?;
        Ok(true)
    }

    async fn create_container(&self, container: &str) -> Result<bool> {
        let url = self.container_url(container)?;
        let response = self.request(Method::PUT, url).await?.send().await?;

        if response.status() == StatusCode::CONFLICT {
            debug!("Container {} was created concurrently", container);
            return Ok(false);
        }

        ensure_success(SERVICE, response).await?;
        Ok(true)
    }

    async fn upload_blob(&self, container: &str, blob_name: &str, data: Vec<u8>) -> Result<()> {
        if blob_name.is_empty() {
            return Err(LoaderError::Validation("Blob name must not be empty".to_string()));
        }

        let url = self.blob_url(container, blob_name)?;
        let response = self
            .request(Method::PUT, url)
            .await?
            .header("x-ms-blob-type", "BlockBlob")
            .body(data)
            .send()
            .await?;

        ensure_success(SERVICE, response).await?;
        Ok(())
    }

    async fn delete_container(&self, container: &str) -> Result<()> {
        let url = self.container_url(container)?;
        let response = self.request(Method::DELETE, url).await?.send().await?;

        ensure_success(SERVICE, response).await?;
        Ok(())
    }
}
