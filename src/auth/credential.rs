// file: src/auth/credential.rs
// description: bearer token providers backed by the azure developer cli
// reference: https://learn.microsoft.com/azure/developer/azure-developer-cli/reference#azd-auth-token

use crate::config::{AuthConfig, UNTENANTED_PROCESS_TIMEOUT_SECS};
use crate::error::{LoaderError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::debug;

pub const STORAGE_SCOPE: &str = "https://storage.azure.com/.default";
pub const SEARCH_SCOPE: &str = "https://search.azure.com/.default";

/// Tokens closer than this to expiry are fetched again.
const REFRESH_MARGIN_SECS: i64 = 300;

#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_on: Option<DateTime<Utc>>,
}

impl AccessToken {
    pub fn new(token: impl Into<String>, expires_on: Option<DateTime<Utc>>) -> Self {
        Self {
            token: token.into(),
            expires_on,
        }
    }

    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        match self.expires_on {
            Some(expires_on) => expires_on - ChronoDuration::seconds(REFRESH_MARGIN_SECS) > now,
            None => false,
        }
    }
}

#[async_trait]
pub trait TokenCredential: Send + Sync {
    async fn get_token(&self, scope: &str) -> Result<AccessToken>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AzdTokenOutput {
    token: String,
    expires_on: Option<String>,
}

/// Signs requests as the user logged in with `azd auth login`.
pub struct AzureDeveloperCliCredential {
    program: PathBuf,
    tenant_id: Option<String>,
    timeout: Option<Duration>,
    cache: Mutex<HashMap<String, AccessToken>>,
}

impl AzureDeveloperCliCredential {
    pub fn new(tenant_id: Option<String>, timeout: Option<Duration>) -> Self {
        Self {
            program: PathBuf::from("azd"),
            tenant_id,
            timeout,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// The configured process timeout applies when a tenant is pinned;
    /// otherwise the shorter default bound is used.
    pub fn from_config(config: &AuthConfig) -> Self {
        let secs = match config.tenant_id {
            Some(_) => config.process_timeout_secs,
            None => UNTENANTED_PROCESS_TIMEOUT_SECS,
        };
        Self::new(config.tenant_id.clone(), Some(Duration::from_secs(secs)))
    }

    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn tenant_id(&self) -> Option<&str> {
        self.tenant_id.as_deref()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    async fn request_token(&self, scope: &str) -> Result<AccessToken> {
        let mut command = Command::new(&self.program);
        command
            .args(["auth", "token", "--output", "json", "--scope", scope])
            .kill_on_drop(true);
        if let Some(tenant_id) = &self.tenant_id {
            command.args(["--tenant-id", tenant_id]);
        }

        debug!("Requesting token for scope {}", scope);

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, command.output())
                .await
                .map_err(|_| {
                    LoaderError::Auth(format!(
                        "{} did not return a token within {}s",
                        self.program.display(),
                        limit.as_secs()
                    ))
                })?,
            None => command.output().await,
        }
        .map_err(|e| {
            LoaderError::Auth(format!(
                "Failed to run {}: {}. Is the Azure Developer CLI installed?",
                self.program.display(),
                e
            ))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LoaderError::Auth(format!(
                "{} exited with {}: {}. Run `azd auth login` first.",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }

        parse_token_output(&output.stdout)
    }
}

#[async_trait]
impl TokenCredential for AzureDeveloperCliCredential {
    async fn get_token(&self, scope: &str) -> Result<AccessToken> {
        {
            let cache = self.cache.lock().await;
            if let Some(token) = cache.get(scope)
                && token.is_fresh(Utc::now())
            {
                return Ok(token.clone());
            }
        }

        let token = self.request_token(scope).await?;
        if token.expires_on.is_some() {
            self.cache
                .lock()
                .await
                .insert(scope.to_string(), token.clone());
        }
        Ok(token)
    }
}

fn parse_token_output(stdout: &[u8]) -> Result<AccessToken> {
    let parsed: AzdTokenOutput = serde_json::from_slice(stdout)
        .map_err(|e| LoaderError::Auth(format!("Unexpected azd token output: {}", e)))?;

    if parsed.token.is_empty() {
        return Err(LoaderError::Auth("azd returned an empty token".to_string()));
    }

    let expires_on = parsed
        .expires_on
        .as_deref()
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|dt| dt.with_timezone(&Utc));

    Ok(AccessToken::new(parsed.token, expires_on))
}

/// A fixed bearer token, for emulators and tests.
pub struct StaticTokenCredential {
    token: String,
}

impl StaticTokenCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenCredential for StaticTokenCredential {
    async fn get_token(&self, _scope: &str) -> Result<AccessToken> {
        Ok(AccessToken::new(self.token.clone(), None))
    }
}
