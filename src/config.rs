// file: src/config.rs
// description: application configuration management with toml, env and cli layers
// reference: https://docs.rs/config

use crate::error::{LoaderError, Result};
use crate::utils::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "csvloader.toml";
pub const DEFAULT_CSV_DIR: &str = "./csvloader";
pub const DEFAULT_FILE_PATTERN: &str = "*.csv";
pub const DEFAULT_PROCESS_TIMEOUT_SECS: u64 = 60;
/// Bound on the `azd` token process when no tenant is pinned.
pub const UNTENANTED_PROCESS_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub search: SearchConfig,
    pub auth: AuthConfig,
    pub loader: LoaderConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    pub account: String,
    pub container: String,
    /// Overrides `https://{account}.blob.core.windows.net`, e.g. for Azurite.
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    pub service: String,
    pub index: String,
    /// Overrides `https://{service}.search.windows.net`.
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    pub tenant_id: Option<String>,
    /// Upper bound on the `azd` token process when a tenant is set. Without
    /// a tenant the bound is `UNTENANTED_PROCESS_TIMEOUT_SECS`.
    pub process_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub csv_dir: PathBuf,
    pub pattern: String,
}

/// Values supplied on the command line. `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub storage_account: Option<String>,
    pub container: Option<String>,
    pub tenant_id: Option<String>,
    pub search_service: Option<String>,
    pub index: Option<String>,
    pub csv_dir: Option<PathBuf>,
    pub pattern: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            tenant_id: None,
            process_timeout_secs: DEFAULT_PROCESS_TIMEOUT_SECS,
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            csv_dir: PathBuf::from(DEFAULT_CSV_DIR),
            pattern: DEFAULT_FILE_PATTERN.to_string(),
        }
    }
}

impl StorageConfig {
    pub fn endpoint(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://{}.blob.core.windows.net", self.account),
        }
    }
}

impl SearchConfig {
    pub fn endpoint(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://{}.search.windows.net", self.service),
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder
                .add_source(config::File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("CSVLOADER")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| LoaderError::Config(e.to_string()))?;

        settings
            .try_deserialize()
            .map_err(|e| LoaderError::Config(e.to_string()))
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(account) = overrides.storage_account {
            self.storage.account = account;
        }
        if let Some(container) = overrides.container {
            self.storage.container = container;
        }
        if let Some(tenant_id) = overrides.tenant_id {
            self.auth.tenant_id = Some(tenant_id);
        }
        if let Some(service) = overrides.search_service {
            self.search.service = service;
        }
        if let Some(index) = overrides.index {
            self.search.index = index;
        }
        if let Some(csv_dir) = overrides.csv_dir {
            self.loader.csv_dir = csv_dir;
        }
        if let Some(pattern) = overrides.pattern {
            self.loader.pattern = pattern;
        }
    }

    pub fn validate(&self) -> Result<()> {
        Validator::validate_not_empty("storage account", &self.storage.account)?;
        Validator::validate_not_empty("search service", &self.search.service)?;
        Validator::validate_container_name(&self.storage.container)?;
        Validator::validate_index_name(&self.search.index)?;

        if let Some(endpoint) = &self.storage.endpoint {
            Validator::validate_url(endpoint)?;
        }
        if let Some(endpoint) = &self.search.endpoint {
            Validator::validate_url(endpoint)?;
        }

        if self.loader.pattern.trim().is_empty() {
            return Err(LoaderError::Config(
                "file pattern must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::{Mutex, MutexGuard};
    use tempfile::TempDir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    // Config::load reads the process environment, which tests share.
    fn env_lock() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.apply_overrides(ConfigOverrides {
            storage_account: Some("mystorage".to_string()),
            container: Some("csv-files".to_string()),
            search_service: Some("mysearch".to_string()),
            index: Some("csv-index".to_string()),
            ..Default::default()
        });
        config
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.loader.csv_dir, PathBuf::from(DEFAULT_CSV_DIR));
        assert_eq!(config.loader.pattern, "*.csv");
        assert_eq!(config.auth.process_timeout_secs, 60);
        assert!(config.auth.tenant_id.is_none());
    }

    #[test]
    fn test_default_endpoints() {
        let config = valid_config();
        assert_eq!(
            config.storage.endpoint(),
            "https://mystorage.blob.core.windows.net"
        );
        assert_eq!(config.search.endpoint(), "https://mysearch.search.windows.net");
    }

    #[test]
    fn test_endpoint_override_trims_slash() {
        let mut config = valid_config();
        config.search.endpoint = Some("http://127.0.0.1:8080/".to_string());
        assert_eq!(config.search.endpoint(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_overrides_leave_unset_values() {
        let mut config = valid_config();
        config.apply_overrides(ConfigOverrides {
            index: Some("other-index".to_string()),
            ..Default::default()
        });
        assert_eq!(config.search.index, "other-index");
        assert_eq!(config.storage.container, "csv-files");
    }

    #[test]
    fn test_validate() {
        assert!(valid_config().validate().is_ok());

        let mut missing = valid_config();
        missing.storage.account.clear();
        assert!(missing.validate().is_err());

        let mut bad_container = valid_config();
        bad_container.storage.container = "Bad_Container".to_string();
        assert!(bad_container.validate().is_err());

        let mut bad_endpoint = valid_config();
        bad_endpoint.storage.endpoint = Some("localhost:10000".to_string());
        assert!(bad_endpoint.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let _env = env_lock();
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("loader.toml");
        fs::write(
            &path,
            r#"
[storage]
account = "filestorage"
container = "from-file"

[search]
service = "filesearch"
index = "file-index"

[auth]
process_timeout_secs = 30
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.storage.account, "filestorage");
        assert_eq!(config.search.index, "file-index");
        assert_eq!(config.auth.process_timeout_secs, 30);
        assert_eq!(config.loader.pattern, "*.csv");
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let _env = env_lock();
        let result = Config::load(Some(Path::new("/nonexistent/loader.toml")));
        assert!(matches!(result, Err(LoaderError::Config(_))));
    }

    #[test]
    fn test_env_layer_sits_between_file_and_cli() {
        let _env = env_lock();
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("loader.toml");
        fs::write(
            &path,
            "[search]\nservice = \"filesearch\"\nindex = \"file-index\"\n",
        )
        .unwrap();

        unsafe { std::env::set_var("CSVLOADER__SEARCH__INDEX", "env-index") };
        let loaded = Config::load(Some(&path));
        unsafe { std::env::remove_var("CSVLOADER__SEARCH__INDEX") };

        let mut config = loaded.unwrap();
        assert_eq!(config.search.index, "env-index");
        assert_eq!(config.search.service, "filesearch");

        config.apply_overrides(ConfigOverrides {
            index: Some("cli-index".to_string()),
            ..Default::default()
        });
        assert_eq!(config.search.index, "cli-index");
        assert_eq!(config.search.service, "filesearch");
    }
}
