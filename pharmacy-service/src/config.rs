use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ServiceError, ServiceResult};

/// Service configuration, loaded once at startup
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_server")]
    pub server: ServerConfig,

    #[serde(default = "default_storage")]
    pub storage: StorageConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub dev: DevConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("pharmacy.db")
    }
}

/// Which cache sits in front of single-record lookups
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackend {
    #[default]
    None,
    Memory,
    Redis,
}

/// Read-through cache configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub backend: CacheBackend,

    /// Redis connection URL, required when `backend = "redis"`
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Entry lifetime. Unset means entries never expire.
    #[serde(default)]
    pub ttl_secs: Option<u64>,
}

impl CacheConfig {
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_secs.map(Duration::from_secs)
    }
}

/// Advanced search limits
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

/// Development-only switches
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DevConfig {
    /// Mount the sample-data endpoints under /api/test-data
    #[serde(default)]
    pub sample_data_endpoints: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
            cache: CacheConfig::default(),
            search: SearchConfig::default(),
            dev: DevConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from `config.*` (optional) and `PHARMACY__*` env vars
    pub fn load() -> ServiceResult<Self> {
        let config: ServiceConfig = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("PHARMACY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ServiceError::Config {
                message: format!("Failed to build config: {}", e),
            })?
            .try_deserialize()
            .map_err(|e| ServiceError::Config {
                message: format!("Failed to deserialize config: {}", e),
            })?;

        config.check()?;
        Ok(config)
    }

    fn check(&self) -> ServiceResult<()> {
        if self.search.max_page_size == 0 {
            return Err(ServiceError::Config {
                message: "search.max_page_size must be at least 1".to_string(),
            });
        }
        if self.search.default_page_size == 0
            || self.search.default_page_size > self.search.max_page_size
        {
            return Err(ServiceError::Config {
                message: format!(
                    "search.default_page_size must be between 1 and {}",
                    self.search.max_page_size
                ),
            });
        }
        if self.cache.backend == CacheBackend::Redis && self.cache.redis_url.is_none() {
            return Err(ServiceError::Config {
                message: "cache.redis_url is required when cache.backend is \"redis\"".to_string(),
            });
        }
        Ok(())
    }
}

// ==================== Default Value Functions ====================

fn default_server() -> ServerConfig {
    ServerConfig {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_storage() -> StorageConfig {
    StorageConfig {
        data_dir: default_data_dir(),
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_page_size() -> u32 {
    10
}

fn default_max_page_size() -> u32 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_json(json: serde_json::Value) -> ServiceConfig {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = from_json(serde_json::json!({}));
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.cache.backend, CacheBackend::None);
        assert_eq!(config.search.default_page_size, 10);
        assert_eq!(config.search.max_page_size, 100);
        assert!(!config.dev.sample_data_endpoints);
        assert!(config.check().is_ok());
        assert_eq!(
            config.storage.database_path(),
            PathBuf::from("./data/pharmacy.db")
        );
    }

    #[test]
    fn test_redis_backend_requires_url() {
        let config = from_json(serde_json::json!({ "cache": { "backend": "redis" } }));
        assert!(config.check().is_err());

        let config = from_json(serde_json::json!({
            "cache": { "backend": "redis", "redis_url": "redis://localhost:6379", "ttl_secs": 60 }
        }));
        assert!(config.check().is_ok());
        assert_eq!(config.cache.ttl(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_page_size_bounds_checked() {
        let config = from_json(serde_json::json!({
            "search": { "default_page_size": 50, "max_page_size": 20 }
        }));
        assert!(config.check().is_err());
    }
}
