//! Configuration management for the cache engine
//!
//! This module handles loading, validation, and management of cache configuration.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{CacheError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Prefix shared by every environment override
pub const ENV_PREFIX: &str = "RAGCACHE_";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Cache layers, backends and batching
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CacheError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| CacheError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from environment variables (and a `.env` file, if present)
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");
        let _ = dotenvy::dotenv();

        let mut config = Self::default();
        config.apply_env_overrides(|key| std::env::var(key).ok())?;

        config.validate()?;
        Ok(config)
    }

    /// Overlay `RAGCACHE_*` values returned by `lookup` onto this configuration
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));
        let cache = &mut self.cache;

        if let Some(v) = var("BACKEND") {
            cache.cache_backend = parse_env("BACKEND", &v)?;
        }
        if let Some(url) = var("REMOTE_URL").or_else(|| lookup("REDIS_URL")) {
            cache.remote_url = Some(url);
        }
        if let Some(v) = var("KEY_STRATEGY") {
            cache.cache_key_strategy = parse_env("KEY_STRATEGY", &v)?;
        }
        if let Some(v) = var("SEMANTIC_THRESHOLD") {
            cache.semantic_cache_threshold = parse_env("SEMANTIC_THRESHOLD", &v)?;
        }
        if let Some(v) = var("QUERY_CACHE_ENABLED") {
            cache.query_cache_enabled = parse_env("QUERY_CACHE_ENABLED", &v)?;
        }
        if let Some(v) = var("QUERY_CACHE_TTL") {
            cache.query_cache_ttl = Some(parse_env("QUERY_CACHE_TTL", &v)?);
        }
        if let Some(v) = var("EMBEDDING_CACHE_ENABLED") {
            cache.embedding_cache_enabled = parse_env("EMBEDDING_CACHE_ENABLED", &v)?;
        }
        if let Some(v) = var("EMBEDDING_CACHE_TTL") {
            cache.embedding_cache_ttl = Some(parse_env("EMBEDDING_CACHE_TTL", &v)?);
        }
        if let Some(v) = var("RESULT_CACHE_ENABLED") {
            cache.result_cache_enabled = parse_env("RESULT_CACHE_ENABLED", &v)?;
        }
        if let Some(v) = var("RESULT_CACHE_TTL") {
            cache.result_cache_ttl = Some(parse_env("RESULT_CACHE_TTL", &v)?);
        }
        if let Some(v) = var("COMPRESS") {
            cache.compress_cache = parse_env("COMPRESS", &v)?;
        }
        if let Some(v) = var("COMPRESSION_ALGORITHM") {
            cache.compression_algorithm = parse_env("COMPRESSION_ALGORITHM", &v)?;
        }
        if let Some(v) = var("BATCH_SIZE") {
            cache.batch_size = parse_env("BATCH_SIZE", &v)?;
        }
        if let Some(v) = var("BATCH_TIMEOUT_MS") {
            cache.batch_timeout_ms = parse_env("BATCH_TIMEOUT_MS", &v)?;
        }
        if let Some(v) = var("LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = var("LOG_JSON") {
            self.logging.json = parse_env("LOG_JSON", &v)?;
        }

        Ok(())
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.cache
            .validate()
            .map_err(|e| CacheError::Config(format!("Cache config error: {}", e)))?;

        self.logging
            .validate()
            .map_err(|e| CacheError::Config(format!("Logging config error: {}", e)))?;

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| CacheError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}

fn parse_env<T>(name: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| {
        CacheError::Config(format!("Invalid {}{}: {}", ENV_PREFIX, name, e))
    })
}
