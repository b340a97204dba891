//! Cache and logging configuration validators

use super::Validate;
use crate::config::models::*;

impl Validate for CacheConfig {
    fn validate(&self) -> Result<(), String> {
        if !(self.semantic_cache_threshold > 0.0 && self.semantic_cache_threshold <= 1.0) {
            return Err("Semantic cache similarity threshold must be between 0 and 1".to_string());
        }

        if self.semantic_max_entries == Some(0) {
            return Err("Semantic matcher capacity must be greater than 0".to_string());
        }

        if self.batch_size == 0 {
            return Err("Batch size must be greater than 0".to_string());
        }

        if self.batch_timeout_ms == 0 {
            return Err("Batch timeout must be greater than 0".to_string());
        }

        if self.queue_max_size == 0 {
            return Err("Batch queue size must be greater than 0".to_string());
        }

        if self.avg_item_size_bytes == 0 {
            return Err("Average item size must be greater than 0".to_string());
        }

        match self.cache_backend {
            BackendKind::Memory => {}
            BackendKind::Remote | BackendKind::Hybrid => match self.remote_url.as_deref() {
                None | Some("") => {
                    return Err(format!(
                        "The {} cache backend requires remote_url",
                        self.cache_backend
                    ));
                }
                Some(url) => {
                    url::Url::parse(url).map_err(|e| format!("Invalid remote_url: {}", e))?;
                }
            },
        }

        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        if !LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(format!("Unknown log level: {}", self.level));
        }
        Ok(())
    }
}
