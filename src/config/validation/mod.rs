//! Configuration validation
//!
//! Validation runs once, when a [`Config`](crate::config::Config) is loaded;
//! the cache layers assume the values they receive were checked here.

mod cache_validators;

/// Checks a configuration section, returning a human-readable reason on failure
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}
