//! Utility modules for the cache engine
//!
//! - **error**: Error type shared by every component
//! - **logging**: Tracing subscriber bootstrap

pub mod error;
pub mod logging;
