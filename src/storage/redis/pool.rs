//! Redis connection management
//!
//! The connection is opened on first use so building the cache layers never
//! blocks on the network.

use crate::utils::error::{CacheError, Result};
use redis::{Client, aio::MultiplexedConnection};
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Redis-backed remote store
#[derive(Debug)]
pub struct RedisStore {
    client: Client,
    connection: OnceCell<MultiplexedConnection>,
    /// URL with the password redacted, for logging
    display_url: String,
}

impl RedisStore {
    /// Create a store for `url`; fails only when the URL is malformed
    pub fn new(url: &str) -> Result<Self> {
        let display_url = Self::sanitize_url(url);
        let client = Client::open(url).map_err(|e| {
            CacheError::Config(format!("Invalid Redis URL {}: {}", display_url, e))
        })?;

        info!("Configured Redis store at {}", display_url);
        Ok(Self {
            client,
            connection: OnceCell::new(),
            display_url,
        })
    }

    /// Get a handle on the shared multiplexed connection, connecting on first use
    pub(crate) async fn get_connection(&self) -> Result<MultiplexedConnection> {
        let conn = self
            .connection
            .get_or_try_init(|| async {
                debug!("Connecting to Redis at {}", self.display_url);
                self.client.get_multiplexed_async_connection().await
            })
            .await?;
        Ok(conn.clone())
    }

    pub fn display_url(&self) -> &str {
        &self.display_url
    }

    /// Sanitize Redis URL for logging (hide password)
    pub(crate) fn sanitize_url(url: &str) -> String {
        if let Ok(parsed) = url::Url::parse(url) {
            let mut sanitized = parsed.clone();
            if sanitized.password().is_some() {
                let _ = sanitized.set_password(Some("***"));
            }
            sanitized.to_string()
        } else {
            "invalid_url".to_string()
        }
    }
}
