//! Helper functions for creating specific error types

use super::types::CacheError;

impl CacheError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn remote<S: Into<String>>(message: S) -> Self {
        Self::Remote(message.into())
    }

    pub fn compression<S: Into<String>>(message: S) -> Self {
        Self::Compression(message.into())
    }

    pub fn batch<S: Into<String>>(message: S) -> Self {
        Self::Batch(message.into())
    }

    pub fn embedding<S: Into<String>>(message: S) -> Self {
        Self::Embedding(message.into())
    }

    pub fn retrieval<S: Into<String>>(message: S) -> Self {
        Self::Retrieval(message.into())
    }

    pub fn compute<S: Into<String>>(message: S) -> Self {
        Self::Compute(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Whether a caller may reasonably retry the failed operation.
    ///
    /// Retrying is never done inside the engine itself.
    pub fn is_transient(&self) -> bool {
        match self {
            #[cfg(feature = "redis")]
            Self::Redis(e) => {
                e.is_io_error() || e.is_timeout() || e.is_connection_dropped()
            }
            Self::Remote(_) | Self::BatchCancelled => true,
            _ => false,
        }
    }
}
