//! Redis storage implementation
//!
//! ## Module Structure
//!
//! - `pool` - Lazily established multiplexed connection and URL handling
//! - `cache` - [`RemoteStore`](super::remote::RemoteStore) operations (get, set, delete, flush, ping)
//! - `tests` - Module tests

mod cache;
mod pool;

pub use pool::RedisStore;
