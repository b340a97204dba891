//! Remote key-value tier
//!
//! - `store` - the client contract the remote tier talks to
//! - `compression` - tagged payload framing (raw, gzip, lz4, zstd)
//! - `backend` - serialized, optionally compressed cache backend over a store

mod backend;
mod compression;
mod store;

pub use backend::RemoteBackend;
pub use compression::{compress, decompress};
pub use store::RemoteStore;
