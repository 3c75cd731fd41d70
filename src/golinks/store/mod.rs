//! # Storage Layer
//!
//! Everything golinks persists lives in a single ordered key/value store. The
//! [`Store`] trait is the only thing the rest of the crate knows about it.
//!
//! ## Key Layout
//!
//! Keys are namespaced by a string prefix:
//!
//! ```text
//! bookmark_<name>          -> raw URL template bytes
//! history_<timestamp>      -> JSON encoded HistoryEntry
//! ```
//!
//! Bookmarks and history are read back with [`Store::scan`], so a namespace
//! never sees the other's records.
//!
//! ## Concurrency
//!
//! All methods take `&self`. Implementations lock internally and must be
//! `Send + Sync`, so one handle can be shared by any number of request
//! handlers. Callers add no locking of their own.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: Production store. An append-only, CRC framed log
//!   replayed into an ordered in-memory index on open.
//! - [`memory::MemoryStore`]: In-memory store for testing.

use crate::error::Result;

pub mod codec;
pub mod fs;
pub mod memory;

/// Abstract interface for the persistent key/value store.
pub trait Store: Send + Sync {
    /// Write `value` under `key`, overwriting any previous value.
    /// The write is durable once this returns.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Read the value under `key`. Missing keys are `GolinksError::NotFound`.
    fn get(&self, key: &[u8]) -> Result<Vec<u8>>;

    /// Remove `key`. Missing keys are `GolinksError::NotFound`.
    fn delete(&self, key: &[u8]) -> Result<()>;

    /// Visit every key starting with `prefix`, in ascending byte order.
    ///
    /// Stops at the first error returned by `visit` and propagates it.
    /// `visit` runs without any store lock held and may call back into the store.
    fn scan<F>(&self, prefix: &[u8], visit: F) -> Result<()>
    where
        F: FnMut(&[u8]) -> Result<()>;

    /// Number of live keys.
    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Release resources. Every later call, including `close`, fails with
    /// `GolinksError::Closed`.
    fn close(&self) -> Result<()>;
}

pub(crate) fn key_lossy(key: &[u8]) -> String {
    String::from_utf8_lossy(key).into_owned()
}
