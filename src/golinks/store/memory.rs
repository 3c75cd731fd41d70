use super::{key_lossy, Store};
use crate::error::{GolinksError, Result};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// In-memory store for testing.
///
/// Ordered like [`super::fs::FileStore`], so scans behave the same on both.
pub struct MemoryStore {
    data: RwLock<Option<BTreeMap<Vec<u8>, Vec<u8>>>>,
    simulate_write_error: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(Some(BTreeMap::new())),
            simulate_write_error: AtomicBool::new(false),
        }
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.store(simulate, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<()> {
        if self.simulate_write_error.load(Ordering::SeqCst) {
            return Err(GolinksError::Io(std::io::Error::other(
                "simulated write error",
            )));
        }
        Ok(())
    }
}

impl Store for MemoryStore {
    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.check_writable()?;
        let mut guard = self.data.write();
        let data = guard.as_mut().ok_or(GolinksError::Closed)?;
        data.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        let guard = self.data.read();
        let data = guard.as_ref().ok_or(GolinksError::Closed)?;
        data.get(key)
            .cloned()
            .ok_or_else(|| GolinksError::NotFound(key_lossy(key)))
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        self.check_writable()?;
        let mut guard = self.data.write();
        let data = guard.as_mut().ok_or(GolinksError::Closed)?;
        data.remove(key)
            .map(|_| ())
            .ok_or_else(|| GolinksError::NotFound(key_lossy(key)))
    }

    fn scan<F>(&self, prefix: &[u8], mut visit: F) -> Result<()>
    where
        F: FnMut(&[u8]) -> Result<()>,
    {
        let keys: Vec<Vec<u8>> = {
            let guard = self.data.read();
            let data = guard.as_ref().ok_or(GolinksError::Closed)?;
            data.range(prefix.to_vec()..)
                .take_while(|(k, _)| k.starts_with(prefix))
                .map(|(k, _)| k.clone())
                .collect()
        };
        for key in &keys {
            visit(key)?;
        }
        Ok(())
    }

    fn len(&self) -> Result<usize> {
        let guard = self.data.read();
        Ok(guard.as_ref().ok_or(GolinksError::Closed)?.len())
    }

    fn close(&self) -> Result<()> {
        self.data.write().take().ok_or(GolinksError::Closed)?;
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::bookmarks::Bookmarks;
    use crate::model::Bookmark;

    pub struct StoreFixture {
        pub store: MemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: MemoryStore::new(),
            }
        }

        pub fn with_bookmark(self, name: &str, url: &str) -> Self {
            Bookmarks::new(&self.store)
                .put(&Bookmark::new(name, url))
                .unwrap();
            self
        }

        pub fn with_raw(self, key: &str, value: &[u8]) -> Self {
            self.store.put(key.as_bytes(), value).unwrap();
            self
        }
    }
}
