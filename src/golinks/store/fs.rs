use super::codec::{self, Decoded, Frame};
use super::{key_lossy, Store};
use crate::error::{GolinksError, Result};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, info, warn};

const LOG_FILENAME: &str = "golinks.log";
const COMPACT_FILENAME: &str = "golinks.log.compact";

/// Report from the `compact` operation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CompactReport {
    pub live_records: usize,
    pub bytes_before: u64,
    pub bytes_after: u64,
}

struct Inner {
    file: File,
    index: BTreeMap<Vec<u8>, Vec<u8>>,
    log_len: u64,
    stale_records: usize,
}

/// Production store: an append-only log of put/delete frames.
///
/// The whole log is replayed into an ordered in-memory index on open, so
/// reads never touch the disk. Every mutation is appended and synced before
/// it is applied to the index.
pub struct FileStore {
    root: PathBuf,
    inner: RwLock<Option<Inner>>,
    simulate_write_error: AtomicBool,
}

impl FileStore {
    /// Open (or create) the store kept in `root`.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        ensure_dir(&root)?;

        let log_path = root.join(LOG_FILENAME);
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&log_path)?;

        let mut buf = Vec::new();
        file.read_to_end(&mut buf)?;
        let (index, valid_len, stale_records) = replay(&buf)?;

        if (valid_len as usize) < buf.len() {
            warn!(
                path = %log_path.display(),
                offset = valid_len,
                dropped_bytes = buf.len() as u64 - valid_len,
                "Truncating incomplete tail of store log"
            );
            file.set_len(valid_len)?;
            file.sync_all()?;
        }

        debug!(
            path = %log_path.display(),
            keys = index.len(),
            bytes = valid_len,
            "Opened store"
        );

        Ok(Self {
            root,
            inner: RwLock::new(Some(Inner {
                file,
                index,
                log_len: valid_len,
                stale_records,
            })),
            simulate_write_error: AtomicBool::new(false),
        })
    }

    /// Make every append write half a frame and then fail, as a full disk would.
    #[cfg(any(test, feature = "test_utils"))]
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.store(simulate, Ordering::SeqCst);
    }

    pub fn log_path(&self) -> PathBuf {
        self.root.join(LOG_FILENAME)
    }

    /// Number of log records superseded by later puts or deletes.
    pub fn stale_records(&self) -> Result<usize> {
        let guard = self.inner.read();
        Ok(guard.as_ref().ok_or(GolinksError::Closed)?.stale_records)
    }

    /// Rewrite the log so it holds exactly one put frame per live key.
    pub fn compact(&self) -> Result<CompactReport> {
        let mut guard = self.inner.write();
        let inner = guard.as_mut().ok_or(GolinksError::Closed)?;

        let tmp_path = self.root.join(COMPACT_FILENAME);
        let log_path = self.log_path();
        let mut written: u64 = 0;
        {
            let mut tmp = File::create(&tmp_path)?;
            for (key, value) in &inner.index {
                let frame = codec::encode_put(key, value)?;
                tmp.write_all(&frame)?;
                written += frame.len() as u64;
            }
            tmp.sync_all()?;
        }
        fs::rename(&tmp_path, &log_path)?;
        sync_dir(&self.root)?;

        let report = CompactReport {
            live_records: inner.index.len(),
            bytes_before: inner.log_len,
            bytes_after: written,
        };

        inner.file = OpenOptions::new().read(true).append(true).open(&log_path)?;
        inner.log_len = written;
        inner.stale_records = 0;

        info!(
            live = report.live_records,
            before = report.bytes_before,
            after = report.bytes_after,
            "Compacted store log"
        );
        Ok(report)
    }

    /// Append and sync one frame. On failure the log is cut back to its last
    /// good length; if even that fails the store is closed.
    fn append(&self, slot: &mut Option<Inner>, frame: &[u8]) -> Result<()> {
        let inner = slot.as_mut().ok_or(GolinksError::Closed)?;

        let written = self
            .write_frame(&mut inner.file, frame)
            .and_then(|()| inner.file.sync_data());
        let Err(e) = written else {
            inner.log_len += frame.len() as u64;
            return Ok(());
        };

        match inner.file.set_len(inner.log_len) {
            Ok(()) => warn!(error = %e, offset = inner.log_len, "Rolled back failed append"),
            Err(truncate_err) => {
                error!(
                    error = %e,
                    truncate_error = %truncate_err,
                    "Could not roll back failed append, closing store"
                );
                *slot = None;
            }
        }
        Err(e.into())
    }

    fn write_frame(&self, file: &mut File, frame: &[u8]) -> std::io::Result<()> {
        if self.simulate_write_error.load(Ordering::SeqCst) {
            file.write_all(&frame[..frame.len() / 2])?;
            return Err(std::io::Error::other("simulated write error"));
        }
        file.write_all(frame)
    }
}

impl Store for FileStore {
    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let frame = codec::encode_put(key, value)?;
        let mut guard = self.inner.write();
        self.append(&mut guard, &frame)?;

        let inner = guard.as_mut().ok_or(GolinksError::Closed)?;
        if inner.index.insert(key.to_vec(), value.to_vec()).is_some() {
            inner.stale_records += 1;
        }
        Ok(())
    }

    fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        let guard = self.inner.read();
        let inner = guard.as_ref().ok_or(GolinksError::Closed)?;
        inner
            .index
            .get(key)
            .cloned()
            .ok_or_else(|| GolinksError::NotFound(key_lossy(key)))
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        let frame = codec::encode_delete(key)?;
        let mut guard = self.inner.write();
        let inner = guard.as_mut().ok_or(GolinksError::Closed)?;
        if !inner.index.contains_key(key) {
            return Err(GolinksError::NotFound(key_lossy(key)));
        }

        self.append(&mut guard, &frame)?;
        let inner = guard.as_mut().ok_or(GolinksError::Closed)?;
        inner.index.remove(key);
        // The old put and the tombstone itself are both dead weight now.
        inner.stale_records += 2;
        Ok(())
    }

    fn scan<F>(&self, prefix: &[u8], mut visit: F) -> Result<()>
    where
        F: FnMut(&[u8]) -> Result<()>,
    {
        let keys: Vec<Vec<u8>> = {
            let guard = self.inner.read();
            let inner = guard.as_ref().ok_or(GolinksError::Closed)?;
            inner
                .index
                .range(prefix.to_vec()..)
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
        let guard = self.inner.read();
        Ok(guard.as_ref().ok_or(GolinksError::Closed)?.index.len())
    }

    fn close(&self) -> Result<()> {
        let inner = self.inner.write().take().ok_or(GolinksError::Closed)?;
        inner.file.sync_all()?;
        debug!(path = %self.log_path().display(), "Closed store");
        Ok(())
    }
}

/// Replay `buf` into an index.
///
/// Returns the index, the length of the valid prefix of the log and the
/// number of superseded records. A damaged final frame ends the replay;
/// damage followed by further frames is an error.
fn replay(buf: &[u8]) -> Result<(BTreeMap<Vec<u8>, Vec<u8>>, u64, usize)> {
    let mut index = BTreeMap::new();
    let mut stale = 0;
    let mut pos = 0usize;

    while pos < buf.len() {
        let rest = &buf[pos..];
        match codec::decode(rest, pos as u64) {
            Ok(Decoded::Frame(frame, used)) => {
                match frame {
                    Frame::Put { key, value } => {
                        if index.insert(key, value).is_some() {
                            stale += 1;
                        }
                    }
                    Frame::Delete { key } => {
                        if index.remove(&key).is_some() {
                            stale += 1;
                        }
                        stale += 1;
                    }
                }
                pos += used;
            }
            Ok(Decoded::Incomplete) => break,
            Err(e) => {
                let reaches_end = codec::declared_len(rest).map_or(true, |n| n >= rest.len());
                if reaches_end {
                    warn!(offset = pos, error = %e, "Discarding damaged final frame");
                    break;
                }
                return Err(e);
            }
        }
    }

    Ok((index, pos as u64, stale))
}

/// Persist a rename inside `dir`.
fn sync_dir(dir: &Path) -> Result<()> {
    File::open(dir)?.sync_all()?;
    Ok(())
}

fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
