//! # History Log
//!
//! Every successfully dispatched command or bookmark is appended as a
//! [`HistoryEntry`] under `history_<timestamp>`, JSON encoded.
//!
//! ## Key Ordering
//!
//! Listing relies on the store's ascending key order. The timestamp is
//! written as a 20 digit, zero padded decimal so byte order and numeric
//! order agree for every non-negative `i64`. Keys written unpadded (19 digits
//! for present-day timestamps) still decode and still order correctly among
//! themselves, but the two widths must not be mixed in one store.
//!
//! ## Timestamps
//!
//! Timestamps come from a [`HistoryClock`] that never hands out the same
//! value twice and never goes backwards, even when the wall clock does.

use crate::error::{GolinksError, Result};
use crate::model::HistoryEntry;
use crate::store::Store;
use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::warn;

pub const HISTORY_PREFIX: &str = "history_";

pub fn history_key(timestamp: i64) -> Vec<u8> {
    format!("{}{:020}", HISTORY_PREFIX, timestamp).into_bytes()
}

/// Parse the timestamp back out of a history key. Negative values are not
/// valid timestamps.
pub fn parse_history_key(key: &[u8]) -> Option<i64> {
    let digits = key.strip_prefix(HISTORY_PREFIX.as_bytes())?;
    std::str::from_utf8(digits)
        .ok()?
        .parse()
        .ok()
        .filter(|ts: &i64| *ts >= 0)
}

/// Strictly increasing, non-negative nanosecond timestamps.
#[derive(Debug, Default)]
pub struct HistoryClock {
    last: AtomicI64,
}

impl HistoryClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clock that will only hand out values greater than `last` (and
    /// greater than zero).
    pub fn starting_after(last: i64) -> Self {
        Self {
            last: AtomicI64::new(last.max(0)),
        }
    }

    /// Seed from the newest history key already in `store`.
    pub fn resume<S: Store>(store: &S) -> Result<Self> {
        let mut last = 0;
        store.scan(HISTORY_PREFIX.as_bytes(), |key| {
            if let Some(ts) = parse_history_key(key) {
                last = last.max(ts);
            }
            Ok(())
        })?;
        Ok(Self::starting_after(last))
    }

    /// Fails rather than repeat a value once `i64::MAX` has been handed out.
    pub fn next(&self) -> Result<i64> {
        let now = Utc::now()
            .timestamp_nanos_opt()
            .ok_or_else(|| GolinksError::Clock("system time out of range".to_string()))?;
        self.next_after(now)
            .ok_or_else(|| GolinksError::Clock("timestamps exhausted".to_string()))
    }

    fn next_after(&self, now: i64) -> Option<i64> {
        let mut prev = self.last.load(Ordering::SeqCst);
        loop {
            let candidate = now.max(prev.checked_add(1)?);
            match self
                .last
                .compare_exchange(prev, candidate, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return Some(candidate),
                Err(actual) => prev = actual,
            }
        }
    }
}

pub struct History<'a, S: Store> {
    store: &'a S,
    clock: &'a HistoryClock,
}

impl<'a, S: Store> History<'a, S> {
    pub fn new(store: &'a S, clock: &'a HistoryClock) -> Self {
        Self { store, clock }
    }

    /// Record one invocation and return the stored entry.
    pub fn append(&self, command: &str, value: &str) -> Result<HistoryEntry> {
        let entry = HistoryEntry {
            timestamp: self.clock.next()?,
            command: command.to_string(),
            value: value.to_string(),
        };
        let bytes = serde_json::to_vec(&entry)?;
        self.store.put(&history_key(entry.timestamp), &bytes)?;
        Ok(entry)
    }

    /// All entries, newest first.
    ///
    /// Records that cannot be read or decoded are logged and skipped.
    pub fn list(&self) -> Result<Vec<HistoryEntry>> {
        let mut entries = Vec::new();
        self.store.scan(HISTORY_PREFIX.as_bytes(), |key| {
            match self.read_entry(key) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!(
                    key = %String::from_utf8_lossy(key),
                    error = %e,
                    "Skipping unreadable history entry"
                ),
            }
            Ok(())
        })?;
        entries.reverse();
        Ok(entries)
    }

    fn read_entry(&self, key: &[u8]) -> Result<HistoryEntry> {
        let value = self.store.get(key)?;
        Ok(serde_json::from_slice(&value)?)
    }
}
