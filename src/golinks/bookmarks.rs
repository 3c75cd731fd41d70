//! # Bookmark Store
//!
//! Bookmarks are stored one per key, `bookmark_<name>`, with the raw URL
//! template as the value. [`Bookmarks`] is a stateless view over a [`Store`].

use crate::commands::CmdResult;
use crate::error::{GolinksError, Result};
use crate::model::Bookmark;
use crate::store::Store;
use tracing::{info, warn};

pub const BOOKMARK_PREFIX: &str = "bookmark_";

/// Seeded into an empty store on first start.
pub const DEFAULT_BOOKMARKS: &[(&str, &str)] = &[
    ("crates", "https://crates.io/search?q=%s"),
    ("docs", "https://docs.rs/%s"),
    ("g", "https://www.google.com/search?q=%s&btnK"),
    ("gh", "https://github.com/search?q=%s&ref=opensearch"),
    ("go", "https://golang.org/search?q=%s"),
    ("wp", "http://en.wikipedia.org/?search=%s"),
    ("yt", "https://www.youtube.com/results?search_query=%s"),
];

pub fn bookmark_key(name: &str) -> Vec<u8> {
    format!("{}{}", BOOKMARK_PREFIX, name).into_bytes()
}

pub struct Bookmarks<'a, S: Store> {
    store: &'a S,
}

impl<'a, S: Store> Bookmarks<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Look up a bookmark by exact name. Absence is `Ok(None)`.
    pub fn get(&self, name: &str) -> Result<Option<Bookmark>> {
        match self.store.get(&bookmark_key(name)) {
            Ok(value) => Ok(Some(Bookmark::new(name, decode_url(value)))),
            Err(GolinksError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Every bookmark, in store order.
    pub fn list(&self) -> Result<Vec<Bookmark>> {
        let mut bookmarks = Vec::new();
        self.store.scan(BOOKMARK_PREFIX.as_bytes(), |key| {
            let value = self.store.get(key)?;
            let name = String::from_utf8_lossy(&key[BOOKMARK_PREFIX.len()..]).into_owned();
            bookmarks.push(Bookmark::new(name, decode_url(value)));
            Ok(())
        })?;
        Ok(bookmarks)
    }

    /// Create or overwrite a bookmark.
    pub fn put(&self, bookmark: &Bookmark) -> Result<()> {
        self.store
            .put(&bookmark_key(&bookmark.name), bookmark.url.as_bytes())
    }

    pub fn remove(&self, name: &str) -> Result<()> {
        self.store.delete(&bookmark_key(name))
    }

    /// Seed [`DEFAULT_BOOKMARKS`] when the store holds nothing at all.
    ///
    /// Returns the number of bookmarks written.
    pub fn ensure_defaults(&self) -> Result<usize> {
        if !self.store.is_empty()? {
            return Ok(0);
        }
        for (name, url) in DEFAULT_BOOKMARKS {
            self.put(&Bookmark::new(*name, *url))?;
        }
        info!(count = DEFAULT_BOOKMARKS.len(), "Seeded default bookmarks");
        Ok(DEFAULT_BOOKMARKS.len())
    }
}

impl Bookmark {
    /// Redirect to this bookmark's expansion of `query`.
    pub fn exec(&self, query: &str) -> CmdResult {
        CmdResult::default().with_redirect(self.expand(query))
    }
}

fn decode_url(value: Vec<u8>) -> String {
    String::from_utf8(value).unwrap_or_else(|e| {
        warn!("bookmark template is not valid UTF-8, replacing invalid bytes");
        String::from_utf8_lossy(e.as_bytes()).into_owned()
    })
}
