//! # API Facade
//!
//! [`Golinks`] is the single entry point for every golinks operation,
//! whatever the front end (the bundled CLI, an HTTP server, tests).
//!
//! It owns the three long-lived pieces of state:
//! - the store handle,
//! - the immutable command [`Registry`],
//! - the [`GolinksConfig`],
//!
//! and hands borrowed views of them to the bookmark store, the history log
//! and the dispatcher for each call. Nothing is kept in globals.
//!
//! Like the rest of the core, the facade never prints. It returns data
//! structures and leaves formatting to the caller.

use crate::bookmarks::Bookmarks;
use crate::commands::CmdResult;
use crate::config::GolinksConfig;
use crate::dispatch::{Action, Dispatched, Dispatcher, Request};
use crate::error::Result;
use crate::history::{History, HistoryClock};
use crate::model::{Bookmark, CommandInfo, HistoryEntry};
use crate::registry::Registry;
use crate::store::Store;

/// Generic over `Store` so tests can run against `MemoryStore`.
pub struct Golinks<S: Store> {
    store: S,
    registry: Registry,
    config: GolinksConfig,
    clock: HistoryClock,
}

impl<S: Store> Golinks<S> {
    /// Wire up the core. The history clock resumes after the newest entry
    /// already in `store`.
    pub fn new(store: S, registry: Registry, config: GolinksConfig) -> Result<Self> {
        let clock = HistoryClock::resume(&store)?;
        Ok(Self {
            store,
            registry,
            config,
            clock,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn dispatcher(&self) -> Dispatcher<'_, S> {
        Dispatcher::new(&self.store, &self.registry, &self.clock, &self.config.url)
    }

    fn bookmarks(&self) -> Bookmarks<'_, S> {
        Bookmarks::new(&self.store)
    }

    fn history(&self) -> History<'_, S> {
        History::new(&self.store, &self.clock)
    }

    pub fn resolve(&self, token: &str, args: &[String]) -> Result<Action> {
        self.dispatcher().resolve(token, args)
    }

    /// Resolve and execute, recording history on success.
    pub fn run(&self, request: &Request) -> Result<Dispatched> {
        self.dispatcher().dispatch(request)
    }

    pub fn list_bookmarks(&self) -> Result<Vec<Bookmark>> {
        self.bookmarks().list()
    }

    pub fn list_commands(&self) -> Vec<CommandInfo> {
        self.registry.infos()
    }

    pub fn list_history(&self) -> Result<Vec<HistoryEntry>> {
        self.history().list()
    }

    pub fn record_history(&self, command: &str, value: &str) -> Result<HistoryEntry> {
        self.history().append(command, value)
    }

    /// Bookmarks and commands together, as the `list` page shows them.
    pub fn list_all(&self) -> Result<CmdResult> {
        Ok(CmdResult::default()
            .with_listed_bookmarks(self.list_bookmarks()?)
            .with_listed_commands(self.list_commands()))
    }

    pub fn add_bookmark(&self, name: &str, url: &str) -> Result<Bookmark> {
        let bookmark = Bookmark::new(name, url);
        self.bookmarks().put(&bookmark)?;
        Ok(bookmark)
    }

    pub fn remove_bookmark(&self, name: &str) -> Result<()> {
        self.bookmarks().remove(name)
    }

    /// Seed default bookmarks into an empty store if the config allows it.
    pub fn ensure_default_bookmarks(&self) -> Result<usize> {
        if !self.config.seed_bookmarks {
            return Ok(0);
        }
        self.bookmarks().ensure_defaults()
    }

    pub fn close(&self) -> Result<()> {
        self.store.close()
    }
}
