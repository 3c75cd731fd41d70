//! # Built-in Commands
//!
//! Commands are a closed set compiled into the binary. Each variant of
//! [`Command`] has its logic in its own module, exposing a
//! `run(ctx, args) -> Result<CmdResult>` function. Commands never print;
//! they describe what should happen (a redirect, listings, messages) in a
//! [`CmdResult`] and leave presentation to the caller.

use crate::error::Result;
use crate::history::HistoryClock;
use crate::model::{Bookmark, CommandInfo, HistoryEntry};
use crate::registry::Registry;
use crate::store::Store;

pub mod bookmark;
pub mod help;
pub mod history;
pub mod list;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Command {
    Bookmark,
    Help,
    History,
    List,
}

impl Command {
    pub const ALL: [Command; 4] = [
        Command::Bookmark,
        Command::Help,
        Command::History,
        Command::List,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Command::Bookmark => "bookmark",
            Command::Help => "help",
            Command::History => "history",
            Command::List => "list",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Command::Bookmark => "Manage bookmarks: bookmark add <name> <url> | remove <name> | list",
            Command::Help => "Show the available commands",
            Command::History => "Show recently used commands and bookmarks",
            Command::List => "List all bookmarks and commands",
        }
    }

    pub fn info(&self) -> CommandInfo {
        CommandInfo {
            name: self.name().to_string(),
            description: self.description().to_string(),
        }
    }

    /// Run the command. Failures are returned as plain errors; the
    /// dispatcher tags them with the command name.
    pub fn exec<S: Store>(&self, ctx: &ExecContext<'_, S>, args: &[String]) -> Result<CmdResult> {
        match self {
            Command::Bookmark => bookmark::run(ctx, args),
            Command::Help => help::run(ctx),
            Command::History => history::run(ctx),
            Command::List => list::run(ctx),
        }
    }
}

/// Everything a command may touch while it runs.
pub struct ExecContext<'a, S: Store> {
    pub store: &'a S,
    pub registry: &'a Registry,
    pub clock: &'a HistoryClock,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }
}

/// What a command or bookmark produced.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CmdResult {
    pub redirect: Option<String>,
    pub listed_bookmarks: Vec<Bookmark>,
    pub listed_commands: Vec<CommandInfo>,
    pub listed_history: Vec<HistoryEntry>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_redirect(mut self, url: impl Into<String>) -> Self {
        self.redirect = Some(url.into());
        self
    }

    pub fn with_listed_bookmarks(mut self, bookmarks: Vec<Bookmark>) -> Self {
        self.listed_bookmarks = bookmarks;
        self
    }

    pub fn with_listed_commands(mut self, commands: Vec<CommandInfo>) -> Self {
        self.listed_commands = commands;
        self
    }

    pub fn with_listed_history(mut self, entries: Vec<HistoryEntry>) -> Self {
        self.listed_history = entries;
        self
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::store::memory::MemoryStore;

    pub struct Harness {
        pub store: MemoryStore,
        pub registry: Registry,
        pub clock: HistoryClock,
    }

    impl Harness {
        pub fn new() -> Self {
            Self {
                store: MemoryStore::new(),
                registry: Registry::builtin(),
                clock: HistoryClock::new(),
            }
        }

        pub fn ctx(&self) -> ExecContext<'_, MemoryStore> {
            ExecContext {
                store: &self.store,
                registry: &self.registry,
                clock: &self.clock,
            }
        }
    }

    pub fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = Command::ALL.iter().map(|c| c.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Command::ALL.len());
    }

    #[test]
    fn info_matches_accessors() {
        let info = Command::Help.info();
        assert_eq!(info.name, "help");
        assert_eq!(info.description, Command::Help.description());
    }
}
