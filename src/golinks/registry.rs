//! # Command Registry
//!
//! The table of built-in commands, keyed by name. It is built once at
//! startup and handed to the dispatcher by reference; nothing can register
//! a command after construction, so readers never need to synchronize.

use crate::commands::Command;
use crate::model::CommandInfo;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct Registry {
    commands: BTreeMap<&'static str, Command>,
}

impl Registry {
    /// The production table: every built-in command.
    pub fn builtin() -> Self {
        Self::from_commands(Command::ALL)
    }

    /// Build a table from `commands`. A later command replaces an earlier
    /// one with the same name.
    pub fn from_commands<I: IntoIterator<Item = Command>>(commands: I) -> Self {
        let mut registry = Self::default();
        for command in commands {
            registry.register(command);
        }
        registry
    }

    fn register(&mut self, command: Command) {
        self.commands.insert(command.name(), command);
    }

    /// Exact, case-sensitive lookup.
    pub fn lookup(&self, name: &str) -> Option<Command> {
        self.commands.get(name).copied()
    }

    /// All commands sorted by name.
    pub fn all(&self) -> Vec<Command> {
        self.commands.values().copied().collect()
    }

    pub fn infos(&self) -> Vec<CommandInfo> {
        self.commands.values().map(Command::info).collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_every_command() {
        let registry = Registry::builtin();
        assert_eq!(registry.len(), Command::ALL.len());
        for command in Command::ALL {
            assert_eq!(registry.lookup(command.name()), Some(command));
        }
    }

    #[test]
    fn lookup_is_exact_and_case_sensitive() {
        let registry = Registry::builtin();
        assert_eq!(registry.lookup("help"), Some(Command::Help));
        assert_eq!(registry.lookup("Help"), None);
        assert_eq!(registry.lookup("hel"), None);
        assert_eq!(registry.lookup(""), None);
    }

    #[test]
    fn all_is_sorted_by_name() {
        let registry = Registry::from_commands([Command::List, Command::Help, Command::Bookmark]);
        let names: Vec<_> = registry.all().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["bookmark", "help", "list"]);
    }

    #[test]
    fn duplicate_registration_keeps_one() {
        let registry = Registry::from_commands([Command::Help, Command::Help]);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn empty_registry() {
        let registry = Registry::default();
        assert!(registry.is_empty());
        assert!(registry.lookup("help").is_none());
    }
}
