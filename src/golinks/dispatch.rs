//! # Dispatcher
//!
//! Decides what a typed token means and carries it out.
//!
//! ## Precedence
//!
//! 1. Empty token: the index page ([`Action::ShowIndex`]).
//! 2. A registered command: [`Action::RunCommand`].
//! 3. A bookmark: [`Action::RunBookmark`], the arguments joined by single spaces.
//! 4. A configured fallback template: [`Action::FallbackRedirect`].
//! 5. Otherwise: [`Action::Unresolved`].
//!
//! Commands always win over bookmarks of the same name.
//!
//! ## History
//!
//! A successful command or bookmark run is appended to the history log.
//! Nothing else is recorded. A failed append is logged and reported in
//! [`Dispatched::history_error`]; the primary result is still returned.

use crate::bookmarks::Bookmarks;
use crate::commands::{CmdResult, Command, ExecContext};
use crate::error::{GolinksError, Result};
use crate::history::{History, HistoryClock};
use crate::model::{expand_template, Bookmark, HistoryEntry};
use crate::registry::Registry;
use crate::store::Store;
use tracing::{debug, warn};

/// Input already split into a token and its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Request {
    pub token: String,
    pub args: Vec<String>,
    /// The text as typed, when the input came in as a query string.
    pub raw_query: Option<String>,
}

impl Request {
    /// A token and arguments whose raw query is the words joined by spaces.
    pub fn new(token: impl Into<String>, args: Vec<String>) -> Self {
        let token = token.into();
        let mut words = Vec::with_capacity(args.len() + 1);
        words.push(token.as_str());
        words.extend(args.iter().map(String::as_str));
        let raw_query = Some(words.join(" "));
        Self {
            token,
            args,
            raw_query,
        }
    }

    /// Split free text on single spaces: the first word is the token.
    pub fn from_query(query: &str) -> Self {
        let mut words = query.split(' ').map(str::to_string);
        let token = words.next().unwrap_or_default();
        Self {
            token,
            args: words.collect(),
            raw_query: if query.is_empty() {
                None
            } else {
                Some(query.to_string())
            },
        }
    }

    /// Path style input, `/<command>/<a>/<b>`. There is no raw query, so a
    /// fallback redirect keeps its template as is.
    pub fn from_path(command: &str, args: &str) -> Self {
        Self {
            token: command.to_string(),
            args: args.split('/').map(str::to_string).collect(),
            raw_query: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ShowIndex,
    RunCommand { command: Command, args: Vec<String> },
    RunBookmark { bookmark: Bookmark, query: String },
    FallbackRedirect { url: String },
    Unresolved { token: String },
}

/// The outcome of [`Dispatcher::dispatch`].
#[derive(Debug)]
pub struct Dispatched {
    pub action: Action,
    pub result: CmdResult,
    /// The history entry written for this run, if any.
    pub recorded: Option<HistoryEntry>,
    /// Set when the run succeeded but recording it did not.
    pub history_error: Option<GolinksError>,
}

impl Dispatched {
    fn unrecorded(action: Action, result: CmdResult) -> Self {
        Self {
            action,
            result,
            recorded: None,
            history_error: None,
        }
    }
}

pub struct Dispatcher<'a, S: Store> {
    store: &'a S,
    registry: &'a Registry,
    clock: &'a HistoryClock,
    fallback_url: &'a str,
}

impl<'a, S: Store> Dispatcher<'a, S> {
    pub fn new(
        store: &'a S,
        registry: &'a Registry,
        clock: &'a HistoryClock,
        fallback_url: &'a str,
    ) -> Self {
        Self {
            store,
            registry,
            clock,
            fallback_url,
        }
    }

    /// Resolve `token` and `args`, treating them as typed free text.
    pub fn resolve(&self, token: &str, args: &[String]) -> Result<Action> {
        self.resolve_request(&Request::new(token, args.to_vec()))
    }

    pub fn resolve_request(&self, request: &Request) -> Result<Action> {
        let token = request.token.as_str();
        if token.is_empty() {
            return Ok(Action::ShowIndex);
        }

        if let Some(command) = self.registry.lookup(token) {
            return Ok(Action::RunCommand {
                command,
                args: request.args.clone(),
            });
        }

        if let Some(bookmark) = Bookmarks::new(self.store).get(token)? {
            return Ok(Action::RunBookmark {
                bookmark,
                query: request.args.join(" "),
            });
        }

        if !self.fallback_url.is_empty() {
            let url = match request.raw_query.as_deref() {
                Some(q) if !q.is_empty() => expand_template(self.fallback_url, q),
                _ => self.fallback_url.to_string(),
            };
            return Ok(Action::FallbackRedirect { url });
        }

        Ok(Action::Unresolved {
            token: token.to_string(),
        })
    }

    /// Resolve and run `request`.
    ///
    /// `Unresolved` input is `Err(InvalidCommand)`; a failing command is
    /// `Err(CommandExecution)` tagged with its name.
    pub fn dispatch(&self, request: &Request) -> Result<Dispatched> {
        let action = self.resolve_request(request)?;
        debug!(token = %request.token, action = ?action, "Resolved request");
        self.execute(action)
    }

    pub fn execute(&self, action: Action) -> Result<Dispatched> {
        match action {
            Action::ShowIndex => Ok(Dispatched::unrecorded(action, CmdResult::default())),
            Action::FallbackRedirect { ref url } => {
                let result = CmdResult::default().with_redirect(url.clone());
                Ok(Dispatched::unrecorded(action, result))
            }
            Action::Unresolved { token } => Err(GolinksError::InvalidCommand(token)),
            Action::RunCommand { command, ref args } => {
                let ctx = ExecContext {
                    store: self.store,
                    registry: self.registry,
                    clock: self.clock,
                };
                let result = command
                    .exec(&ctx, args)
                    .map_err(|e| GolinksError::command(command.name(), e.to_string()))?;
                Ok(self.record(action, result, command.name(), ""))
            }
            Action::RunBookmark {
                ref bookmark,
                ref query,
            } => {
                let result = bookmark.exec(query);
                let name = bookmark.name.clone();
                let value = query.clone();
                Ok(self.record(action, result, &name, &value))
            }
        }
    }

    fn record(&self, action: Action, result: CmdResult, command: &str, value: &str) -> Dispatched {
        match History::new(self.store, self.clock).append(command, value) {
            Ok(entry) => Dispatched {
                action,
                result,
                recorded: Some(entry),
                history_error: None,
            },
            Err(e) => {
                warn!(command, error = %e, "Failed to record history");
                Dispatched {
                    action,
                    result,
                    recorded: None,
                    history_error: Some(GolinksError::History(Box::new(e))),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;

    const FALLBACK: &str = "https://www.google.com/search?q=%s&btnK";

    struct Setup {
        fixture: StoreFixture,
        registry: Registry,
        clock: HistoryClock,
    }

    impl Setup {
        fn new() -> Self {
            Self {
                fixture: StoreFixture::new()
                    .with_bookmark("gh", "https://github.com/search?q=%s")
                    .with_bookmark("help", "https://example.com/help?q=%s"),
                registry: Registry::builtin(),
                clock: HistoryClock::new(),
            }
        }

        fn dispatcher<'a>(&'a self, fallback: &'a str) -> Dispatcher<'a, crate::store::memory::MemoryStore> {
            Dispatcher::new(&self.fixture.store, &self.registry, &self.clock, fallback)
        }

        fn history(&self) -> Vec<HistoryEntry> {
            History::new(&self.fixture.store, &self.clock).list().unwrap()
        }
    }

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_token_shows_index() {
        let s = Setup::new();
        let d = s.dispatcher(FALLBACK);
        assert_eq!(d.resolve("", &[]).unwrap(), Action::ShowIndex);

        let out = d.dispatch(&Request::from_query("")).unwrap();
        assert_eq!(out.action, Action::ShowIndex);
        assert!(s.history().is_empty());
    }

    #[test]
    fn command_beats_bookmark_with_same_name() {
        let s = Setup::new();
        let action = s.dispatcher(FALLBACK).resolve("help", &words(&["me"])).unwrap();
        assert_eq!(
            action,
            Action::RunCommand {
                command: Command::Help,
                args: words(&["me"]),
            }
        );
    }

    #[test]
    fn bookmark_joins_args_with_spaces() {
        let s = Setup::new();
        let action = s
            .dispatcher(FALLBACK)
            .resolve("gh", &words(&["rust", "lang"]))
            .unwrap();
        match action {
            Action::RunBookmark { bookmark, query } => {
                assert_eq!(bookmark.name, "gh");
                assert_eq!(query, "rust lang");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn bookmark_redirects_and_records_history() {
        let s = Setup::new();
        let out = s
            .dispatcher(FALLBACK)
            .dispatch(&Request::from_query("gh golang"))
            .unwrap();
        assert_eq!(
            out.result.redirect.as_deref(),
            Some("https://github.com/search?q=golang")
        );
        assert!(out.history_error.is_none());

        let history = s.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].command, "gh");
        assert_eq!(history[0].value, "golang");
        assert_eq!(Some(&history[0]), out.recorded.as_ref());
    }

    #[test]
    fn command_records_empty_value() {
        let s = Setup::new();
        let out = s
            .dispatcher(FALLBACK)
            .dispatch(&Request::from_query("list"))
            .unwrap();
        assert_eq!(out.result.listed_bookmarks.len(), 2);

        let history = s.history();
        assert_eq!(history[0].command, "list");
        assert_eq!(history[0].value, "");
    }

    #[test]
    fn unknown_token_uses_fallback_with_raw_query() {
        let s = Setup::new();
        let d = s.dispatcher(FALLBACK);
        assert_eq!(
            d.resolve("what", &words(&["is", "rust"])).unwrap(),
            Action::FallbackRedirect {
                url: "https://www.google.com/search?q=what is rust&btnK".into()
            }
        );

        d.dispatch(&Request::from_query("what is rust")).unwrap();
        assert!(s.history().is_empty());
    }

    #[test]
    fn path_input_keeps_literal_fallback() {
        let s = Setup::new();
        let action = s
            .dispatcher(FALLBACK)
            .resolve_request(&Request::from_path("nothing", "a/b"))
            .unwrap();
        assert_eq!(
            action,
            Action::FallbackRedirect {
                url: FALLBACK.to_string()
            }
        );
    }

    #[test]
    fn unknown_token_without_fallback_is_unresolved() {
        let s = Setup::new();
        let d = s.dispatcher("");
        assert_eq!(
            d.resolve("nope", &[]).unwrap(),
            Action::Unresolved {
                token: "nope".into()
            }
        );

        let err = d.dispatch(&Request::from_query("nope x")).unwrap_err();
        assert!(matches!(err, GolinksError::InvalidCommand(ref t) if t == "nope"));
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "Invalid Command: nope");
    }

    #[test]
    fn failing_command_is_tagged_and_not_recorded() {
        let s = Setup::new();
        let err = s
            .dispatcher(FALLBACK)
            .dispatch(&Request::from_query("bookmark add only-a-name"))
            .unwrap_err();
        match err {
            GolinksError::CommandExecution { command, message } => {
                assert_eq!(command, "bookmark");
                assert!(message.contains("usage"));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(s.history().is_empty());
    }

    #[test]
    fn history_failure_does_not_hide_redirect() {
        let s = Setup::new();
        let d = s.dispatcher(FALLBACK);
        s.fixture.store.set_simulate_write_error(true);

        let out = d.dispatch(&Request::from_query("gh golang")).unwrap();
        assert_eq!(
            out.result.redirect.as_deref(),
            Some("https://github.com/search?q=golang")
        );
        assert!(out.recorded.is_none());
        assert!(matches!(out.history_error, Some(GolinksError::History(_))));
    }

    #[test]
    fn from_query_splits_on_single_spaces() {
        let req = Request::from_query("gh  two");
        assert_eq!(req.token, "gh");
        assert_eq!(req.args, words(&["", "two"]));
        assert_eq!(req.raw_query.as_deref(), Some("gh  two"));

        let leading = Request::from_query(" gh");
        assert_eq!(leading.token, "");
    }

    #[test]
    fn new_request_rebuilds_raw_query() {
        let req = Request::new("gh", words(&["a", "b"]));
        assert_eq!(req.raw_query.as_deref(), Some("gh a b"));
    }
}
