//! # Golinks Architecture
//!
//! Golinks is a personal "go-links" service: type a short token and get sent
//! somewhere. A token can be a built-in command, a bookmark (a named URL
//! template) or, failing both, free text handed to a fallback search URL.
//! Every successful command or bookmark run is recorded in a history log.
//!
//! This crate is the core of that service. Front ends (the bundled CLI, an
//! HTTP server) split user input into a token and arguments and call in.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Front end (main.rs, or any HTTP layer)                     │
//! │  - Splits input into (token, args), formats output          │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Owns store, registry and config                          │
//! │  - Exposes resolve / run / list_* / record_history          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Dispatch (dispatch.rs) + Commands (commands/*.rs)          │
//! │  - Command, then bookmark, then fallback precedence         │
//! │  - Built-in commands return a CmdResult, never print        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Bookmarks (bookmarks.rs) + History (history.rs)            │
//! │  - Stateless views encoding records into the store          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Store trait: put / get / delete / scan / close           │
//! │  - FileStore (production), MemoryStore (testing)            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes regular Rust arguments, returns
//! `Result<T>`, never writes to stdout/stderr and never exits the process.
//! Diagnostics go through `tracing`; installing a subscriber is the front
//! end's job.
//!
//! ## Module Overview
//!
//! - [`api`]: The facade, entry point for all operations
//! - [`dispatch`]: Token resolution and execution
//! - [`registry`]: The immutable table of built-in commands
//! - [`commands`]: The built-in commands themselves
//! - [`bookmarks`]: Bookmark persistence
//! - [`history`]: Usage history persistence and ordering
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Core data types (`Bookmark`, `HistoryEntry`)
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod bookmarks;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod history;
pub mod model;
pub mod registry;
pub mod store;
