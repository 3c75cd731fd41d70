use chrono::Utc;
use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use golinks::api::Golinks;
use golinks::commands::{CmdMessage, CmdResult, MessageLevel};
use golinks::config::GolinksConfig;
use golinks::dispatch::{Action, Request};
use golinks::error::{GolinksError, Result};
use golinks::model::{Bookmark, CommandInfo, HistoryEntry};
use golinks::registry::Registry;
use golinks::store::fs::FileStore;
use std::path::{Path, PathBuf};
use tracing::Level;
use unicode_width::UnicodeWidthStr;

mod args;
use args::{Cli, Commands};

const HOME_ENV: &str = "GOLINKS_HOME";

pub(crate) fn long_version() -> &'static str {
    concat!(env!("CARGO_PKG_VERSION"), env!("GOLINKS_BUILD_INFO"))
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    api: Golinks<FileStore>,
    data_dir: PathBuf,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let data_dir = resolve_data_dir(&cli)?;

    // Config edits must work even when the store is unreadable.
    let command = match cli.command {
        Some(Commands::Config { key, value }) => return handle_config(&data_dir, key, value),
        other => other,
    };

    let ctx = init_context(data_dir)?;
    let outcome = match command {
        Some(Commands::Go { query }) => handle_go(&ctx, query),
        Some(Commands::List) | None => handle_list(&ctx),
        Some(Commands::History) => handle_history(&ctx),
        Some(Commands::Compact) => handle_compact(&ctx),
        Some(Commands::Config { .. }) => Ok(()),
    };

    let closed = ctx.api.close();
    outcome?;
    closed
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn resolve_data_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(dir) = &cli.data_dir {
        return Ok(dir.clone());
    }
    if let Some(home) = std::env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "golinks", "golinks")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| GolinksError::Config("Could not determine data dir".to_string()))
}

fn init_context(data_dir: PathBuf) -> Result<AppContext> {
    let config = GolinksConfig::load(&data_dir)?;
    let store = FileStore::open(&data_dir)?;
    let api = Golinks::new(store, Registry::builtin(), config)?;
    api.ensure_default_bookmarks()?;
    Ok(AppContext { api, data_dir })
}

fn handle_go(ctx: &AppContext, query: Vec<String>) -> Result<()> {
    let request = Request::from_query(&query.join(" "));
    let out = ctx.api.run(&request)?;

    if matches!(out.action, Action::ShowIndex) {
        println!("{}", "Type a command or bookmark, e.g. `golinks go help`.".dimmed());
        return Ok(());
    }

    print_result(&out.result);

    match out.history_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn handle_list(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.list_all()?;
    print_result(&result);
    Ok(())
}

fn handle_history(ctx: &AppContext) -> Result<()> {
    let entries = ctx.api.list_history()?;
    if entries.is_empty() {
        println!("{}", "No history yet.".dimmed());
    }
    print_history(&entries);
    Ok(())
}

fn handle_compact(ctx: &AppContext) -> Result<()> {
    let report = ctx.api.store().compact()?;
    print_messages(&[CmdMessage::success(format!(
        "Compacted {}: {} live records, {} -> {} bytes",
        ctx.data_dir.display(),
        report.live_records,
        report.bytes_before,
        report.bytes_after
    ))]);
    Ok(())
}

fn handle_config(data_dir: &Path, key: Option<String>, value: Option<String>) -> Result<()> {
    let mut config = GolinksConfig::load(data_dir)?;
    match (key, value) {
        (None, _) => {
            for key in GolinksConfig::KEYS {
                println!("{} = {}", key, config.get(key)?);
            }
        }
        (Some(key), None) => println!("{} = {}", key, config.get(&key)?),
        (Some(key), Some(value)) => {
            config.set(&key, &value)?;
            config.save(data_dir)?;
            print_messages(&[CmdMessage::success(format!("{} = {}", key, value))]);
        }
    }
    Ok(())
}

fn print_result(result: &CmdResult) {
    if let Some(url) = &result.redirect {
        println!("{}", url);
    }
    if !result.listed_bookmarks.is_empty() {
        print_bookmarks(&result.listed_bookmarks);
    }
    if !result.listed_commands.is_empty() {
        print_commands(&result.listed_commands);
    }
    if !result.listed_history.is_empty() {
        print_history(&result.listed_history);
    }
    print_messages(&result.messages);
}

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
        }
    }
}

fn print_bookmarks(bookmarks: &[Bookmark]) {
    println!("{}", "Bookmarks".bold());
    let width = column_width(bookmarks.iter().map(|b| b.name.as_str()));
    for bm in bookmarks {
        println!("  {}  {}", pad_to(&bm.name, width).yellow(), bm.url);
    }
}

fn print_commands(commands: &[CommandInfo]) {
    println!("{}", "Commands".bold());
    let width = column_width(commands.iter().map(|c| c.name.as_str()));
    for cmd in commands {
        println!(
            "  {}  {}",
            pad_to(&cmd.name, width).cyan(),
            cmd.description.dimmed()
        );
    }
}

const TIME_WIDTH: usize = 16;

fn print_history(entries: &[HistoryEntry]) {
    for entry in entries {
        println!(
            "  {}  {}  {}",
            entry.when_local().dimmed(),
            format_time_ago(entry).dimmed(),
            entry.what()
        );
    }
}

fn column_width<'a>(names: impl Iterator<Item = &'a str>) -> usize {
    names.map(|n| n.width()).max().unwrap_or(0)
}

fn pad_to(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

fn format_time_ago(entry: &HistoryEntry) -> String {
    let duration = Utc::now().signed_duration_since(entry.when());

    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());

    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
