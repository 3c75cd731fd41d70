use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "golinks")]
#[command(version = crate::long_version())]
#[command(about = "Personal go-links: commands, bookmarks and search shortcuts", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding the store and config (defaults to $GOLINKS_HOME or the user data dir)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Verbose output (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve and run a query, e.g. `go gh rust` or `go bookmark add g https://google.com/?q=%s`
    Go {
        /// The token followed by its arguments
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        query: Vec<String>,
    },

    /// List bookmarks and commands
    #[command(alias = "ls")]
    List,

    /// Show usage history, newest first
    History,

    /// Get or set configuration
    Config {
        /// Configuration key (url, seed-bookmarks)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Rewrite the store log keeping only live records
    Compact,
}
