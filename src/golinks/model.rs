use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder replaced by the search term when a template is expanded.
pub const PLACEHOLDER: &str = "%s";

/// A named URL template that a search term is substituted into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub name: String,
    pub url: String,
}

impl Bookmark {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// The destination for `query`.
    pub fn expand(&self, query: &str) -> String {
        expand_template(&self.url, query)
    }
}

/// Replace the first `%s` in `template` with `query`.
///
/// A template without a placeholder is returned unchanged.
pub fn expand_template(template: &str, query: &str) -> String {
    template.replacen(PLACEHOLDER, query, 1)
}

/// One recorded invocation of a command or bookmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Nanoseconds since the Unix epoch.
    pub timestamp: i64,
    pub command: String,
    pub value: String,
}

impl HistoryEntry {
    pub fn when(&self) -> DateTime<Utc> {
        Utc.timestamp_nanos(self.timestamp)
    }

    /// Local time in `Jan _2 15:04:05.000` form.
    pub fn when_local(&self) -> String {
        self.when()
            .with_timezone(&Local)
            .format("%b %e %H:%M:%S%.3f")
            .to_string()
    }

    /// "command value", or just the command when there is no value.
    pub fn what(&self) -> String {
        if self.value.is_empty() {
            self.command.clone()
        } else {
            format!("{} {}", self.command, self.value)
        }
    }
}

/// Name and description of a built-in command, for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandInfo {
    pub name: String,
    pub description: String,
}
