use thiserror::Error;

#[derive(Error, Debug)]
pub enum GolinksError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid Command: {0}")]
    InvalidCommand(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store is closed")]
    Closed,

    #[error("Corrupt store log at offset {offset}: {reason}")]
    Corruption { offset: u64, reason: String },

    #[error("Record too large for the store log: {0} bytes")]
    RecordTooLarge(usize),

    #[error("History clock error: {0}")]
    Clock(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Error processing command {command}: {message}")]
    CommandExecution { command: String, message: String },

    #[error("Failed to record history: {0}")]
    History(Box<GolinksError>),

    #[error("Config error: {0}")]
    Config(String),

    #[error("{0}")]
    Api(String),
}

impl GolinksError {
    pub fn command(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CommandExecution {
            command: command.into(),
            message: message.into(),
        }
    }

    /// True for conditions caused by the caller's input rather than by the store.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidCommand(_) | Self::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, GolinksError>;
