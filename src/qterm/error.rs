use thiserror::Error;

#[derive(Error, Debug)]
pub enum QtermError {
    #[error("{0}")]
    Transport(String),

    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("{0}")]
    MalformedResponse(String),

    #[error("Command not found: {0}")]
    CommandNotFound(String),

    #[error("Command already registered: {0}")]
    DuplicateCommand(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for QtermError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            QtermError::MalformedResponse(err.to_string())
        } else {
            QtermError::Transport(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, QtermError>;
