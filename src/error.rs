use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WifiConfError {
    #[error("Parse error: {reason}")]
    Parse { reason: String },

    #[error("Couldn't parse {}: {reason}", .path.display())]
    ParseFile { path: PathBuf, reason: String },

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open directory {}: {source}", .path.display())]
    DirectoryOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write profile '{profile}' to {}: {source}", .path.display())]
    Persist {
        profile: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid submission: {0}")]
    InvalidSubmission(String),
}

impl WifiConfError {
    pub(crate) fn parse(reason: impl Into<String>) -> Self {
        WifiConfError::Parse {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WifiConfError>;
