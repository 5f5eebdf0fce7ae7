use std::path::PathBuf;
use thiserror::Error;

use crate::utils::security::ValidationError;

/// Failure of the underlying HTTP transport
#[derive(Error, Debug)]
pub enum TransportError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Non-reqwest failure, used by alternative transports
    #[error("{0}")]
    Unreachable(String),
}

/// Licensing backend could not be reached or returned something undecodable
#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("Connection Error: {0}")]
    Transport(#[from] TransportError),

    /// Response after a server error was missing fields or was not JSON
    #[error("Init failed: {0}")]
    Decode(String),
}

/// Classified outcome of a rejected license check
#[derive(Error, Debug)]
pub enum LoginError {
    #[error("HWID lock detected. A hardware reset is required.")]
    HwidLocked,

    #[error("Key does not match.")]
    InvalidKey,

    #[error("{0}")]
    Other(String),

    #[error("{0}")]
    Connection(#[from] ConnectionError),
}

impl LoginError {
    /// Map a backend rejection message onto the error taxonomy
    pub fn classify(message: &str) -> Self {
        if message.contains("HWID") {
            LoginError::HwidLocked
        } else if message.contains("Invalid") || message.contains("doesn't exist") {
            LoginError::InvalidKey
        } else if message.is_empty() {
            LoginError::Other("Login failed: Unknown error.".to_string())
        } else {
            LoginError::Other(message.to_string())
        }
    }
}

/// Per-artifact fetch failure. Aborts the pipeline.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Download Failed ({file}): {source}")]
    Network {
        file: String,
        #[source]
        source: TransportError,
    },

    #[error("Permission Denied. Run as Administrator. ({file})")]
    Permission { file: String },

    #[error("An unexpected error occurred during file operation ({file}): {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    pub fn from_io(file: &str, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::PermissionDenied {
            FetchError::Permission {
                file: file.to_string(),
            }
        } else {
            FetchError::Io {
                file: file.to_string(),
                source: err,
            }
        }
    }
}

#[derive(Error, Debug)]
#[error("failed to launch {}: {source}", program.display())]
pub struct SpawnError {
    pub program: PathBuf,
    #[source]
    pub source: std::io::Error,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GateError {
    #[error("Actions are unavailable until a license is accepted.")]
    Locked,

    #[error("illegal gate transition from {from:?} to {to:?}")]
    InvalidTransition {
        from: crate::gate::GateState,
        to: crate::gate::GateState,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("{0} cannot be empty")]
    Missing(&'static str),

    #[error("api_url must start with http:// or https://")]
    InvalidUrl,

    #[error("duplicate action name: {0}")]
    DuplicateAction(String),

    #[error("action {0} has no artifacts")]
    EmptyAction(String),

    #[error("action {action}: executable {file_name:?} is not one of its artifacts")]
    UnfetchedExecutable { action: String, file_name: String },

    #[error("action {action}: invalid file name {file_name:?}: {source}")]
    InvalidFileName {
        action: String,
        file_name: String,
        #[source]
        source: ValidationError,
    },
}
