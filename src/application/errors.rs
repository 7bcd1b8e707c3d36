//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Plugin error: {0}")]
    Plugin(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Command execution errors
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Command not found: {0}")]
    NotFound(String),

    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Outcome of a single resolve/fetch/respond stage
#[derive(Error, Debug)]
pub enum ImageError {
    /// Transport failure (DNS, TLS, timeout, body read)
    #[error("network error: {0}")]
    Network(String),

    /// Upstream answered with something other than 200
    #[error("unexpected status code {0}")]
    Status(u16),

    /// HTML page does not contain the expected image node
    #[error("image node not found: {0}")]
    NotFound(String),

    /// Image node exists but carries no usable `src`
    #[error("image node has an empty src")]
    EmptySource,

    /// JSON body is malformed or lacks the `url` field
    #[error("parse error: {0}")]
    Parse(String),

    /// Fetched resource is not an image
    #[error("not an image: {0}")]
    ContentType(String),

    #[error("filesystem error: {0}")]
    Filesystem(#[from] std::io::Error),
}

impl ImageError {
    /// Transport and status failures both count as "the request failed".
    pub fn is_network(&self) -> bool {
        matches!(self, ImageError::Network(_) | ImageError::Status(_))
    }
}
