//! Error types for the attributed graph layer

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug)]
pub enum GraphError {
    /// Malformed query or builder input (e.g. `_between` arity)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Unknown attribute name or out-of-range index
    #[error("Lookup error: {0}")]
    Lookup(String),

    /// Duplicate vertex name during construction
    #[error("Vertex names are not unique: {0}")]
    Uniqueness(String),

    /// Reserved-marker property names a computation nobody registered
    #[error("No computation registered as '{name}' for {kind}")]
    Delegation { name: String, kind: &'static str },

    #[error("Value list of length {actual} does not fit {expected} entities")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GraphError {
    pub fn configuration<T: Into<String>>(msg: T) -> Self {
        GraphError::Configuration(msg.into())
    }

    pub fn lookup<T: Into<String>>(msg: T) -> Self {
        GraphError::Lookup(msg.into())
    }
}
