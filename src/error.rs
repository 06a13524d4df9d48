//! Crate-wide error type

use std::fmt;

/// Errors raised by the game core and its persistence helpers.
#[derive(Debug)]
pub enum PongError {
    /// A caller passed a value outside the accepted set (e.g. a side name
    /// other than `left`/`right`). Indicates a programming bug.
    InvalidArgument(String),
    /// Reference frame name did not match any known anchor.
    UnknownReferenceFrame(String),
    /// A tuning or settings value is out of range.
    InvalidConfig(String),
    /// A main loop callback was installed twice.
    CallbackAlreadySet(&'static str),
    /// Backing key-value store refused an operation.
    Storage(String),
    /// JSON serialization/deserialization error.
    Json(serde_json::Error),
}

impl fmt::Display for PongError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PongError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            PongError::UnknownReferenceFrame(name) => {
                write!(f, "unknown reference frame: {name:?}")
            }
            PongError::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            PongError::CallbackAlreadySet(which) => {
                write!(f, "main loop {which} callback already set")
            }
            PongError::Storage(msg) => write!(f, "storage error: {msg}"),
            PongError::Json(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for PongError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PongError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for PongError {
    fn from(e: serde_json::Error) -> Self {
        PongError::Json(e)
    }
}

pub type Result<T> = std::result::Result<T, PongError>;
