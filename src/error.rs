//! Main crate error.

use std::num::{ParseFloatError, ParseIntError};

/// Main error enum.
#[derive(thiserror::Error, Debug)]
pub enum AdapterError {
    /// The configured secret key is not valid Base64.
    #[error("secret key is not valid base64")]
    InvalidSecretKey,
    /// The stream connector has not been connected yet.
    #[error("stream connector is not connected")]
    StreamNotConnected,
    /// The websocket peer closed the connection.
    #[error("stream connection closed by remote")]
    StreamClosed,
    /// The event queue has no receiver left.
    #[error("event queue is closed")]
    QueueClosed,
    /// A frame or response field did not have the expected shape.
    #[error("malformed `{0}` field")]
    MalformedField(&'static str),
    /// A timestamp string could not be parsed as ISO-8601.
    #[error("invalid timestamp `{0}`")]
    InvalidTimestamp(String),
    /// Parse number error.
    #[error("failed to parse number")]
    ParseNumber,
}

impl From<ParseFloatError> for AdapterError {
    fn from(_value: ParseFloatError) -> Self {
        AdapterError::ParseNumber
    }
}

impl From<ParseIntError> for AdapterError {
    fn from(_value: ParseIntError) -> Self {
        AdapterError::ParseNumber
    }
}
