use std::time::Duration;

use thiserror::Error;

/// Convenience alias for results returned by the driver.
pub type Result<T, E = RobotiqError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum RobotiqError {
    /// A wire exchange was attempted before `connect()`.
    #[error("socket not connected, call connect() first")]
    NotConnected,
    /// The peer closed the stream mid-exchange (zero-byte read).
    #[error("connection closed by peer")]
    ConnectionClosed,
    #[error("unexpected response '{response}' when reading {name}")]
    MalformedResponse { name: String, response: String },
    #[error("SET {name} failed, server replied '{reply}'")]
    WriteRejected { name: String, reply: String },
    #[error("unrecognized {register} status code {code}")]
    UnrecognizedStatus { register: &'static str, code: i64 },
    #[error("gripper reset did not complete within {0:?}")]
    ResetTimeout(Duration),
    #[error("std io error, socket comm error")]
    IOError(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("configuration could not be parsed")]
    ConfigFormat(#[from] serde_json::Error),
}
