//! Session error types.

use thiserror::Error;
use tumbler_core::LockError;

/// Errors that can occur while hosting a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Rejected session configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Player input that names no button or command.
    #[error("unknown command {0:?}")]
    UnknownCommand(String),

    /// The lock could not read the session.
    #[error("lock error: {0}")]
    Lock(#[from] LockError),

    /// Reading player input failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
