//! Protocol error types.

use thiserror::Error;

use crate::QueryKind;

/// Errors from encoding or decoding widget responses.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Response could not be parsed into the expected record.
    #[error("malformed {query} response: {reason}")]
    Malformed {
        /// Query the response was answering.
        query: QueryKind,
        /// Parser diagnostic.
        reason: String,
    },

    /// Rotating key outside `0..KEY_SPACE`.
    #[error("twofactor key {key} out of range")]
    KeyOutOfRange {
        /// The offending key.
        key: u32,
    },

    /// Serial number has no characters.
    #[error("serial number is empty")]
    EmptySerial,

    /// Serial number does not end in a decimal digit.
    #[error("serial number must end in a digit, got {0:?}")]
    NonNumericSerial(char),

    /// Record could not be serialized.
    #[error("failed to encode {query} response: {reason}")]
    Encode {
        /// Query the record answers.
        query: QueryKind,
        /// Serializer diagnostic.
        reason: String,
    },
}
