//! Lock error types.

use thiserror::Error;
use tumbler_proto::ProtocolError;

/// Errors from lock operations.
#[derive(Debug, Error)]
pub enum LockError {
    /// A connected session answered a signal query with an unusable response.
    ///
    /// Distinct from a disconnected session, which reads fallbacks instead.
    #[error("signal query failed: {0}")]
    Signal(#[from] ProtocolError),
}

#[cfg(test)]
mod tests {
    use tumbler_proto::QueryKind;

    use super::*;

    #[test]
    fn signal_error_display() {
        let err = LockError::from(ProtocolError::Malformed {
            query: QueryKind::TwoFactor,
            reason: "expected value".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "signal query failed: malformed twofactor response: expected value"
        );
    }
}
