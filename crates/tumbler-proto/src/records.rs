//! Typed response records.
//!
//! Each query kind has exactly one record type. Records are encoded as flat
//! JSON maps and validated on both encode and decode, so a widget can never
//! publish (and a reader never accept) a value outside its documented range.

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{ProtocolError, QueryKind};

/// Rotating keys are drawn from `0..KEY_SPACE` (six decimal digits).
pub const KEY_SPACE: u32 = 1_000_000;

/// A validated widget response.
pub trait Record: Serialize + DeserializeOwned {
    /// Query this record answers.
    const QUERY: QueryKind;

    /// Check field ranges.
    fn validate(&self) -> Result<(), ProtocolError> {
        Ok(())
    }

    /// Serialize to the wire representation.
    fn encode(&self) -> Result<String, ProtocolError> {
        self.validate()?;
        serde_json::to_string(self)
            .map_err(|e| ProtocolError::Encode { query: Self::QUERY, reason: e.to_string() })
    }

    /// Parse and validate a wire response.
    fn decode(response: &str) -> Result<Self, ProtocolError> {
        let record: Self = serde_json::from_str(response)
            .map_err(|e| ProtocolError::Malformed { query: Self::QUERY, reason: e.to_string() })?;
        record.validate()?;
        Ok(record)
    }
}

/// Response to [`QueryKind::TwoFactor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwoFactorKey {
    /// Current key, in `0..KEY_SPACE`.
    #[serde(rename = "twofactor_key")]
    pub key: u32,
}

impl Record for TwoFactorKey {
    const QUERY: QueryKind = QueryKind::TwoFactor;

    fn validate(&self) -> Result<(), ProtocolError> {
        if self.key >= KEY_SPACE {
            return Err(ProtocolError::KeyOutOfRange { key: self.key });
        }
        Ok(())
    }
}

/// Response to [`QueryKind::Serial`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialNumber {
    /// Session serial identifier. Only its last character is meaningful to
    /// the lock and it must be a decimal digit.
    pub serial: String,
}

impl SerialNumber {
    /// Numeric value of the final character.
    pub fn last_digit(&self) -> Result<u8, ProtocolError> {
        let last = self.serial.chars().next_back().ok_or(ProtocolError::EmptySerial)?;
        last.to_digit(10)
            .and_then(|digit| u8::try_from(digit).ok())
            .ok_or(ProtocolError::NonNumericSerial(last))
    }
}

impl Record for SerialNumber {
    const QUERY: QueryKind = QueryKind::Serial;

    fn validate(&self) -> Result<(), ProtocolError> {
        self.last_digit().map(|_| ())
    }
}

/// Response to [`QueryKind::Batteries`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatteryCount {
    /// Batteries held by one holder.
    #[serde(rename = "numbatteries")]
    pub count: u32,
}

impl Record for BatteryCount {
    const QUERY: QueryKind = QueryKind::Batteries;
}
