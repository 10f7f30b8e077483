//! Tumbler widget query protocol.
//!
//! Devices in a session talk to each other through a tiny request/response
//! channel routed by the session host: a request is a bare query identifier,
//! a response is a flat string-keyed JSON map. This crate owns that wire
//! contract.
//!
//! # Components
//!
//! - [`QueryKind`]: the query identifiers understood by widgets
//! - [`Record`]: typed, validated response records ([`TwoFactorKey`],
//!   [`SerialNumber`], [`BatteryCount`])
//! - [`ProtocolError`]: malformed or invalid responses
//!
//! Field names are fixed by the session host and must match exactly.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod query;
mod records;

pub use error::ProtocolError;
pub use query::{QUERY_BATTERIES, QUERY_SERIAL, QUERY_TWOFACTOR, QueryKind};
pub use records::{BatteryCount, KEY_SPACE, Record, SerialNumber, TwoFactorKey};
