//! Query identifiers.

use std::fmt;

/// Wire identifier of the rotating key query.
pub const QUERY_TWOFACTOR: &str = "twofactor";

/// Wire identifier of the serial number query.
pub const QUERY_SERIAL: &str = "serial";

/// Wire identifier of the battery query.
pub const QUERY_BATTERIES: &str = "batteries";

/// Queries a widget can be asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    /// Current key of a rotating key broadcaster.
    TwoFactor,
    /// Session serial identifier.
    Serial,
    /// Batteries held by a battery holder.
    Batteries,
}

impl QueryKind {
    /// Every query kind.
    pub const ALL: [Self; 3] = [Self::TwoFactor, Self::Serial, Self::Batteries];

    /// Identifier sent on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TwoFactor => QUERY_TWOFACTOR,
            Self::Serial => QUERY_SERIAL,
            Self::Batteries => QUERY_BATTERIES,
        }
    }

    /// Parse a wire identifier. Returns `None` for queries nobody here
    /// understands.
    pub fn from_wire(identifier: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == identifier)
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
