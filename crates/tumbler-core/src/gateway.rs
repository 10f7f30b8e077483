//! Session signals consumed by passcode derivation.
//!
//! The lock never holds references to other devices. It reads the session
//! through [`SignalGateway`], which has three implementations:
//!
//! - [`HostGateway`]: queries live widgets through a [`SessionHost`] and
//!   decodes their responses strictly
//! - [`Snapshot`]: plain data, for tests and replays
//! - [`Standalone`]: fixed fallbacks used when no session is connected
//!
//! `Option<G>` is also a gateway: `None` means "not connected" and reads the
//! standalone fallbacks. A connected host that answers with garbage is a
//! different condition and fails with [`ProtocolError`].

use tumbler_proto::{BatteryCount, ProtocolError, QueryKind, Record, SerialNumber, TwoFactorKey};

/// Serial identifier assumed when no session is connected.
pub const FALLBACK_SERIAL: &str = "IE7E63";

/// Rotating keys assumed when no session is connected.
pub const FALLBACK_ROTATING_KEYS: [u32; 2] = [201_928, 501_929];

/// Battery count assumed when no session is connected.
pub const FALLBACK_BATTERIES: u32 = 1;

/// Solved unit count assumed when no session is connected.
pub const FALLBACK_SOLVED_UNITS: usize = 1;

/// Total unit count assumed when no session is connected.
pub const FALLBACK_TOTAL_UNITS: usize = 3;

/// Read-only view of the session signals.
pub trait SignalGateway {
    /// Current key of every active rotating key broadcaster.
    fn rotating_keys(&self) -> Result<Vec<u32>, ProtocolError>;

    /// Last digit of the session serial identifier.
    fn last_serial_digit(&self) -> Result<u8, ProtocolError>;

    /// Puzzle units in the session, including the lock itself.
    fn total_units(&self) -> usize;

    /// Puzzle units already solved.
    fn solved_units(&self) -> usize;

    /// Batteries across every holder.
    fn battery_count(&self) -> Result<u32, ProtocolError>;
}

impl<G: SignalGateway + ?Sized> SignalGateway for &G {
    fn rotating_keys(&self) -> Result<Vec<u32>, ProtocolError> {
        (**self).rotating_keys()
    }

    fn last_serial_digit(&self) -> Result<u8, ProtocolError> {
        (**self).last_serial_digit()
    }

    fn total_units(&self) -> usize {
        (**self).total_units()
    }

    fn solved_units(&self) -> usize {
        (**self).solved_units()
    }

    fn battery_count(&self) -> Result<u32, ProtocolError> {
        (**self).battery_count()
    }
}

impl<G: SignalGateway> SignalGateway for Option<G> {
    fn rotating_keys(&self) -> Result<Vec<u32>, ProtocolError> {
        self.as_ref().map_or_else(|| Standalone.rotating_keys(), SignalGateway::rotating_keys)
    }

    fn last_serial_digit(&self) -> Result<u8, ProtocolError> {
        self.as_ref()
            .map_or_else(|| Standalone.last_serial_digit(), SignalGateway::last_serial_digit)
    }

    fn total_units(&self) -> usize {
        self.as_ref().map_or(FALLBACK_TOTAL_UNITS, SignalGateway::total_units)
    }

    fn solved_units(&self) -> usize {
        self.as_ref().map_or(FALLBACK_SOLVED_UNITS, SignalGateway::solved_units)
    }

    fn battery_count(&self) -> Result<u32, ProtocolError> {
        self.as_ref().map_or(Ok(FALLBACK_BATTERIES), SignalGateway::battery_count)
    }
}

/// Fallback signals for a lock with no session attached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Standalone;

impl SignalGateway for Standalone {
    fn rotating_keys(&self) -> Result<Vec<u32>, ProtocolError> {
        Ok(FALLBACK_ROTATING_KEYS.to_vec())
    }

    fn last_serial_digit(&self) -> Result<u8, ProtocolError> {
        SerialNumber { serial: FALLBACK_SERIAL.to_string() }.last_digit()
    }

    fn total_units(&self) -> usize {
        FALLBACK_TOTAL_UNITS
    }

    fn solved_units(&self) -> usize {
        FALLBACK_SOLVED_UNITS
    }

    fn battery_count(&self) -> Result<u32, ProtocolError> {
        Ok(FALLBACK_BATTERIES)
    }
}

/// Signals captured as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Current rotating keys.
    pub rotating_keys: Vec<u32>,
    /// Serial identifier.
    pub serial: String,
    /// Total batteries.
    pub batteries: u32,
    /// Solved units.
    pub solved_units: usize,
    /// Total units.
    pub total_units: usize,
}

impl Snapshot {
    /// Snapshot holding the standalone fallbacks.
    pub fn standalone() -> Self {
        Self {
            rotating_keys: FALLBACK_ROTATING_KEYS.to_vec(),
            serial: FALLBACK_SERIAL.to_string(),
            batteries: FALLBACK_BATTERIES,
            solved_units: FALLBACK_SOLVED_UNITS,
            total_units: FALLBACK_TOTAL_UNITS,
        }
    }
}

impl SignalGateway for Snapshot {
    fn rotating_keys(&self) -> Result<Vec<u32>, ProtocolError> {
        Ok(self.rotating_keys.clone())
    }

    fn last_serial_digit(&self) -> Result<u8, ProtocolError> {
        SerialNumber { serial: self.serial.clone() }.last_digit()
    }

    fn total_units(&self) -> usize {
        self.total_units
    }

    fn solved_units(&self) -> usize {
        self.solved_units
    }

    fn battery_count(&self) -> Result<u32, ProtocolError> {
        Ok(self.batteries)
    }
}

/// Something that routes queries to every widget in a session.
pub trait SessionHost {
    /// Ask every widget `query` and collect the raw responses. Widgets that
    /// do not understand the query contribute nothing.
    fn query_widgets(&self, query: QueryKind) -> Vec<String>;

    /// Puzzle units in the session.
    fn unit_count(&self) -> usize;

    /// Puzzle units already solved.
    fn solved_unit_count(&self) -> usize;
}

/// Gateway backed by live widget queries.
#[derive(Debug, Clone, Copy)]
pub struct HostGateway<'a, H: ?Sized> {
    host: &'a H,
}

impl<'a, H: SessionHost + ?Sized> HostGateway<'a, H> {
    /// Wrap a session host.
    pub fn new(host: &'a H) -> Self {
        Self { host }
    }
}

impl<H: SessionHost + ?Sized> SignalGateway for HostGateway<'_, H> {
    fn rotating_keys(&self) -> Result<Vec<u32>, ProtocolError> {
        self.host
            .query_widgets(QueryKind::TwoFactor)
            .iter()
            .map(|response| TwoFactorKey::decode(response).map(|record| record.key))
            .collect()
    }

    fn last_serial_digit(&self) -> Result<u8, ProtocolError> {
        match self.host.query_widgets(QueryKind::Serial).first() {
            Some(response) => SerialNumber::decode(response)?.last_digit(),
            None => Standalone.last_serial_digit(),
        }
    }

    fn total_units(&self) -> usize {
        self.host.unit_count()
    }

    fn solved_units(&self) -> usize {
        self.host.solved_unit_count()
    }

    fn battery_count(&self) -> Result<u32, ProtocolError> {
        self.host.query_widgets(QueryKind::Batteries).iter().try_fold(0u32, |total, response| {
            BatteryCount::decode(response).map(|record| total.saturating_add(record.count))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    /// Host with canned responses per query.
    #[derive(Default)]
    struct CannedHost {
        responses: HashMap<QueryKind, Vec<String>>,
        units: usize,
        solved: usize,
    }

    impl CannedHost {
        fn with(mut self, query: QueryKind, response: &str) -> Self {
            self.responses.entry(query).or_default().push(response.to_string());
            self
        }
    }

    impl SessionHost for CannedHost {
        fn query_widgets(&self, query: QueryKind) -> Vec<String> {
            self.responses.get(&query).cloned().unwrap_or_default()
        }

        fn unit_count(&self) -> usize {
            self.units
        }

        fn solved_unit_count(&self) -> usize {
            self.solved
        }
    }

    #[test]
    fn standalone_serial_digit() {
        assert_eq!(Standalone.last_serial_digit().unwrap(), 3);
    }

    #[test]
    fn disconnected_option_reads_fallbacks() {
        let gateway: Option<Snapshot> = None;
        assert_eq!(gateway.rotating_keys().unwrap(), FALLBACK_ROTATING_KEYS.to_vec());
        assert_eq!(gateway.last_serial_digit().unwrap(), 3);
        assert_eq!(gateway.battery_count().unwrap(), FALLBACK_BATTERIES);
        assert_eq!(gateway.solved_units(), FALLBACK_SOLVED_UNITS);
        assert_eq!(gateway.total_units(), FALLBACK_TOTAL_UNITS);
    }

    #[test]
    fn connected_option_reads_gateway() {
        let snapshot = Snapshot { batteries: 4, total_units: 9, ..Snapshot::standalone() };
        let gateway = Some(snapshot);
        assert_eq!(gateway.battery_count().unwrap(), 4);
        assert_eq!(gateway.total_units(), 9);
    }

    #[test]
    fn host_gateway_collects_every_key() {
        let host = CannedHost::default()
            .with(QueryKind::TwoFactor, r#"{"twofactor_key": 123456}"#)
            .with(QueryKind::TwoFactor, r#"{"twofactor_key": 7}"#);
        let gateway = HostGateway::new(&host);
        assert_eq!(gateway.rotating_keys().unwrap(), vec![123_456, 7]);
    }

    #[test]
    fn host_gateway_sums_batteries() {
        let host = CannedHost::default()
            .with(QueryKind::Batteries, r#"{"numbatteries": 2}"#)
            .with(QueryKind::Batteries, r#"{"numbatteries": 1}"#);
        assert_eq!(HostGateway::new(&host).battery_count().unwrap(), 3);
    }

    #[test]
    fn host_gateway_without_holders_has_no_batteries() {
        let host = CannedHost::default();
        assert_eq!(HostGateway::new(&host).battery_count().unwrap(), 0);
    }

    #[test]
    fn host_gateway_uses_first_serial() {
        let host = CannedHost::default()
            .with(QueryKind::Serial, r#"{"serial": "AB1CD8"}"#)
            .with(QueryKind::Serial, r#"{"serial": "AB1CD2"}"#);
        assert_eq!(HostGateway::new(&host).last_serial_digit().unwrap(), 8);
    }

    #[test]
    fn host_gateway_without_serial_uses_fallback() {
        let host = CannedHost::default();
        assert_eq!(HostGateway::new(&host).last_serial_digit().unwrap(), 3);
    }

    #[test]
    fn host_gateway_fails_on_malformed_key() {
        let host = CannedHost::default()
            .with(QueryKind::TwoFactor, r#"{"twofactor_key": 1}"#)
            .with(QueryKind::TwoFactor, r#"{"key": 1}"#);
        let result = HostGateway::new(&host).rotating_keys();
        assert!(matches!(result, Err(ProtocolError::Malformed { .. })));
    }

    #[test]
    fn host_gateway_fails_on_malformed_battery() {
        let host = CannedHost::default().with(QueryKind::Batteries, "not json");
        let result = HostGateway::new(&host).battery_count();
        assert!(matches!(
            result,
            Err(ProtocolError::Malformed { query: QueryKind::Batteries, .. })
        ));
    }

    #[test]
    fn host_gateway_reports_unit_counts() {
        let host = CannedHost { units: 11, solved: 4, ..CannedHost::default() };
        let gateway = HostGateway::new(&host);
        assert_eq!(gateway.total_units(), 11);
        assert_eq!(gateway.solved_units(), 4);
    }
}
