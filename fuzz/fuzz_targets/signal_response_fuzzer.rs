//! Fuzz target for widget response decoding
//!
//! # Strategy
//!
//! - Raw responses: arbitrary strings fed to a host for every query kind
//! - Mixed answers: well-formed and malformed responses in one query
//!
//! # Invariants
//!
//! - Decoding NEVER panics
//! - An accepted key is in `0..KEY_SPACE`
//! - An accepted serial ends in a digit
//! - Passcode derivation either errors or yields digits in `0..20`

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tumbler_core::{DIAL_POSITIONS, HostGateway, Passcode, SessionHost, SignalGateway};
use tumbler_proto::{KEY_SPACE, QueryKind, Record, SerialNumber, TwoFactorKey};

#[derive(Debug, Clone, Arbitrary)]
struct FuzzHost {
    keys: Vec<String>,
    serials: Vec<String>,
    batteries: Vec<String>,
    units: usize,
    solved: usize,
}

impl SessionHost for FuzzHost {
    fn query_widgets(&self, query: QueryKind) -> Vec<String> {
        match query {
            QueryKind::TwoFactor => self.keys.clone(),
            QueryKind::Serial => self.serials.clone(),
            QueryKind::Batteries => self.batteries.clone(),
        }
    }

    fn unit_count(&self) -> usize {
        self.units
    }

    fn solved_unit_count(&self) -> usize {
        self.solved
    }
}

fuzz_target!(|host: FuzzHost| {
    for response in &host.keys {
        if let Ok(record) = TwoFactorKey::decode(response) {
            assert!(record.key < KEY_SPACE);
        }
    }
    for response in &host.serials {
        if let Ok(record) = SerialNumber::decode(response) {
            assert!(record.serial.chars().next_back().is_some_and(|c| c.is_ascii_digit()));
        }
    }

    let gateway = HostGateway::new(&host);
    let _ = gateway.battery_count();
    if let Ok(passcode) = Passcode::derive(&gateway) {
        assert!(passcode.digits().iter().all(|d| d.value() < DIAL_POSITIONS));
    }
});
