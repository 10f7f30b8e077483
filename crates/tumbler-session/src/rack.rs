//! Widget rack.
//!
//! The rack is the session's registry of devices. It owns the serial tag,
//! battery holders and rotating key broadcasters, keeps the unit roster, and
//! fans every query out to all of them through the [`Widget`] capability.

use std::time::Duration;

use tumbler_core::{BroadcasterAction, Environment, KeyBroadcaster, SessionHost, Widget};
use tumbler_proto::{BatteryCount, ProtocolError, QueryKind, Record, SerialNumber};

/// Widget printing the session serial identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialTag {
    record: SerialNumber,
}

impl SerialTag {
    /// Wrap a serial identifier. It must end in a decimal digit, otherwise
    /// the tag could never answer and the lock would read the fallback
    /// serial instead.
    pub fn new(serial: impl Into<String>) -> Result<Self, ProtocolError> {
        let record = SerialNumber { serial: serial.into() };
        record.validate()?;
        Ok(Self { record })
    }

    /// The serial identifier.
    pub fn serial(&self) -> &str {
        &self.record.serial
    }
}

impl Widget for SerialTag {
    fn answer(&self, query: &str) -> Option<String> {
        if QueryKind::from_wire(query) != Some(QueryKind::Serial) {
            return None;
        }
        encode(&self.record)
    }
}

/// Widget holding some batteries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryHolder {
    record: BatteryCount,
}

impl BatteryHolder {
    /// Holder with `count` batteries.
    pub fn new(count: u32) -> Self {
        Self { record: BatteryCount { count } }
    }

    /// Batteries in this holder.
    pub fn count(&self) -> u32 {
        self.record.count
    }
}

impl Widget for BatteryHolder {
    fn answer(&self, query: &str) -> Option<String> {
        if QueryKind::from_wire(query) != Some(QueryKind::Batteries) {
            return None;
        }
        encode(&self.record)
    }
}

fn encode<R: Record>(record: &R) -> Option<String> {
    match record.encode() {
        Ok(response) => Some(response),
        Err(e) => {
            tracing::error!("failed to encode {} response: {}", R::QUERY, e);
            None
        },
    }
}

/// Every device in a session plus the unit roster.
#[derive(Debug, Clone)]
pub struct Rack<E: Environment> {
    serial_tag: SerialTag,
    holders: Vec<BatteryHolder>,
    broadcasters: Vec<KeyBroadcaster<E>>,
    /// Puzzle units, including the lock.
    units_total: usize,
    /// Puzzle units solved so far.
    units_solved: usize,
}

impl<E: Environment> Rack<E> {
    /// Assemble a rack.
    pub fn new(
        serial_tag: SerialTag,
        holders: Vec<BatteryHolder>,
        broadcasters: Vec<KeyBroadcaster<E>>,
        units_total: usize,
        units_solved: usize,
    ) -> Self {
        Self { serial_tag, holders, broadcasters, units_total, units_solved }
    }

    /// The serial tag.
    pub fn serial_tag(&self) -> &SerialTag {
        &self.serial_tag
    }

    /// Battery holders.
    pub fn holders(&self) -> &[BatteryHolder] {
        &self.holders
    }

    /// Rotating key broadcasters.
    pub fn broadcasters(&self) -> &[KeyBroadcaster<E>] {
        &self.broadcasters
    }

    /// Record one more solved unit.
    pub fn mark_solved(&mut self) {
        self.units_solved = self.units_solved.saturating_add(1).min(self.units_total);
    }

    /// Activate every broadcaster. Actions are tagged with the broadcaster
    /// index.
    pub fn activate_broadcasters(&mut self) -> Vec<(usize, BroadcasterAction)> {
        self.broadcasters
            .iter_mut()
            .enumerate()
            .flat_map(|(index, b)| b.activate().into_iter().map(move |action| (index, action)))
            .collect()
    }

    /// Advance every broadcaster timer by `delta`.
    pub fn tick_broadcasters(&mut self, delta: Duration) -> Vec<(usize, BroadcasterAction)> {
        self.broadcasters
            .iter_mut()
            .enumerate()
            .flat_map(|(index, b)| b.tick(delta).into_iter().map(move |action| (index, action)))
            .collect()
    }

    fn widgets(&self) -> impl Iterator<Item = &dyn Widget> {
        std::iter::once(&self.serial_tag as &dyn Widget)
            .chain(self.holders.iter().map(|h| h as &dyn Widget))
            .chain(self.broadcasters.iter().map(|b| b as &dyn Widget))
    }
}

impl<E: Environment> SessionHost for Rack<E> {
    fn query_widgets(&self, query: QueryKind) -> Vec<String> {
        let responses: Vec<String> =
            self.widgets().filter_map(|widget| widget.answer(query.as_str())).collect();
        tracing::trace!(%query, responses = responses.len(), "widget query");
        responses
    }

    fn unit_count(&self) -> usize {
        self.units_total
    }

    fn solved_unit_count(&self) -> usize {
        self.units_solved
    }
}
