//! Query capability shared by every session device.

/// A device that can answer widget queries.
///
/// Session hosts keep a registry of widgets and fan each query out to all of
/// them. The lock only ever sees the collected responses.
pub trait Widget {
    /// Answer `query` with an encoded record, or `None` if this widget does
    /// not understand the query.
    fn answer(&self, query: &str) -> Option<String>;
}
