use chrono::{DateTime, Utc};

/// An event published on the hub.
///
/// Events are immutable facts; subscribers filter on [`Event::event_name`].
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name (e.g. "networkStatus").
    fn event_name(&self) -> &'static str;

    /// When the event occurred.
    fn occurred_at(&self) -> DateTime<Utc>;
}
