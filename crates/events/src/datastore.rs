//! Events emitted on the data-store channel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::Event;

/// Names of the data-store channel events subscribers can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DataStoreChannelEventName {
    /// Connectivity to the backend changed.
    NetworkStatus,
    /// The store started and is ready to serve operations.
    Ready,
    /// All local data was cleared.
    Cleared,
}

impl DataStoreChannelEventName {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataStoreChannelEventName::NetworkStatus => "networkStatus",
            DataStoreChannelEventName::Ready => "ready",
            DataStoreChannelEventName::Cleared => "cleared",
        }
    }
}

impl core::fmt::Display for DataStoreChannelEventName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a `networkStatus` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkStatusEvent {
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "camelCase")]
pub enum DataStoreEventData {
    NetworkStatus(NetworkStatusEvent),
    Ready,
    Cleared,
}

/// An event on the data-store channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataStoreEvent {
    pub data: DataStoreEventData,
    pub occurred_at: DateTime<Utc>,
}

impl DataStoreEvent {
    pub fn new(data: DataStoreEventData) -> Self {
        Self {
            data,
            occurred_at: Utc::now(),
        }
    }

    pub fn network_status(active: bool) -> Self {
        Self::new(DataStoreEventData::NetworkStatus(NetworkStatusEvent { active }))
    }

    pub fn ready() -> Self {
        Self::new(DataStoreEventData::Ready)
    }

    pub fn cleared() -> Self {
        Self::new(DataStoreEventData::Cleared)
    }

    pub fn name(&self) -> DataStoreChannelEventName {
        match self.data {
            DataStoreEventData::NetworkStatus(_) => DataStoreChannelEventName::NetworkStatus,
            DataStoreEventData::Ready => DataStoreChannelEventName::Ready,
            DataStoreEventData::Cleared => DataStoreChannelEventName::Cleared,
        }
    }

    /// The network status payload, if this is a `networkStatus` event.
    pub fn network_status_event(&self) -> Option<NetworkStatusEvent> {
        match self.data {
            DataStoreEventData::NetworkStatus(ev) => Some(ev),
            _ => None,
        }
    }
}

impl Event for DataStoreEvent {
    fn event_name(&self) -> &'static str {
        self.name().as_str()
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}
