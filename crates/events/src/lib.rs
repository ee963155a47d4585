//! Hub events and the event bus that carries them.
//!
//! The bus is an explicit handle rather than a process-wide singleton: whoever
//! needs status notifications holds a [`Subscription`] (or a
//! [`ListenerHandle`]) and stops receiving as soon as it is dropped.

pub mod bus;
pub mod datastore;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, ListenerHandle, Subscription, spawn_listener};
pub use datastore::{DataStoreChannelEventName, DataStoreEvent, DataStoreEventData, NetworkStatusEvent};
pub use event::Event;
pub use in_memory_bus::{Hub, InMemoryEventBus};
