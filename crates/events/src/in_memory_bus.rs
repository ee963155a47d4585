//! In-memory event bus.

use core::convert::Infallible;

use tokio::sync::broadcast;

use crate::bus::{EventBus, Subscription};
use crate::datastore::DataStoreEvent;

/// The hub carrying data-store channel events.
pub type Hub = InMemoryEventBus<DataStoreEvent>;

/// In-memory pub/sub bus.
///
/// - No IO
/// - Best-effort fan-out over a bounded broadcast channel
/// - Publishing with no subscribers is not an error
#[derive(Debug, Clone)]
pub struct InMemoryEventBus<M> {
    sender: broadcast::Sender<M>,
}

impl<M: Clone> InMemoryEventBus<M> {
    pub const DEFAULT_CAPACITY: usize = 256;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<M: Clone> Default for InMemoryEventBus<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> EventBus<M> for InMemoryEventBus<M>
where
    M: Clone + Send + Sync + 'static,
{
    type Error = Infallible;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        // `send` only fails when nobody is listening.
        let _ = self.sender.send(message);
        Ok(())
    }

    fn subscribe(&self) -> Subscription<M> {
        Subscription::new(self.sender.subscribe())
    }
}
