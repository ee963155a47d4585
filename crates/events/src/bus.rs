//! Event publishing/subscription abstraction (mechanics only).
//!
//! The bus is a broadcast pub/sub: every subscription gets its own copy of
//! each message published after it subscribed.
//!
//! ## Delivery
//!
//! - **Best-effort**: a subscriber that falls behind by more than the bus
//!   capacity skips the oldest messages (logged, never fatal).
//! - **No persistence**: nothing is replayed to late subscribers.
//! - **Scoped**: a subscription stops receiving when it is dropped; there is
//!   no global registry to unregister from.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::task::JoinHandle;

use crate::event::Event;

type Filter<M> = Box<dyn Fn(&M) -> bool + Send + Sync>;

/// A subscription to an event stream.
///
/// ```ignore
/// let mut sub = hub.subscribe_to("networkStatus");
/// while let Some(event) = sub.recv().await {
///     handle(event);
/// }
/// ```
pub struct Subscription<M> {
    receiver: broadcast::Receiver<M>,
    filter: Option<Filter<M>>,
}

impl<M: Clone> Subscription<M> {
    pub fn new(receiver: broadcast::Receiver<M>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only deliver messages for which `predicate` returns true.
    pub fn filtered(mut self, predicate: impl Fn(&M) -> bool + Send + Sync + 'static) -> Self {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn accepts(&self, message: &M) -> bool {
        self.filter.as_ref().is_none_or(|f| f(message))
    }

    /// Wait for the next matching message. `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<M> {
        loop {
            match self.receiver.recv().await {
                Ok(message) if self.accepts(&message) => return Some(message),
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "subscription lagged; oldest events dropped");
                    continue;
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Take the next matching message if one is already queued.
    pub fn try_recv(&mut self) -> Option<M> {
        loop {
            match self.receiver.try_recv() {
                Ok(message) if self.accepts(&message) => return Some(message),
                Ok(_) => continue,
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "subscription lagged; oldest events dropped");
                    continue;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    /// Wait up to `timeout` for the next matching message.
    pub async fn recv_timeout(&mut self, timeout: Duration) -> Option<M> {
        tokio::time::timeout(timeout, self.recv()).await.ok().flatten()
    }
}

impl<M> core::fmt::Debug for Subscription<M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Subscription")
            .field("filtered", &self.filter.is_some())
            .finish()
    }
}

/// Domain-agnostic event bus (pub/sub abstraction).
///
/// Implementations must be safe to share across threads; multiple tasks may
/// publish concurrently.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;

    /// Subscribe to messages whose event name equals `name`.
    fn subscribe_to(&self, name: &'static str) -> Subscription<M>
    where
        M: Event,
    {
        self.subscribe().filtered(move |m: &M| m.event_name() == name)
    }
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}

/// Owned handle to a background listener; aborts the listener when dropped.
#[derive(Debug)]
pub struct ListenerHandle {
    task: Option<JoinHandle<()>>,
}

impl ListenerHandle {
    /// Stop the listener and wait for it to wind down.
    pub async fn shutdown(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(|t| t.is_finished())
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Run `handler` for every message of `subscription` on a background task.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_listener<M, F>(mut subscription: Subscription<M>, mut handler: F) -> ListenerHandle
where
    M: Clone + Send + 'static,
    F: FnMut(M) + Send + 'static,
{
    let task = tokio::spawn(async move {
        while let Some(message) = subscription.recv().await {
            handler(message);
        }
        tracing::debug!("event listener finished: bus closed");
    });
    ListenerHandle { task: Some(task) }
}
