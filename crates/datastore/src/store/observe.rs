//! Live query subscriptions.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::sync::{mpsc, watch};
use tokio_stream::Stream;

use crate::error::DataStoreError;

/// Point-in-time result set delivered by a live query.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySnapshot<M> {
    items: Vec<M>,
}

impl<M> QuerySnapshot<M> {
    pub fn new(items: Vec<M>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[M] {
        &self.items
    }

    pub fn into_items(self) -> Vec<M> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Cancellation handle for a live subscription.
///
/// Clones share the same subscription. Cancelling is idempotent.
#[derive(Debug, Clone)]
pub struct Cancelable {
    tx: Arc<watch::Sender<bool>>,
}

impl Cancelable {
    pub(crate) fn new() -> (Self, CancelSignal) {
        let (tx, rx) = watch::channel(false);
        (Self { tx: Arc::new(tx) }, CancelSignal { rx })
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Producer side of a [`Cancelable`].
#[derive(Debug)]
pub(crate) struct CancelSignal {
    rx: watch::Receiver<bool>,
}

impl CancelSignal {
    /// Resolves once cancelled or once every `Cancelable` clone is dropped.
    pub(crate) async fn cancelled(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }
}

/// A live query: a stream of snapshots plus its cancellation handle.
///
/// The stream ends when the subscription is cancelled, when the store stops or
/// is cleared, or after yielding an error. Dropping the subscription cancels it.
#[derive(Debug)]
pub struct QuerySubscription<M> {
    rx: mpsc::Receiver<Result<QuerySnapshot<M>, DataStoreError>>,
    cancelable: Cancelable,
}

impl<M> QuerySubscription<M> {
    pub(crate) fn new(
        rx: mpsc::Receiver<Result<QuerySnapshot<M>, DataStoreError>>,
        cancelable: Cancelable,
    ) -> Self {
        Self { rx, cancelable }
    }

    pub fn cancelable(&self) -> Cancelable {
        self.cancelable.clone()
    }

    pub fn cancel(&self) {
        self.cancelable.cancel();
    }

    /// Wait for the next snapshot; `None` once the subscription completed.
    pub async fn next_snapshot(&mut self) -> Option<Result<QuerySnapshot<M>, DataStoreError>> {
        self.rx.recv().await
    }
}

impl<M> Stream for QuerySubscription<M> {
    type Item = Result<QuerySnapshot<M>, DataStoreError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}
