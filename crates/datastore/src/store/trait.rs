use std::sync::Arc;

use async_trait::async_trait;

use orderapp_core::{Model, ModelRef, ObserveQueryOptions, QueryOptions};

use crate::error::DataStoreError;
use crate::store::observe::QuerySubscription;
use crate::store::results::QueryResults;

/// Client-side data store: local persistence plus whatever synchronization
/// the implementation provides.
///
/// Every operation is asynchronous and completes exactly once with a value or
/// a [`DataStoreError`]. Callers decide what to do with failures; the store
/// never retries on their behalf.
///
/// ## Lifecycle
///
/// A store is either started or stopped. Any data operation on a stopped
/// store starts it. `clear()` removes every local record and leaves the store
/// stopped, which also completes all live subscriptions.
///
/// ## Records
///
/// `save` takes a full record and is an insert-or-replace keyed by id. The
/// store assigns `created_at` (kept across replaces) and `updated_at`, and
/// returns the record as persisted. `delete` takes a [`ModelRef`], so
/// `Model::just_id(..)` references are accepted there and nowhere else.
#[async_trait]
pub trait DataStore: Send + Sync {
    async fn start(&self) -> Result<(), DataStoreError>;

    async fn stop(&self) -> Result<(), DataStoreError>;

    /// Remove all local data and stop the store.
    async fn clear(&self) -> Result<(), DataStoreError>;

    async fn save<M: Model>(&self, model: M) -> Result<M, DataStoreError>;

    async fn delete<M: Model>(&self, reference: ModelRef<M>) -> Result<(), DataStoreError>;

    /// One-shot query: a finite, forward-only sequence of matching records.
    async fn query<M: Model>(&self, options: QueryOptions) -> Result<QueryResults<M>, DataStoreError>;

    /// Live query: an initial snapshot, then a new snapshot whenever records
    /// of `M` change, until cancelled or the store stops.
    async fn observe_query<M: Model>(
        &self,
        options: ObserveQueryOptions,
    ) -> Result<QuerySubscription<M>, DataStoreError>;
}

#[async_trait]
impl<S> DataStore for Arc<S>
where
    S: DataStore + ?Sized,
{
    async fn start(&self) -> Result<(), DataStoreError> {
        (**self).start().await
    }

    async fn stop(&self) -> Result<(), DataStoreError> {
        (**self).stop().await
    }

    async fn clear(&self) -> Result<(), DataStoreError> {
        (**self).clear().await
    }

    async fn save<M: Model>(&self, model: M) -> Result<M, DataStoreError> {
        (**self).save(model).await
    }

    async fn delete<M: Model>(&self, reference: ModelRef<M>) -> Result<(), DataStoreError> {
        (**self).delete(reference).await
    }

    async fn query<M: Model>(&self, options: QueryOptions) -> Result<QueryResults<M>, DataStoreError> {
        (**self).query(options).await
    }

    async fn observe_query<M: Model>(
        &self,
        options: ObserveQueryOptions,
    ) -> Result<QuerySubscription<M>, DataStoreError> {
        (**self).observe_query(options).await
    }
}
